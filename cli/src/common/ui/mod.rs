//! # Chatdesk UI Utilities Module (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//!
//! ## Overview
//!
//! Terminal presentation helpers used by the views:
//!
//! - **`tables`**: aligned plain-text tables (user lists, import results,
//!   aggregate counts).
//! - **`prompts`**: line input and `[y/N]` confirmations read from stdin.
//!
//! ```rust,ignore
//! use crate::common::ui::{prompts, tables};
//!
//! print!("{}", tables::render_table(&["Username", "Is Admin"], &rows));
//! if prompts::confirm("Delete user 'bob'?")? {
//!     // ...
//! }
//! ```

pub mod prompts;
pub mod tables;
