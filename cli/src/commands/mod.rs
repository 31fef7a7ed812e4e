//! # Chatdesk Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! Aggregates the top-level commands of the `chatdesk` binary. Each module
//! defines its clap arguments and a `handle_*` function taking the parsed
//! arguments and the shared `AppContext`.
//!
//! ## Commands
//!
//! - `login`: exchange credentials for a token and store it
//! - `logout`: forget the stored session
//! - `whoami`: show the authenticated user and available views
//! - `chat`: conversations and messaging (command group)
//! - `admin`: overview, user management and history (command group, admins only)
//!

/// Command group for administrators. Includes `overview`, `users`, `roles`, `conversations`, user management and `import`.
pub mod admin;
/// Command group for conversations and messaging. Includes `list`, `new`, `show`, `send`, `repl`.
pub mod chat;
/// `chatdesk login`.
pub mod login;
/// `chatdesk logout`.
pub mod logout;
/// `chatdesk whoami`.
pub mod whoami;
