//! # Chatdesk Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared building blocks used by the command views (`commands::`). Nothing in
//! here knows about clap; everything is driven through `core::context::AppContext`.
//!
//! ## Architecture
//!
//! - **`api`**: the single HTTP client, endpoint paths and `ApiError`.
//! - **`fs`**: small filesystem helpers (private file writes, removal).
//! - **`models`**: backend DTOs (users, roles, conversations, messages, import rows).
//! - **`nav`**: routes, the navigator and the authenticated shell frame.
//! - **`session`**: the persisted token store.
//! - **`ui`**: terminal tables and prompts.
//!
//! ```rust,ignore
//! use crate::common::{api::endpoints, models::Conversation};
//!
//! let list: Vec<Conversation> = ctx.api.get(endpoints::CONVERSATIONS).await?;
//! ```
//!

/// HTTP client for the backend REST API.
pub mod api;
/// Filesystem helpers.
pub mod fs;
/// REST data model.
pub mod models;
/// Routing, guards and the shell frame.
pub mod nav;
/// Persisted authentication token.
pub mod session;
/// Terminal tables and prompts.
pub mod ui;
