//! # Chatdesk Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces shared by every command:
//! - `config`: configuration loading, merging and validation
//! - `context`: the per-invocation `AppContext` (config, session, navigator, API client)
//! - `error`: error types and the `Result` alias
//!
//! ```rust,ignore
//! use crate::core::context::AppContext;
//! use crate::core::error::{ChatdeskError, Result};
//! ```
//!
pub mod config;
pub mod context;
pub mod error;
