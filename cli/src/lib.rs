//! # Chatdesk Library
//!
//! File: cli/src/lib.rs
//!
//! Terminal client for the chatbot backend: login, chat and administration
//! over its REST API. The `chatdesk` binary is a thin clap layer over the
//! modules exported here.
//!
//! - `core`: configuration, errors and the per-invocation `AppContext`
//! - `common`: API client, session store, navigation, data model and terminal UI
//! - `commands`: the login/logout/whoami commands and the chat and admin views
//!
pub mod commands;
pub mod common;
pub mod core;
