//! # Chatdesk Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout Chatdesk. It follows a
//! two-layer approach:
//! - `ChatdeskError`: a `thiserror` enum for the failures a view or command
//!   needs to recognise (missing session, admin-only views, local validation,
//!   classified API failures).
//! - `Result<T>`: an alias for `anyhow::Result<T>`, used by command handlers so
//!   I/O failures can carry context.
//!
//! HTTP failures are classified one level down in `common::api::ApiError` and
//! wrapped here through `ChatdeskError::Api`.
//!
//! ## Examples
//!
//! ```rust,ignore
//! // Local rejection before any network call.
//! if view.selected().is_none() {
//!     return Err(ChatdeskError::NoConversationSelected);
//! }
//!
//! // Recognising a specific failure after it was propagated through anyhow.
//! match result {
//!     Err(e) if e.downcast_ref::<ChatdeskError>().is_some_and(|ce| ce.is_unauthorized()) => {
//!         println!("Please log in again.");
//!     }
//!     other => other?,
//! }
//! ```
//!
use crate::common::api::ApiError;
use thiserror::Error;

/// Custom error type for the Chatdesk application.
#[derive(Error, Debug)]
pub enum ChatdeskError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Filesystem error: {0}")]
    FileSystem(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Not logged in. Run `chatdesk login` first.")]
    NotAuthenticated,

    #[error("The admin view requires an administrator account ('{username}' is not an admin).")]
    AdminRequired { username: String },

    #[error("{0}")]
    Validation(String),

    #[error("Please select a conversation or create a new one")]
    NoConversationSelected,

    #[error("Please enter a message")]
    EmptyMessage,

    #[error("Import error: {0}")]
    Import(String),

    #[error("{message}")]
    Api {
        /// Human-readable text shown to the user for this failure.
        message: String,
        #[source]
        source: ApiError,
    },
}

impl ChatdeskError {
    /// Wraps an API failure with a view-specific user message.
    pub fn api(message: impl Into<String>, source: ApiError) -> Self {
        ChatdeskError::Api {
            message: message.into(),
            source,
        }
    }

    /// True when the failure means the session is gone (no token, or a 401).
    pub fn is_unauthorized(&self) -> bool {
        match self {
            ChatdeskError::NotAuthenticated => true,
            ChatdeskError::Api { source, .. } => source.is_unauthorized(),
            _ => false,
        }
    }
}

impl From<ApiError> for ChatdeskError {
    fn from(source: ApiError) -> Self {
        ChatdeskError::Api {
            message: source.user_message().to_string(),
            source,
        }
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
