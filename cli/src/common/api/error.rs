//! # API Error Classification
//!
//! File: cli/src/common/api/error.rs
//!
//! Every non-2xx response and transport failure is classified into an
//! `ApiError` variant. Views map these to their own wording; `user_message`
//! provides the generic wording used where a view has none.
//!
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("authentication required (HTTP 401){}", fmt_detail(.detail))]
    Unauthorized { detail: Option<String> },

    #[error("permission denied (HTTP 403){}", fmt_detail(.detail))]
    Forbidden { detail: Option<String> },

    #[error("resource not found (HTTP 404){}", fmt_detail(.detail))]
    NotFound { detail: Option<String> },

    #[error("request rejected as malformed (HTTP 422){}", fmt_detail(.detail))]
    Unprocessable { detail: Option<String> },

    #[error("server error (HTTP {status}){}", fmt_detail(.detail))]
    Server { status: u16, detail: Option<String> },

    #[error("request failed with HTTP {status}{}", fmt_detail(.detail))]
    Status { status: u16, detail: Option<String> },

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("failed to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid API client configuration: {0}")]
    Client(String),
}

fn fmt_detail(detail: &Option<String>) -> String {
    match detail {
        Some(d) => format!(": {d}"),
        None => String::new(),
    }
}

impl ApiError {
    /// Classifies a non-success status.
    pub fn from_status(status: StatusCode, detail: Option<String>) -> Self {
        match status.as_u16() {
            401 => ApiError::Unauthorized { detail },
            403 => ApiError::Forbidden { detail },
            404 => ApiError::NotFound { detail },
            422 => ApiError::Unprocessable { detail },
            code if status.is_server_error() => ApiError::Server { status: code, detail },
            code => ApiError::Status { status: code, detail },
        }
    }

    /// HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Unauthorized { .. } => Some(401),
            ApiError::Forbidden { .. } => Some(403),
            ApiError::NotFound { .. } => Some(404),
            ApiError::Unprocessable { .. } => Some(422),
            ApiError::Server { status, .. } | ApiError::Status { status, .. } => Some(*status),
            ApiError::Network(_) | ApiError::Decode { .. } | ApiError::Client(_) => None,
        }
    }

    /// Server-provided `detail`, if the error body had one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Unauthorized { detail }
            | ApiError::Forbidden { detail }
            | ApiError::NotFound { detail }
            | ApiError::Unprocessable { detail }
            | ApiError::Server { detail, .. }
            | ApiError::Status { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized { .. })
    }

    /// True when no HTTP response was received.
    pub fn is_network(&self) -> bool {
        matches!(self, ApiError::Network(_))
    }

    /// Generic user-facing text for views without a specific mapping.
    pub fn user_message(&self) -> &'static str {
        match self {
            ApiError::Unauthorized { .. } => "Login expired, please log in again",
            ApiError::Forbidden { .. } => "You do not have permission to do that",
            ApiError::NotFound { .. } => "The requested resource was not found",
            ApiError::Unprocessable { .. } => "The server rejected the request as invalid",
            ApiError::Server { .. } => "Server error, please try again later",
            ApiError::Status { .. } => "Request failed",
            ApiError::Network(_) => "Network error, please check your connection",
            ApiError::Decode { .. } => "Unexpected response from the server",
            ApiError::Client(_) => "The API client is misconfigured",
        }
    }
}
