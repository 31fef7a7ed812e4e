//! # Chatdesk API Client (`common::api`)
//!
//! File: cli/src/common/api/mod.rs
//!
//! ## Overview
//!
//! One HTTP client for the whole backend. It is configured once with the base
//! URL, a fixed timeout and JSON defaults, and it:
//! - attaches `Authorization: Bearer <token>` whenever the session holds a token;
//! - on **401**, clears the session and redirects the navigator to login before
//!   surfacing the error, whichever view made the call;
//! - logs 403/404/5xx/other failures and surfaces them unchanged (no retries).
//!
//! ## Architecture
//!
//! - `endpoints`: REST paths.
//! - `error`: `ApiError`, the classification of failures.
//! - `ApiClient`: `get`/`post`/`put`/`delete` with the session attached, and
//!   `post_form_anonymous` for the login form, all funnelling through
//!   `execute`, which owns header injection and status handling.
//!
//! Anonymous requests never carry the bearer token, and their 401 is an
//! ordinary failure: a rejected login leaves an existing session alone.
//!
//! `ApiClient` is cheap to clone; clones share the connection pool, the session
//! store and the navigator.
//!
//! ```rust,ignore
//! let conversations: Vec<Conversation> = ctx.api.get(endpoints::CONVERSATIONS).await?;
//! ```
//!
pub mod endpoints;
pub mod error;

pub use error::ApiError;

use crate::common::nav::Navigator;
use crate::common::session::SessionStore;
use crate::core::config::ApiConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Whether a request runs under the stored session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Auth {
    /// Bearer token attached; 401 clears the session.
    Session,
    /// No token; 401 is returned like any other status.
    Anonymous,
}

/// HTTP client bound to one backend and one session.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
    navigator: Arc<Navigator>,
}

impl ApiClient {
    pub fn new(
        config: &ApiConfig,
        session: Arc<SessionStore>,
        navigator: Arc<Navigator>,
    ) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Client(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            navigator,
        })
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let body = self.execute(Method::GET, path, Auth::Session, |req| req).await?;
        decode(path, &body)
    }

    pub async fn post<B, T>(&self, path: &str, payload: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.execute(Method::POST, path, Auth::Session, |req| req.json(payload)).await?;
        decode(path, &body)
    }

    pub async fn put<B, T>(&self, path: &str, payload: &B) -> Result<T, ApiError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = self.execute(Method::PUT, path, Auth::Session, |req| req.json(payload)).await?;
        decode(path, &body)
    }

    /// Issues a DELETE; any success body is ignored.
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.execute(Method::DELETE, path, Auth::Session, |req| req).await?;
        Ok(())
    }

    /// POSTs an `application/x-www-form-urlencoded` body outside the session.
    pub async fn post_form_anonymous<T: DeserializeOwned>(
        &self,
        path: &str,
        fields: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let body = self
            .execute(Method::POST, path, Auth::Anonymous, |req| req.form(fields))
            .await?;
        decode(path, &body)
    }

    /// Sends one request and returns the raw success body.
    async fn execute<F>(
        &self,
        method: Method,
        path: &str,
        auth: Auth,
        build: F,
    ) -> Result<String, ApiError>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = format!("{}{}", self.base_url, path);
        let mut request = build(self.http.request(method.clone(), &url));

        let token = match auth {
            Auth::Session => self.session.get_token(),
            Auth::Anonymous => None,
        };
        if let Some(token) = &token {
            request = request.header(AUTHORIZATION, format!("Bearer {token}"));
        }
        debug!(
            "{} {} (authorization attached: {})",
            method,
            path,
            token.is_some()
        );

        let response = request.send().await.map_err(|e| {
            warn!("{} {} failed without a response: {}", method, path, e);
            ApiError::Network(e)
        })?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::Network)?;
        if status.is_success() {
            debug!("{} {} -> {}", method, path, status);
            return Ok(body);
        }

        let err = ApiError::from_status(status, extract_detail(&body));
        self.handle_failure(&method, path, auth, status, &err);
        Err(err)
    }

    fn handle_failure(
        &self,
        method: &Method,
        path: &str,
        auth: Auth,
        status: StatusCode,
        err: &ApiError,
    ) {
        match err {
            ApiError::Unauthorized { .. } if auth == Auth::Anonymous => {
                warn!("{} {} returned 401", method, path)
            }
            ApiError::Unauthorized { .. } => {
                warn!("{} {} returned 401; clearing session and redirecting to login", method, path);
                if let Err(e) = self.session.clear_token() {
                    error!("Failed to clear session after 401: {:#}", e);
                }
                self.navigator.redirect_to_login();
            }
            ApiError::Forbidden { .. } => warn!("Permission denied: {} {}", method, path),
            ApiError::NotFound { .. } => warn!("Resource not found: {} {}", method, path),
            ApiError::Server { .. } => error!("Server error ({}): {} {}", status, method, path),
            _ => warn!("Unknown error ({}): {} {}", status, method, path),
        }
    }
}

/// FastAPI error bodies look like `{"detail": "..."}`; validation errors carry
/// a list there instead, which is kept as raw JSON text.
fn extract_detail(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct ErrorBody {
        detail: serde_json::Value,
    }
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    match parsed.detail {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Empty bodies decode as JSON `null`, so `()` and `Option<_>` targets accept them.
fn decode<T: DeserializeOwned>(path: &str, body: &str) -> Result<T, ApiError> {
    let text = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(text).map_err(|source| ApiError::Decode {
        path: path.to_string(),
        source,
    })
}
