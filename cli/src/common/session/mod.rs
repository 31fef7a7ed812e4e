//! # Chatdesk Session Store (`common::session`)
//!
//! File: cli/src/common/session/mod.rs
//!
//! ## Overview
//!
//! Holds the single active bearer token and the username it was issued to.
//! The session is persisted to a small TOML file so separate `chatdesk`
//! invocations share the login, and it lives until an explicit logout or a
//! 401 from any request.
//!
//! No expiry is tracked here; an expired token is detected when the backend
//! answers 401 and the API client calls `clear_token`.
//!
//! ## Architecture
//!
//! - `Session`: the persisted record (token, username, login time).
//! - `SessionStore`: owns the file path and an in-memory copy behind a
//!   `RwLock`, so the API client can read the token for every request while
//!   login/logout/401 handling replace or drop it.
//!
//! ```rust,ignore
//! let store = SessionStore::open(path)?;
//! store.set_token("abc", "alice")?;
//! assert_eq!(store.get_token().as_deref(), Some("abc"));
//! store.clear_token()?;
//! assert!(!store.is_authenticated());
//! ```
//!
use crate::common::fs::io;
use crate::core::error::{ChatdeskError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, info, warn};

/// The persisted session record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token returned by the auth endpoint.
    pub token: String,
    /// Username the token was issued for.
    pub username: String,
    /// When the login happened (informational only).
    pub logged_in_at: DateTime<Utc>,
}

/// File-backed holder of the one active session.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    current: RwLock<Option<Session>>,
}

impl SessionStore {
    /// Opens the store at `path`, loading any session already saved there.
    ///
    /// An unreadable or corrupt session file is logged and treated as
    /// "logged out" rather than failing the command.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let current = if path.exists() {
            match load_session(&path) {
                Ok(session) => {
                    debug!("Loaded session for '{}' from {}", session.username, path.display());
                    Some(session)
                }
                Err(e) => {
                    warn!("Ignoring unreadable session file {}: {:#}", path.display(), e);
                    None
                }
            }
        } else {
            debug!("No session file at {}", path.display());
            None
        };
        Ok(Self {
            path,
            current: RwLock::new(current),
        })
    }

    /// Stores a new token, replacing any previous session, and persists it.
    pub fn set_token(&self, token: &str, username: &str) -> Result<()> {
        if token.trim().is_empty() {
            anyhow::bail!(ChatdeskError::Session(
                "Refusing to store an empty token.".to_string()
            ));
        }
        let session = Session {
            token: token.to_string(),
            username: username.to_string(),
            logged_in_at: Utc::now(),
        };
        let serialized = toml::to_string(&session)
            .map_err(|e| ChatdeskError::Session(format!("Failed to serialize session: {e}")))?;
        io::write_private_file(&self.path, &serialized)?;
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        info!("Session stored for user '{}'", username);
        Ok(())
    }

    /// Returns the active token, if any.
    pub fn get_token(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.token.clone())
    }

    /// Returns the username of the active session, if any.
    pub fn username(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|s| s.username.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.get_token().is_some()
    }

    /// Drops the session in memory and removes the session file.
    pub fn clear_token(&self) -> Result<()> {
        let previous = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        io::remove_file_if_exists(&self.path)?;
        if let Some(session) = previous {
            info!("Session cleared for user '{}'", session.username);
        }
        Ok(())
    }
}

fn load_session(path: &Path) -> Result<Session> {
    let content = io::read_file_to_string(path)?;
    let session: Session = toml::from_str(&content)
        .map_err(|e| ChatdeskError::Session(format!("Failed to parse session file: {e}")))?;
    if session.token.trim().is_empty() {
        anyhow::bail!(ChatdeskError::Session("Session file holds an empty token.".to_string()));
    }
    Ok(session)
}
