//! # Chatdesk Application Context
//!
//! File: cli/src/core/context.rs
//!
//! Bundles the pieces every view needs: the effective configuration, the
//! shared session store, the navigator and the API client wired to both.
//! Built once per command invocation.
//!
use crate::common::api::ApiClient;
use crate::common::nav::Navigator;
use crate::common::session::SessionStore;
use crate::core::config::{self, Config, Overrides};
use crate::core::error::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Shared state for one Chatdesk invocation.
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub session: Arc<SessionStore>,
    pub navigator: Arc<Navigator>,
    pub api: ApiClient,
}

impl AppContext {
    /// Loads configuration (files + overrides) and builds the context.
    pub fn load(overrides: &Overrides) -> Result<Self> {
        Self::from_config(config::load_config(overrides)?)
    }

    /// Builds the context from an already-resolved configuration.
    pub fn from_config(config: Config) -> Result<Self> {
        let session_path = PathBuf::from(&config.session.file);
        debug!("Using session file {}", session_path.display());
        let session = Arc::new(SessionStore::open(session_path)?);
        let navigator = Arc::new(Navigator::new());
        let api = ApiClient::new(&config.api, session.clone(), navigator.clone())?;
        Ok(Self {
            config,
            session,
            navigator,
            api,
        })
    }
}
