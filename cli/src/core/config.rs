//! # Chatdesk Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! Loads, merges and validates the client configuration: where the backend
//! lives, how long a request may take, where the session file is kept and how
//! the chat view behaves.
//!
//! Configuration sources (in order of precedence):
//! 1. Command-line flags / `CHATDESK_*` environment variables (`Overrides`)
//! 2. Project-specific `.chatdesk.toml` in the current directory or ancestors
//! 3. User-specific `config.toml` in the platform config directory
//! 4. Default values defined in the code
//!
//! ## Examples
//!
//! ```toml
//! [api]
//! base_url = "http://chat.internal:8000"
//! timeout_secs = 15
//!
//! [session]
//! file = "~/.chatdesk/session.toml"
//!
//! [chat]
//! default_title = "New Conversation"
//! summarize_threshold = 3
//! ```
//!
//! ```rust,ignore
//! let cfg = config::load_config(&overrides)?;
//! println!("Talking to {}", cfg.api.base_url);
//! ```
//!
use crate::core::error::{ChatdeskError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

/// Connection settings for the backend REST API.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the backend, e.g. `http://localhost:8000`.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Where the session token is persisted.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    /// Session file path (can use ~). Will be expanded.
    #[serde(default = "default_session_file")]
    pub file: String,
}

/// Chat view behaviour.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Title posted when creating a conversation without an explicit one.
    #[serde(default = "default_conversation_title")]
    pub default_title: String,
    /// Visible message count at which the title summarization is requested.
    #[serde(default = "default_summarize_threshold")]
    pub summarize_threshold: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            file: default_session_file(),
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_title: default_conversation_title(),
            summarize_threshold: default_summarize_threshold(),
        }
    }
}

/// Values supplied on the command line (or through their env fallbacks).
/// `None` means "not given"; the file/default value is kept.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub base_url: Option<String>,
    pub session_file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}
fn default_session_file() -> String {
    match project_dirs() {
        Some(dirs) => dirs
            .data_dir()
            .join("session.toml")
            .to_string_lossy()
            .into_owned(),
        None => "~/.chatdesk/session.toml".to_string(),
    }
}
fn default_conversation_title() -> String {
    "New Conversation".to_string()
}
fn default_summarize_threshold() -> usize {
    3
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "Chatdesk", "chatdesk")
}

const PROJECT_CONFIG_FILENAME: &str = ".chatdesk.toml";

/// Loads the effective configuration: user file, project file, then overrides.
pub fn load_config(overrides: &Overrides) -> Result<Config> {
    let user_config = load_user_config()?;
    let project_config = load_project_config()?;
    let mut merged_config = merge_configs(user_config.unwrap_or_default(), project_config);
    apply_overrides(&mut merged_config, overrides);
    expand_config_paths(&mut merged_config).context("Failed to expand paths in configuration")?;
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = project_dirs() {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file (.chatdesk.toml) found in current directory or ancestors.");
        Ok(None)
    }
}

/// Walks from `start` towards the root looking for `.chatdesk.toml`,
/// stopping at the first directory that contains `.git`.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path: &Path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project values win whenever they differ from the built-in default.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let project_cfg = match project {
        Some(p) => p,
        None => return user,
    };
    let mut merged = Config::default();
    merged.api.base_url = if project_cfg.api.base_url != default_base_url() {
        project_cfg.api.base_url
    } else {
        user.api.base_url
    };
    merged.api.timeout_secs = if project_cfg.api.timeout_secs != default_timeout_secs() {
        project_cfg.api.timeout_secs
    } else {
        user.api.timeout_secs
    };
    merged.session.file = if project_cfg.session.file != default_session_file() {
        project_cfg.session.file
    } else {
        user.session.file
    };
    merged.chat.default_title = if project_cfg.chat.default_title != default_conversation_title() {
        project_cfg.chat.default_title
    } else {
        user.chat.default_title
    };
    merged.chat.summarize_threshold =
        if project_cfg.chat.summarize_threshold != default_summarize_threshold() {
            project_cfg.chat.summarize_threshold
        } else {
            user.chat.summarize_threshold
        };
    merged
}

fn apply_overrides(config: &mut Config, overrides: &Overrides) {
    if let Some(base_url) = &overrides.base_url {
        debug!("Base URL overridden on the command line: {}", base_url);
        config.api.base_url = base_url.clone();
    }
    if let Some(session_file) = &overrides.session_file {
        config.session.file = session_file.to_string_lossy().into_owned();
    }
    if let Some(timeout) = overrides.timeout_secs {
        config.api.timeout_secs = timeout;
    }
}

fn expand_config_paths(config: &mut Config) -> Result<()> {
    config.session.file = shellexpand::tilde(&config.session.file).into_owned();
    debug!("Expanded session file path: {}", config.session.file);
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    let base_url = config.api.base_url.trim();
    if base_url.is_empty() {
        return Err(anyhow!(ChatdeskError::Config(
            "api.base_url cannot be empty.".to_string()
        )));
    }
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(anyhow!(ChatdeskError::Config(format!(
            "Invalid base URL '{}'. Expected an http:// or https:// URL.",
            base_url
        ))));
    }
    if config.api.timeout_secs == 0 {
        return Err(anyhow!(ChatdeskError::Config(
            "api.timeout_secs must be greater than zero.".to_string()
        )));
    }
    if config.session.file.trim().is_empty() {
        return Err(anyhow!(ChatdeskError::Config(
            "session.file cannot be empty.".to_string()
        )));
    }
    if config.chat.summarize_threshold == 0 {
        return Err(anyhow!(ChatdeskError::Config(
            "chat.summarize_threshold must be at least 1.".to_string()
        )));
    }
    if config.chat.default_title.trim().is_empty() {
        return Err(anyhow!(ChatdeskError::Config(
            "chat.default_title cannot be empty.".to_string()
        )));
    }
    Ok(())
}
