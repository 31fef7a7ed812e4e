//! # Chatdesk Login
//!
//! File: cli/src/commands/login.rs
//!
//! ## Overview
//!
//! Implements `chatdesk login`: validate credentials locally, exchange them for
//! a bearer token at `POST /api/auth/login` (form-encoded), persist the token
//! and move the navigator to the chat route.
//!
//! ## Architecture
//!
//! - `LoginFlow` owns the form state (`LoginState`) and the last failure
//!   message. A failed submit records the message and returns to `Idle`, so the
//!   same flow can be resubmitted.
//! - `validate_credentials` enforces the form rules before any network call.
//! - `failure_message` maps an `ApiError` to the text shown to the user.
//! - `handle_login` is the clap entry point; missing values are prompted for.
//!
//! ## Usage
//!
//! ```bash
//! chatdesk login --username alice --password secret1
//! CHATDESK_PASSWORD=secret1 chatdesk login -u alice
//! chatdesk login            # prompts for both
//! ```
//!
use crate::common::api::{endpoints, ApiError};
use crate::common::models::TokenResponse;
use crate::common::nav::Route;
use crate::common::ui::prompts;
use crate::core::context::AppContext;
use crate::core::error::{ChatdeskError, Result};
use clap::Parser;
use std::fmt;
use tracing::{debug, info, warn};

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

/// Arguments for `chatdesk login`.
#[derive(Parser)]
#[command(about = "Log in and store the session token")]
pub struct LoginArgs {
    /// Account name. Prompted for when omitted.
    #[arg(short, long)]
    username: Option<String>,

    /// Account password. Prompted for when omitted.
    #[arg(short, long, env = "CHATDESK_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

impl fmt::Debug for LoginArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginArgs")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Idle,
    Submitting,
    Success,
}

/// Login form state.
#[derive(Debug)]
pub struct LoginFlow {
    state: LoginState,
    error: Option<String>,
}

impl Default for LoginFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginFlow {
    pub fn new() -> Self {
        Self {
            state: LoginState::Idle,
            error: None,
        }
    }

    pub fn state(&self) -> LoginState {
        self.state
    }

    /// Message from the most recent failed submit, cleared on the next one.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Submits credentials. On success the token is stored and the navigator
    /// is on the chat route; on failure the session is left untouched.
    pub async fn submit(
        &mut self,
        ctx: &AppContext,
        username: &str,
        password: &str,
    ) -> std::result::Result<(), ChatdeskError> {
        self.error = None;
        let outcome = self.try_submit(ctx, username.trim(), password).await;
        match &outcome {
            Ok(()) => self.state = LoginState::Success,
            Err(e) => {
                self.error = Some(e.to_string());
                self.state = LoginState::Idle;
            }
        }
        outcome
    }

    async fn try_submit(
        &mut self,
        ctx: &AppContext,
        username: &str,
        password: &str,
    ) -> std::result::Result<(), ChatdeskError> {
        validate_credentials(username, password)?;

        self.state = LoginState::Submitting;
        debug!("Submitting login for '{}'", username);
        let response: TokenResponse = ctx
            .api
            .post_form_anonymous(
                endpoints::LOGIN,
                &[("username", username), ("password", password)],
            )
            .await
            .map_err(|e| {
                warn!("Login for '{}' failed: {}", username, e);
                let message = failure_message(&e);
                ChatdeskError::api(message, e)
            })?;

        let token = response
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                ChatdeskError::Session("Login response did not contain an access token".into())
            })?;

        ctx.session
            .set_token(&token, username)
            .map_err(|e| ChatdeskError::Session(format!("{e:#}")))?;
        ctx.navigator.navigate(Route::Chat);
        info!("Logged in as '{}'", username);
        Ok(())
    }
}

/// Form rules checked before anything is sent.
pub fn validate_credentials(username: &str, password: &str) -> std::result::Result<(), ChatdeskError> {
    if username.is_empty() {
        return Err(ChatdeskError::Validation("Please input your username".into()));
    }
    if username.chars().count() < MIN_USERNAME_LEN {
        return Err(ChatdeskError::Validation(format!(
            "Username must be at least {MIN_USERNAME_LEN} characters"
        )));
    }
    if password.is_empty() {
        return Err(ChatdeskError::Validation("Please input your password".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ChatdeskError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Text shown for a failed login request.
pub fn failure_message(err: &ApiError) -> &'static str {
    match err.status() {
        Some(401) => "Invalid username or password",
        Some(422) => "Please enter valid username and password",
        Some(code) if (500..600).contains(&code) => "Server error, please try again later",
        Some(_) => "Login failed, please check your network connection",
        None if err.is_network() => "Network error, please check your connection",
        None => "Login failed, please check your network connection",
    }
}

/// # Handle Login Command (`handle_login`)
///
/// Prompts for whatever was not given on the command line, then runs the
/// login flow once.
pub async fn handle_login(args: LoginArgs, ctx: &AppContext) -> Result<()> {
    let username = match args.username {
        Some(u) => u,
        None => prompts::read_line("Username: ")?.unwrap_or_default(),
    };
    let password = match args.password {
        Some(p) => p,
        None => prompts::read_password("Password: ")?.unwrap_or_default(),
    };

    let mut flow = LoginFlow::new();
    flow.submit(ctx, &username, &password).await?;
    println!("Login successful! Logged in as {}.", username.trim());
    Ok(())
}
