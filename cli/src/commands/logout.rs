//! # Chatdesk Logout
//!
//! File: cli/src/commands/logout.rs
//!
//! Implements `chatdesk logout`: drops the stored session and moves the
//! navigator back to the login route. Logging out while already logged out
//! is not an error.
//!
use crate::core::context::AppContext;
use crate::core::error::Result;
use clap::Parser;
use tracing::info;

/// Arguments for `chatdesk logout` (none).
#[derive(Parser, Debug)]
#[command(about = "Log out and forget the stored session")]
pub struct LogoutArgs {}

/// Clears the session. Returns the username that was logged in, if any.
pub fn logout(ctx: &AppContext) -> Result<Option<String>> {
    let username = ctx.session.username();
    ctx.session.clear_token()?;
    ctx.navigator.redirect_to_login();
    info!("Session cleared");
    Ok(username)
}

pub async fn handle_logout(_args: LogoutArgs, ctx: &AppContext) -> Result<()> {
    match logout(ctx)? {
        Some(username) => println!("Logged out {username}."),
        None => println!("Not logged in."),
    }
    Ok(())
}
