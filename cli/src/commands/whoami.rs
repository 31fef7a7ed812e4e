//! # Chatdesk Identity
//!
//! File: cli/src/commands/whoami.rs
//!
//! Implements `chatdesk whoami`: enters the authenticated shell and prints its
//! header (product name, avatar initial, username) and the menu available to
//! the user. An optional view path shows where the router would land, so
//! `chatdesk whoami /admin` reports `[Chat]` for non-admins.
//!
use crate::common::nav::{self, Route};
use crate::core::context::AppContext;
use crate::core::error::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Show the logged-in user and available views")]
pub struct WhoamiArgs {
    /// View path to resolve (`/chat`, `/admin`; anything else means chat).
    #[arg(default_value = "/chat")]
    pub view: String,
}

/// The route `whoami` asks the shell for. A logged-in user is never sent
/// back to the login form.
fn requested_route(view: &str) -> Route {
    match Route::from_path(view) {
        Route::Login => Route::Chat,
        other => other,
    }
}

pub async fn handle_whoami(args: WhoamiArgs, ctx: &AppContext) -> Result<()> {
    let frame = nav::enter(ctx, requested_route(&args.view)).await?;
    println!("{}", frame.header());
    println!("Menu: {}", frame.menu_line());
    let roles = frame.user.role_names();
    if !roles.is_empty() {
        println!("Roles: {}", roles.join(", "));
    }
    Ok(())
}
