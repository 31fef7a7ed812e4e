//! # Chatdesk Navigation Shell (`common::nav`)
//!
//! File: cli/src/common/nav/mod.rs
//!
//! ## Overview
//!
//! Decides which view the user lands in and renders the header frame around it.
//!
//! - `Route`: `Login`, `Chat` or `Admin`. Unknown paths fall back to `Chat`.
//! - `Navigator`: the current route. The API client moves it to `Login` on any 401.
//! - `guard`: the routing rule. No token means `Login`; `Admin` requires the
//!   admin flag and otherwise falls back to `Chat`.
//! - `enter`: the shell itself. Applies the guard without touching the network
//!   when there is no token, otherwise fetches `/api/users/me` and builds a
//!   `ShellFrame` (user identity + menu).
//!
//! ```rust,ignore
//! let frame = nav::enter(&ctx, Route::Admin).await?;
//! if frame.route != Route::Admin {
//!     // non-admins are routed to chat
//! }
//! ```
//!
use crate::common::api::endpoints;
use crate::common::models::User;
use crate::core::context::AppContext;
use crate::core::error::ChatdeskError;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use tracing::{debug, info};

/// Product name shown in the header.
pub const APP_TITLE: &str = "Chatbot System";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Chat,
    Admin,
}

impl Route {
    /// Maps a path to a route. Anything unrecognised lands on chat.
    pub fn from_path(path: &str) -> Route {
        match path.trim().trim_end_matches('/') {
            "/login" | "login" => Route::Login,
            "/admin" | "admin" => Route::Admin,
            _ => Route::Chat,
        }
    }

    pub fn as_path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Chat => "/chat",
            Route::Admin => "/admin",
        }
    }

    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

/// Tracks the current route for this process.
#[derive(Debug)]
pub struct Navigator {
    current: Mutex<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// Starts at the login route; nothing is visible before authentication.
    pub fn new() -> Self {
        Self {
            current: Mutex::new(Route::Login),
        }
    }

    pub fn current(&self) -> Route {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn navigate(&self, route: Route) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        if *current != route {
            debug!("Navigating {} -> {}", *current, route);
        }
        *current = route;
    }

    pub fn redirect_to_login(&self) {
        info!("Redirecting to login");
        self.navigate(Route::Login);
    }
}

/// Resolves the route to show for a request.
///
/// `is_admin` is `None` when the identity is not known yet.
pub fn guard(requested: Route, authenticated: bool, is_admin: Option<bool>) -> Route {
    if requested.is_protected() && !authenticated {
        return Route::Login;
    }
    match requested {
        Route::Admin if is_admin != Some(true) => Route::Chat,
        other => other,
    }
}

/// Entries shown in the sidebar for a user.
pub fn menu_for(user: &User) -> Vec<Route> {
    if user.is_admin {
        vec![Route::Chat, Route::Admin]
    } else {
        vec![Route::Chat]
    }
}

/// The authenticated frame around a view.
#[derive(Debug, Clone)]
pub struct ShellFrame {
    pub user: User,
    pub route: Route,
    pub menu: Vec<Route>,
}

impl ShellFrame {
    /// One-line header: product name, avatar initial and username.
    pub fn header(&self) -> String {
        let initial = self
            .user
            .username
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default();
        let admin_tag = if self.user.is_admin { " (admin)" } else { "" };
        format!(
            "{} | [{}] {}{}",
            APP_TITLE, initial, self.user.username, admin_tag
        )
    }

    pub fn menu_line(&self) -> String {
        self.menu
            .iter()
            .map(|r| {
                let name = match r {
                    Route::Login => "Login",
                    Route::Chat => "Chat",
                    Route::Admin => "Admin",
                };
                if *r == self.route {
                    format!("[{name}]")
                } else {
                    name.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
    }
}

/// Enters a protected view.
///
/// Without a stored token this redirects to login without any network call.
/// A 401 while fetching the identity is handled by the API client (session
/// cleared, navigator at login) and reported as `NotAuthenticated`.
pub async fn enter(ctx: &AppContext, requested: Route) -> Result<ShellFrame, ChatdeskError> {
    let authenticated = ctx.session.is_authenticated();
    if guard(requested, authenticated, None) == Route::Login {
        ctx.navigator.redirect_to_login();
        return Err(ChatdeskError::NotAuthenticated);
    }

    let user: User = match ctx.api.get(endpoints::USERS_ME).await {
        Ok(user) => user,
        Err(e) if e.is_unauthorized() => return Err(ChatdeskError::NotAuthenticated),
        Err(e) => return Err(ChatdeskError::api("Failed to load user information", e)),
    };

    let route = guard(requested, true, Some(user.is_admin));
    ctx.navigator.navigate(route);
    Ok(ShellFrame {
        menu: menu_for(&user),
        user,
        route,
    })
}
