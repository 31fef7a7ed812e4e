//! # Chatdesk Admin Commands
//!
//! File: cli/src/commands/admin/mod.rs
//!
//! ## Overview
//!
//! The `chatdesk admin` command group: aggregate counts, user and role
//! listings, conversation history across users and user management (add,
//! update, delete, bulk import).
//!
//! Every subcommand enters the shell on the admin route. The shell routes a
//! non-admin to chat instead, and this group then stops with
//! `ChatdeskError::AdminRequired` before loading anything.
//!
//! ## Architecture
//!
//! - `view.rs`: `AdminView`, the screen state and its operations.
//! - `import.rs`: bulk import file parsing and result rendering.
//! - this file: clap definitions, the dispatcher and table rendering.
//!
//! ## Usage
//!
//! ```bash
//! chatdesk admin overview
//! chatdesk admin users
//! chatdesk admin conversations --user 2 --messages
//! chatdesk admin add-user --username carol --password secret3 --admin
//! chatdesk admin update-user 3 --active false
//! chatdesk admin delete-user 3 --yes
//! chatdesk admin import users.csv
//! ```
//!
use crate::commands::chat::render_transcript;
use crate::common::fs::io;
use crate::common::models::{format_timestamp, Conversation, NewUser, Role, User, UserUpdate};
use crate::common::nav::{self, Route};
use crate::common::ui::{prompts, tables};
use crate::core::context::AppContext;
use crate::core::error::{ChatdeskError, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

pub mod import;
pub mod view;

pub use view::{AdminView, Overview};

/// Arguments for the `chatdesk admin` group.
#[derive(Parser, Debug)]
pub struct AdminArgs {
    #[command(subcommand)]
    command: AdminCommand,
}

#[derive(Subcommand, Debug)]
enum AdminCommand {
    /// Show total users, conversations and bots.
    Overview,
    /// List users.
    Users,
    /// List roles and their permissions.
    Roles,
    /// List conversations across all users.
    Conversations {
        /// Only conversations owned by this user id.
        #[arg(long, value_name = "ID")]
        user: Option<i64>,
        /// Also print each conversation's messages (with --user).
        #[arg(long, requires = "user")]
        messages: bool,
    },
    /// Create a user.
    AddUser {
        #[arg(short, long)]
        username: String,
        #[arg(short, long)]
        password: String,
        #[arg(long)]
        email: Option<String>,
        /// Grant administrator rights.
        #[arg(long)]
        admin: bool,
        /// Role ids to assign, comma separated.
        #[arg(long = "roles", value_delimiter = ',', value_name = "IDS")]
        role_ids: Vec<i64>,
    },
    /// Update fields of an existing user. Only the given fields are sent.
    UpdateUser {
        /// User id.
        id: i64,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        password: Option<String>,
        /// Enable or disable the account.
        #[arg(long, value_name = "BOOL")]
        active: Option<bool>,
        /// Replace the user's roles, comma separated ids.
        #[arg(long = "roles", value_delimiter = ',', value_name = "IDS")]
        role_ids: Option<Vec<i64>>,
    },
    /// Delete a user after confirmation.
    DeleteUser {
        /// User id.
        id: i64,
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },
    /// Create users in bulk from a CSV file (username,password,is_admin).
    Import {
        /// Path to the CSV file. The first line is a header.
        file: PathBuf,
    },
}

/// # Handle Admin Command (`handle_admin`)
///
/// Enters the shell on the admin route, rejects non-admins, mounts the view
/// and dispatches.
pub async fn handle_admin(args: AdminArgs, ctx: &AppContext) -> Result<()> {
    let frame = nav::enter(ctx, Route::Admin).await?;
    if frame.route != Route::Admin {
        return Err(ChatdeskError::AdminRequired {
            username: frame.user.username,
        }
        .into());
    }
    info!("Entering admin as '{}'", frame.user.username);

    let mut view = AdminView::new(ctx);
    view.mount().await?;

    match args.command {
        AdminCommand::Overview => print!("{}", render_overview(&view.overview())),
        AdminCommand::Users => print!("{}", render_users(view.users())),
        AdminCommand::Roles => {
            let roles = view.roles().await?;
            print!("{}", render_roles(&roles));
        }
        AdminCommand::Conversations { user, messages } => match user {
            None => print!("{}", render_conversations(view.conversations(), view.users())),
            Some(user_id) => {
                let list = view.user_conversations(user_id).await?;
                print!("{}", render_conversations(&list, view.users()));
                if messages {
                    for conversation in &list {
                        println!("\n# {} (id {})", conversation.title, conversation.id);
                        print!("{}", render_transcript(&conversation.messages));
                    }
                }
            }
        },
        AdminCommand::AddUser {
            username,
            password,
            email,
            admin,
            role_ids,
        } => {
            let created = view
                .create_user(NewUser {
                    username,
                    password,
                    is_admin: admin,
                    email,
                    role_ids,
                })
                .await?;
            println!("User created successfully (id {}: {})", created.id, created.username);
        }
        AdminCommand::UpdateUser {
            id,
            username,
            email,
            password,
            active,
            role_ids,
        } => {
            let update = UserUpdate {
                username,
                email,
                password,
                is_active: active,
                role_ids,
            };
            let updated = view.update_user(id, update).await?;
            println!("User updated successfully (id {}: {})", updated.id, updated.username);
        }
        AdminCommand::DeleteUser { id, yes } => {
            let label = view
                .find_user(id)
                .map(|u| format!("'{}' (id {})", u.username, id))
                .unwrap_or_else(|| format!("id {id}"));
            if !yes && !prompts::confirm(&format!("Delete user {label}?"))? {
                println!("Cancelled.");
                return Ok(());
            }
            view.delete_user(id).await?;
            println!("User deleted successfully");
        }
        AdminCommand::Import { file } => {
            let text = io::read_file_to_string(&file)?;
            let rows = import::parse_user_rows(&text);
            let result = view.import(rows).await?;
            print!("{}", import::render_import_result(&result));
        }
    }
    Ok(())
}

pub fn render_overview(overview: &Overview) -> String {
    let rows = vec![
        vec!["Total Users".to_string(), overview.users.to_string()],
        vec![
            "Total Conversations".to_string(),
            overview.conversations.to_string(),
        ],
        vec!["Total Bots".to_string(), overview.bots.to_string()],
    ];
    tables::render_table(&["Metric", "Count"], &rows)
}

pub fn render_users(users: &[User]) -> String {
    let rows: Vec<Vec<String>> = users
        .iter()
        .map(|u| {
            vec![
                u.id.to_string(),
                u.username.clone(),
                u.email.clone().unwrap_or_else(|| "-".into()),
                tables::yes_no(u.is_admin),
                u.is_active.map(tables::yes_no).unwrap_or_else(|| "-".into()),
                u.role_names().join(", "),
            ]
        })
        .collect();
    tables::render_table(&["ID", "Username", "Email", "Is Admin", "Active", "Roles"], &rows)
}

pub fn render_roles(roles: &[Role]) -> String {
    let rows: Vec<Vec<String>> = roles
        .iter()
        .map(|r| {
            vec![
                r.id.to_string(),
                r.name.clone(),
                r.description.clone().unwrap_or_default(),
                r.permissions.as_deref().unwrap_or_default().join(", "),
            ]
        })
        .collect();
    tables::render_table(&["ID", "Name", "Description", "Permissions"], &rows)
}

/// Conversation table. The owner comes from the conversation itself when the
/// backend includes it, otherwise from the loaded user list.
pub fn render_conversations(conversations: &[Conversation], users: &[User]) -> String {
    let rows: Vec<Vec<String>> = conversations
        .iter()
        .map(|c| {
            let owner = c
                .username
                .clone()
                .or_else(|| {
                    let uid = c.user_id?;
                    users.iter().find(|u| u.id == uid).map(|u| u.username.clone())
                })
                .unwrap_or_else(|| "-".into());
            vec![
                c.id.to_string(),
                c.title.clone(),
                owner,
                format_timestamp(c.created_at.as_ref()),
                c.messages.len().to_string(),
            ]
        })
        .collect();
    tables::render_table(&["ID", "Title", "User", "Created At", "Messages"], &rows)
}
