//! # Chatdesk Chat Commands
//!
//! File: cli/src/commands/chat/mod.rs
//!
//! ## Overview
//!
//! The `chatdesk chat` command group: list, create and read conversations and
//! talk to the bot, either one message at a time or in an interactive loop.
//! Every subcommand first enters the authenticated shell (`common::nav::enter`),
//! so a missing session fails before any chat request is made.
//!
//! ## Architecture
//!
//! - `view.rs`: `ChatView`, the screen state and its operations.
//! - `repl.rs`: the interactive loop on top of `ChatView`.
//! - this file: clap definitions, the dispatcher and transcript rendering.
//!
//! ## Usage
//!
//! ```bash
//! chatdesk chat list
//! chatdesk chat new --title "Trip plans"
//! chatdesk chat show 3
//! chatdesk chat send --conversation 3 "hello"
//! chatdesk chat repl
//! ```
//!
use crate::common::models::{format_timestamp, Conversation, Message};
use crate::common::nav::{self, Route};
use crate::common::ui::tables;
use crate::core::context::AppContext;
use crate::core::error::Result;
use clap::{Parser, Subcommand};
use tracing::info;

pub mod repl;
pub mod view;

pub use view::ChatView;

/// Arguments for the `chatdesk chat` group.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    #[command(subcommand)]
    command: ChatCommand,
}

#[derive(Subcommand, Debug)]
enum ChatCommand {
    /// List your conversations.
    List,
    /// Create a conversation.
    New {
        /// Title for the new conversation (defaults to the configured title).
        #[arg(short, long)]
        title: Option<String>,
    },
    /// Show a conversation and its messages.
    Show {
        /// Conversation id.
        id: i64,
    },
    /// Send one message and print the reply.
    Send {
        /// Conversation to send to.
        #[arg(short, long = "conversation", value_name = "ID")]
        conversation: i64,
        /// Message text. Multiple words are joined with spaces.
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },
    /// Start an interactive chat session.
    Repl,
}

/// # Handle Chat Command (`handle_chat`)
///
/// Enters the shell on the chat route, mounts the view and dispatches.
pub async fn handle_chat(args: ChatArgs, ctx: &AppContext) -> Result<()> {
    let frame = nav::enter(ctx, Route::Chat).await?;
    info!("Entering chat as '{}'", frame.user.username);

    let mut view = ChatView::new(ctx);
    view.mount().await?;

    match args.command {
        ChatCommand::List => {
            print!("{}", render_conversations(view.conversations(), None));
        }
        ChatCommand::New { title } => {
            let created = view.create_conversation(title.as_deref()).await?;
            println!("Created conversation {}: {}", created.id, created.title);
        }
        ChatCommand::Show { id } => {
            let conversation = view.select(id).await?;
            println!("# {} (id {})", conversation.title, conversation.id);
            print!("{}", render_transcript(view.messages()));
        }
        ChatCommand::Send { conversation, text } => {
            view.select(conversation).await?;
            let sent = view.send_message(&text.join(" ")).await?;
            let shown = view.messages().len().saturating_sub(2);
            print!("{}", render_transcript(&view.messages()[shown..]));
            if let Some(title) = sent.new_title {
                println!("(conversation renamed to '{title}')");
            }
        }
        ChatCommand::Repl => {
            println!("{}", frame.header());
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = std::io::stdout();
            repl::run(&mut view, stdin, &mut stdout).await?;
        }
    }
    Ok(())
}

/// One line per message: `[time] Me: text`.
pub fn render_transcript(messages: &[Message]) -> String {
    if messages.is_empty() {
        return "(no messages yet)\n".to_string();
    }
    messages
        .iter()
        .map(|m| {
            format!(
                "[{}] {}: {}\n",
                format_timestamp(m.timestamp.as_ref()),
                m.role.label(),
                m.content
            )
        })
        .collect()
}

/// Conversation list table; the selected entry is marked with `*`.
pub fn render_conversations(conversations: &[Conversation], selected: Option<i64>) -> String {
    if conversations.is_empty() {
        return "(no conversations)\n".to_string();
    }
    let rows: Vec<Vec<String>> = conversations
        .iter()
        .map(|c| {
            vec![
                if Some(c.id) == selected { "*" } else { "" }.to_string(),
                c.id.to_string(),
                c.title.clone(),
                format_timestamp(c.created_at.as_ref()),
            ]
        })
        .collect();
    tables::render_table(&["", "ID", "Title", "Created"], &rows)
}
