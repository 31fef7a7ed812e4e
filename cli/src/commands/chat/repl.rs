//! # Interactive Chat Loop
//!
//! File: cli/src/commands/chat/repl.rs
//!
//! `chatdesk chat repl` reads lines from stdin. Lines starting with `/` are
//! commands; anything else is sent to the selected conversation. Failures are
//! printed and the loop continues, except a 401, which ends the loop because
//! the session is gone.
//!
use super::view::ChatView;
use super::{render_conversations, render_transcript};
use crate::core::error::{ChatdeskError, Result};
use anyhow::Context;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

const HELP: &str = "\
Commands:
  /list          list conversations
  /new [title]   create a conversation and select it
  /use <id>      select a conversation
  /history       show the selected conversation's messages
  /help          show this help
  /quit          leave
Any other line is sent to the selected conversation.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    List,
    New(Option<String>),
    Use(i64),
    History,
    Help,
    Quit,
    Send(String),
    Invalid(String),
}

impl ReplCommand {
    pub fn parse(line: &str) -> ReplCommand {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return ReplCommand::Send(line.to_string());
        };
        let (cmd, arg) = match rest.split_once(char::is_whitespace) {
            Some((cmd, arg)) => (cmd, arg.trim()),
            None => (rest, ""),
        };
        match cmd {
            "list" | "ls" => ReplCommand::List,
            "new" => ReplCommand::New((!arg.is_empty()).then(|| arg.to_string())),
            "use" => match arg.parse() {
                Ok(id) => ReplCommand::Use(id),
                Err(_) => ReplCommand::Invalid(format!("Usage: /use <id> (got '{arg}')")),
            },
            "history" => ReplCommand::History,
            "help" | "?" => ReplCommand::Help,
            "quit" | "exit" | "q" => ReplCommand::Quit,
            other => ReplCommand::Invalid(format!("Unknown command '/{other}'. Type /help.")),
        }
    }
}

/// Runs the loop until `/quit`, end of input or a 401.
pub async fn run<R, W>(view: &mut ChatView, reader: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{HELP}")?;
    let mut lines = reader.lines();
    loop {
        write!(out, "{}> ", prompt_label(view))?;
        out.flush()?;
        let Some(line) = lines.next_line().await.context("Failed to read input")? else {
            writeln!(out)?;
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let command = ReplCommand::parse(&line);
        debug!("repl command: {:?}", command);
        let outcome: std::result::Result<String, ChatdeskError> = match command {
            ReplCommand::Quit => break,
            ReplCommand::Help => Ok(format!("{HELP}\n")),
            ReplCommand::Invalid(msg) => Ok(format!("{msg}\n")),
            ReplCommand::List => view
                .mount()
                .await
                .map(|()| render_conversations(view.conversations(), view.selected_id())),
            ReplCommand::New(title) => view
                .create_conversation(title.as_deref())
                .await
                .map(|c| format!("Created conversation {}: {}\n", c.id, c.title)),
            ReplCommand::Use(id) => view
                .select(id)
                .await
                .map(|c| format!("Selected conversation {}: {}\n", c.id, c.title)),
            ReplCommand::History => match view.selected_id() {
                Some(_) => Ok(render_transcript(view.messages())),
                None => Err(ChatdeskError::NoConversationSelected),
            },
            ReplCommand::Send(text) => view.send_message(&text).await.map(|sent| {
                let mut shown = render_transcript(std::slice::from_ref(&sent.reply));
                if let Some(title) = sent.new_title {
                    shown.push_str(&format!("(conversation renamed to '{title}')\n"));
                }
                shown
            }),
        };

        match outcome {
            Ok(text) => write!(out, "{text}")?,
            Err(e) => {
                writeln!(out, "Error: {e}")?;
                if e.is_unauthorized() {
                    return Err(e.into());
                }
            }
        }
    }
    Ok(())
}

fn prompt_label(view: &ChatView) -> String {
    match view.selected() {
        Some(c) => format!("[{}] {}", c.id, c.title),
        None => "(no conversation)".to_string(),
    }
}
