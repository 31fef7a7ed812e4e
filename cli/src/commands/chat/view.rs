//! # Chat View State
//!
//! File: cli/src/commands/chat/view.rs
//!
//! ## Overview
//!
//! `ChatView` is the in-memory state of the chat screen: the conversation
//! list, the selected conversation and its visible messages. Every operation
//! is one awaited request sequence and leaves the view in a stable state,
//! whether it succeeds or fails.
//!
//! ## Sending
//!
//! 1. Blank input or no selection is rejected before any request.
//! 2. The user message is appended optimistically.
//! 3. On success the assistant reply is appended after it.
//! 4. On failure the optimistic message is removed again and a mapped message
//!    is returned.
//! 5. If the visible message count crossed the summarization threshold during
//!    this send, the conversation is summarized once and a returned title
//!    replaces the local one. A failed summary is only logged.
//!
use crate::common::api::{endpoints, ApiClient, ApiError};
use crate::common::models::{
    AssistantReply, Conversation, Message, MessageRole, NewConversation, OutgoingMessage,
    SummaryResponse,
};
use crate::core::context::AppContext;
use crate::core::error::ChatdeskError;
use tracing::{debug, info, warn};

type ViewResult<T> = std::result::Result<T, ChatdeskError>;

/// What a successful send produced.
#[derive(Debug, Clone)]
pub struct SendOutcome {
    pub reply: Message,
    /// New conversation title, when summarization ran and returned one.
    pub new_title: Option<String>,
}

pub struct ChatView {
    api: ApiClient,
    default_title: String,
    summarize_threshold: usize,
    conversations: Vec<Conversation>,
    selected: Option<i64>,
    messages: Vec<Message>,
}

impl ChatView {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            api: ctx.api.clone(),
            default_title: ctx.config.chat.default_title.clone(),
            summarize_threshold: ctx.config.chat.summarize_threshold,
            conversations: Vec::new(),
            selected: None,
            messages: Vec::new(),
        }
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn selected(&self) -> Option<&Conversation> {
        let id = self.selected?;
        self.conversations.iter().find(|c| c.id == id)
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.selected
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Loads the conversation list.
    pub async fn mount(&mut self) -> ViewResult<()> {
        let list: Vec<Conversation> = self
            .api
            .get(endpoints::CONVERSATIONS)
            .await
            .map_err(|e| ChatdeskError::api("Failed to fetch conversations", e))?;
        debug!("Loaded {} conversations", list.len());
        self.conversations = list;
        Ok(())
    }

    /// Creates a conversation, appends it to the list and selects it.
    pub async fn create_conversation(&mut self, title: Option<&str>) -> ViewResult<&Conversation> {
        let title = title
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(self.default_title.as_str())
            .to_string();
        let created: Conversation = self
            .api
            .post(endpoints::CONVERSATIONS, &NewConversation { title })
            .await
            .map_err(|e| ChatdeskError::api("Error creating conversation", e))?;
        info!("Created conversation {} ('{}')", created.id, created.title);

        self.selected = Some(created.id);
        self.messages = created.messages.clone();
        self.conversations.push(created);
        let idx = self.conversations.len() - 1;
        Ok(&self.conversations[idx])
    }

    /// Selects a conversation and replaces the visible messages with the
    /// server's copy. The previous selection is kept if the fetch fails.
    pub async fn select(&mut self, id: i64) -> ViewResult<&Conversation> {
        let fetched: Conversation = self
            .api
            .get(&endpoints::conversation(id))
            .await
            .map_err(|e| {
                let message = match &e {
                    ApiError::NotFound { .. } => "Conversation does not exist or has been deleted",
                    _ => "Failed to load conversation",
                };
                ChatdeskError::api(message, e)
            })?;

        self.selected = Some(fetched.id);
        self.messages = fetched.messages.clone();
        let idx = match self.conversations.iter().position(|c| c.id == fetched.id) {
            Some(idx) => {
                self.conversations[idx] = fetched;
                idx
            }
            None => {
                self.conversations.push(fetched);
                self.conversations.len() - 1
            }
        };
        Ok(&self.conversations[idx])
    }

    /// Sends one user message to the selected conversation.
    pub async fn send_message(&mut self, text: &str) -> ViewResult<SendOutcome> {
        let content = text.trim();
        if content.is_empty() {
            return Err(ChatdeskError::EmptyMessage);
        }
        let conversation_id = self.selected.ok_or(ChatdeskError::NoConversationSelected)?;

        let before = self.messages.len();
        self.messages.push(Message::local(MessageRole::User, content));

        let payload = OutgoingMessage {
            content: content.to_string(),
            role: MessageRole::User,
        };
        let reply: AssistantReply = match self
            .api
            .post(&endpoints::chat_messages(conversation_id), &payload)
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                self.messages.truncate(before);
                let message = send_failure_message(&e);
                return Err(ChatdeskError::api(message, e));
            }
        };

        let reply = reply.into_message();
        self.messages.push(reply.clone());
        let after = self.messages.len();

        let new_title = if crosses_threshold(before, after, self.summarize_threshold) {
            self.summarize(conversation_id).await
        } else {
            None
        };
        Ok(SendOutcome { reply, new_title })
    }

    async fn summarize(&mut self, conversation_id: i64) -> Option<String> {
        debug!("Summarizing conversation {}", conversation_id);
        let summary: SummaryResponse = match self
            .api
            .post(&endpoints::chat_summarize(conversation_id), &serde_json::json!({}))
            .await
        {
            Ok(summary) => summary,
            Err(e) => {
                warn!("Failed to update conversation title: {}", e);
                return None;
            }
        };

        let title = summary.title.filter(|t| !t.trim().is_empty())?;
        if let Some(conv) = self.conversations.iter_mut().find(|c| c.id == conversation_id) {
            conv.title = title.clone();
        }
        info!("Conversation {} retitled to '{}'", conversation_id, title);
        Some(title)
    }
}

/// True when a send moved the visible count from below `threshold` to at or
/// above it.
pub fn crosses_threshold(before: usize, after: usize, threshold: usize) -> bool {
    before < threshold && after >= threshold
}

/// Text shown for a failed send.
pub fn send_failure_message(err: &ApiError) -> &'static str {
    match err.status() {
        Some(401) => "Login expired, please log in again",
        Some(404) => "Conversation does not exist or has been deleted",
        Some(code) if (500..600).contains(&code) => "Server error, please try again later",
        Some(_) => "Failed to send message, please check your network connection",
        None if err.is_network() => "Network error, please check your network connection",
        None => "Failed to send message, please check your network connection",
    }
}
