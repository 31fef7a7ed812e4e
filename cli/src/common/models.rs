//! # Chatdesk REST Data Model (`common::models`)
//!
//! File: cli/src/common/models.rs
//!
//! DTOs mirrored from the backend. They are only ever held in memory for the
//! lifetime of a view; nothing here is cached or persisted locally.
//!
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A backend role. Read-only from this client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

/// A backend user as returned by `/api/users` and `/api/users/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl User {
    pub fn role_names(&self) -> Vec<&str> {
        self.roles.iter().map(|r| r.name.as_str()).collect()
    }
}

/// Who wrote a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    #[serde(alias = "bot")]
    Assistant,
    System,
}

impl MessageRole {
    /// Label shown next to the message in the chat transcript.
    pub fn label(&self) -> &'static str {
        match self {
            MessageRole::User => "Me",
            MessageRole::Assistant => "Bot",
            MessageRole::System => "System",
        }
    }
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
            MessageRole::System => "system",
        };
        f.write_str(tag)
    }
}

/// One chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub id: Option<i64>,
    pub role: MessageRole,
    pub content: String,
    #[serde(
        default,
        rename = "created_at",
        alias = "timestamp",
        deserialize_with = "deserialize_timestamp"
    )]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Message {
    /// A message authored locally, stamped with the current time.
    pub fn local(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: None,
            role,
            content: content.into(),
            timestamp: Some(Utc::now()),
        }
    }
}

/// A conversation. `messages` is empty when the endpoint omits it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub messages: Vec<Message>,
}

/// Body of `POST /api/conversations`.
#[derive(Debug, Clone, Serialize)]
pub struct NewConversation {
    pub title: String,
}

/// Body of `POST /api/chat/messages/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingMessage {
    pub content: String,
    pub role: MessageRole,
}

/// Response of `POST /api/chat/messages/{id}`; only `content` is guaranteed.
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantReply {
    pub content: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

impl AssistantReply {
    pub fn into_message(self) -> Message {
        Message {
            id: self.id,
            role: MessageRole::Assistant,
            content: self.content,
            timestamp: self.created_at.or_else(|| Some(Utc::now())),
        }
    }
}

/// Response of `POST /api/chat/{id}/summarize`.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryResponse {
    #[serde(default)]
    pub title: Option<String>,
}

/// Response of `POST /api/auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

/// Body of `POST /api/users`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub is_admin: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub role_ids: Vec<i64>,
}

/// Body of `PUT /api/users/{id}`; only fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_ids: Option<Vec<i64>>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        *self == UserUpdate::default()
    }
}

/// One row of a bulk import file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRow {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub is_admin: bool,
}

/// Body of `POST /api/users/bulk`.
#[derive(Debug, Clone, Serialize)]
pub struct BulkImportRequest {
    pub users: Vec<ImportRow>,
}

/// A row the server refused, with its reason.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FailedImport {
    pub user: ImportRow,
    pub error: String,
}

/// Response of `POST /api/users/bulk`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BulkImportResult {
    #[serde(default)]
    pub success: Vec<ImportRow>,
    #[serde(default)]
    pub failed: Vec<FailedImport>,
}

/// Renders an optional timestamp in the local timezone for tables.
pub fn format_timestamp(ts: Option<&DateTime<Utc>>) -> String {
    match ts {
        Some(ts) => ts
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S")
            .to_string(),
        None => "-".to_string(),
    }
}

/// Accepts RFC 3339 timestamps and the naive ISO-8601 form the backend emits
/// (`2024-05-01T10:00:00.123456`, read as UTC). Unparseable values become `None`.
fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}
