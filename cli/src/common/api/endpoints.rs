//! Backend REST paths, relative to the configured base URL.

pub const LOGIN: &str = "/api/auth/login";

pub const USERS: &str = "/api/users";
pub const USERS_ME: &str = "/api/users/me";
pub const USERS_BULK: &str = "/api/users/bulk";

pub fn user(id: i64) -> String {
    format!("{USERS}/{id}")
}

pub const ROLES: &str = "/api/roles";

pub const CONVERSATIONS: &str = "/api/conversations";

pub fn conversation(id: i64) -> String {
    format!("{CONVERSATIONS}/{id}")
}

pub fn user_conversations(user_id: i64) -> String {
    format!("{CONVERSATIONS}/user/{user_id}")
}

pub fn chat_messages(conversation_id: i64) -> String {
    format!("/api/chat/messages/{conversation_id}")
}

pub fn chat_summarize(conversation_id: i64) -> String {
    format!("/api/chat/{conversation_id}/summarize")
}
