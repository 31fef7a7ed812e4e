//! # Chatdesk Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`:
//!
//! - `chatdesk_cmd()`: an `assert_cmd::Command` for the compiled binary.
//! - `MockBackend`: an in-process `axum` imitation of the chatbot backend,
//!   served on `127.0.0.1:0` from its own thread and runtime so both blocking
//!   binary tests and `#[tokio::test]` library tests can talk to it. Every
//!   request is recorded (method, path, Authorization header, body).
//! - `test_context()`: an `AppContext` pointed at a mock backend with the
//!   session file in a temporary directory.
//!
//! Seeded accounts: `alice`/`secret1` (admin, id 1) and `bob`/`secret2`
//! (regular user, id 2). The token issued to a user is `token-<username>`.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;

use axum::body::{to_bytes, Body};
use axum::extract::{Form, Path as UrlPath, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use chatdesk::core::config::Config;
use chatdesk::core::context::AppContext;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::JoinHandle;

/// Creates a command for the `chatdesk` binary with no inherited CHATDESK_*
/// variables and logging quiet unless a test asks otherwise.
pub fn chatdesk_cmd() -> Command {
    let mut cmd =
        Command::cargo_bin("chatdesk").expect("Failed to find chatdesk binary for testing");
    cmd.env_remove("CHATDESK_BASE_URL")
        .env_remove("CHATDESK_SESSION_FILE")
        .env_remove("CHATDESK_TIMEOUT")
        .env_remove("CHATDESK_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Builds a context for library-level tests.
pub fn test_context(backend: &MockBackend, session_file: &Path) -> AppContext {
    let mut config = Config::default();
    config.api.base_url = backend.base_url.clone();
    config.api.timeout_secs = 5;
    config.session.file = session_file.to_string_lossy().into_owned();
    AppContext::from_config(config).expect("Failed to build test context")
}

/// One request as seen by the mock backend.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub authorization: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone)]
struct MockUser {
    id: i64,
    username: String,
    password: String,
    email: Option<String>,
    is_admin: bool,
    is_active: bool,
}

impl MockUser {
    fn to_json(&self) -> Value {
        let role = if self.is_admin {
            json!({"id": 1, "name": "admin", "description": "Administrator", "permissions": ["manage_users", "chat"]})
        } else {
            json!({"id": 2, "name": "user", "description": "Regular user", "permissions": ["chat"]})
        };
        json!({
            "id": self.id,
            "username": self.username,
            "email": self.email,
            "is_admin": self.is_admin,
            "is_active": self.is_active,
            "roles": [role],
        })
    }
}

#[derive(Debug, Clone)]
struct MockConversation {
    id: i64,
    user_id: i64,
    title: String,
    messages: Vec<(String, String)>,
}

impl MockConversation {
    fn to_json(&self) -> Value {
        let messages: Vec<Value> = self
            .messages
            .iter()
            .enumerate()
            .map(|(i, (role, content))| {
                json!({
                    "id": i + 1,
                    "conversation_id": self.id,
                    "role": role,
                    "content": content,
                    "created_at": "2024-05-01T10:00:00.000000",
                })
            })
            .collect();
        json!({
            "id": self.id,
            "user_id": self.user_id,
            "title": self.title,
            "created_at": "2024-05-01T09:00:00.000000",
            "updated_at": "2024-05-01T09:00:00.000000",
            "messages": messages,
        })
    }
}

#[derive(Debug)]
struct MockState {
    requests: Vec<RecordedRequest>,
    users: Vec<MockUser>,
    conversations: Vec<MockConversation>,
    next_user_id: i64,
    next_conversation_id: i64,
    summarize_calls: usize,
    /// When set, every request except login answers with this status.
    forced_status: Option<u16>,
    /// Requests whose path ends with the suffix answer with the status.
    failing_paths: Vec<(String, u16)>,
}

impl MockState {
    fn seeded() -> Self {
        let user = |id: i64, name: &str, password: &str, is_admin: bool| MockUser {
            id,
            username: name.to_string(),
            password: password.to_string(),
            email: Some(format!("{name}@example.com")),
            is_admin,
            is_active: true,
        };
        Self {
            requests: Vec::new(),
            users: vec![
                user(1, "alice", "secret1", true),
                user(2, "bob", "secret2", false),
            ],
            conversations: Vec::new(),
            next_user_id: 3,
            next_conversation_id: 1,
            summarize_calls: 0,
            forced_status: None,
            failing_paths: Vec::new(),
        }
    }

    fn user_for(&self, headers: &HeaderMap) -> Option<MockUser> {
        let auth = headers.get("authorization")?.to_str().ok()?;
        let username = auth.strip_prefix("Bearer token-")?;
        self.users.iter().find(|u| u.username == username).cloned()
    }

    fn add_user(&mut self, username: &str, password: &str, is_admin: bool, email: Option<String>) -> MockUser {
        let user = MockUser {
            id: self.next_user_id,
            username: username.to_string(),
            password: password.to_string(),
            email,
            is_admin,
            is_active: true,
        };
        self.next_user_id += 1;
        self.users.push(user.clone());
        user
    }
}

type Shared = Arc<Mutex<MockState>>;

fn lock(state: &Shared) -> MutexGuard<'_, MockState> {
    state.lock().unwrap_or_else(|e| e.into_inner())
}

fn detail(status: StatusCode, text: &str) -> Response {
    (status, Json(json!({ "detail": text }))).into_response()
}

fn unauthorized() -> Response {
    detail(StatusCode::UNAUTHORIZED, "Could not validate credentials")
}

/// The in-process mock backend. Stops when dropped.
pub struct MockBackend {
    pub base_url: String,
    state: Shared,
    shutdown: Option<tokio::sync::oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl MockBackend {
    pub fn start() -> Self {
        let state: Shared = Arc::new(Mutex::new(MockState::seeded()));
        let listener =
            std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind mock backend");
        listener
            .set_nonblocking(true)
            .expect("Failed to set mock listener non-blocking");
        let addr = listener.local_addr().expect("Mock listener has no address");
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();

        let app = router(state.clone());
        let thread = std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to build mock backend runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener)
                    .expect("Failed to adopt mock listener");
                axum::serve(listener, app)
                    .with_graceful_shutdown(async {
                        let _ = rx.await;
                    })
                    .await
                    .expect("Mock backend failed");
            });
        });

        Self {
            base_url: format!("http://{addr}"),
            state,
            shutdown: Some(tx),
            thread: Some(thread),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.state).requests.clone()
    }

    /// Requests whose path starts with `prefix`.
    pub fn requests_to(&self, prefix: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path.starts_with(prefix))
            .collect()
    }

    pub fn clear_requests(&self) {
        lock(&self.state).requests.clear();
    }

    pub fn summarize_calls(&self) -> usize {
        lock(&self.state).summarize_calls
    }

    /// Makes every request except login answer with `status`.
    pub fn force_status(&self, status: Option<u16>) {
        lock(&self.state).forced_status = status;
    }

    /// Makes requests whose path ends with `suffix` answer with `status`.
    pub fn fail_path(&self, suffix: &str, status: u16) {
        lock(&self.state)
            .failing_paths
            .push((suffix.to_string(), status));
    }

    pub fn has_user(&self, username: &str) -> bool {
        lock(&self.state).users.iter().any(|u| u.username == username)
    }

    pub fn user_count(&self) -> usize {
        lock(&self.state).users.len()
    }

    /// Seeds a conversation for `user_id` and returns its id.
    pub fn seed_conversation(&self, user_id: i64, title: &str, messages: &[(&str, &str)]) -> i64 {
        let mut state = lock(&self.state);
        let id = state.next_conversation_id;
        state.next_conversation_id += 1;
        state.conversations.push(MockConversation {
            id,
            user_id,
            title: title.to_string(),
            messages: messages
                .iter()
                .map(|(r, c)| (r.to_string(), c.to_string()))
                .collect(),
        });
        id
    }

    pub fn conversation_title(&self, id: i64) -> Option<String> {
        lock(&self.state)
            .conversations
            .iter()
            .find(|c| c.id == id)
            .map(|c| c.title.clone())
    }
}

impl Drop for MockBackend {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/users/me", get(me))
        .route("/api/users/bulk", post(bulk_create))
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/{id}", put(update_user).delete(delete_user))
        .route("/api/roles", get(list_roles))
        .route(
            "/api/conversations",
            get(list_conversations).post(create_conversation),
        )
        .route("/api/conversations/{id}", get(get_conversation))
        .route("/api/conversations/user/{id}", get(user_conversations))
        .route("/api/chat/messages/{id}", post(send_message))
        .route("/api/chat/{id}/summarize", post(summarize))
        .layer(middleware::from_fn_with_state(state.clone(), record))
        .with_state(state)
}

/// Records every request and applies the forced status, if any.
async fn record(State(state): State<Shared>, req: Request, next: Next) -> Response {
    let (parts, body) = req.into_parts();
    let bytes = to_bytes(body, usize::MAX).await.unwrap_or_default();
    let path = parts.uri.path().to_string();
    let forced = {
        let mut st = lock(&state);
        st.requests.push(RecordedRequest {
            method: parts.method.to_string(),
            path: path.clone(),
            authorization: parts
                .headers
                .get("authorization")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
            body: String::from_utf8_lossy(&bytes).into_owned(),
        });
        let by_path = st
            .failing_paths
            .iter()
            .find(|(suffix, _)| path.ends_with(suffix.as_str()))
            .map(|(_, code)| *code);
        by_path.or(st.forced_status.filter(|_| path != "/api/auth/login"))
    };
    if let Some(code) = forced {
        let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        return detail(status, "Forced failure");
    }
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

#[derive(Deserialize)]
struct LoginForm {
    username: String,
    password: String,
}

async fn login(State(state): State<Shared>, Form(form): Form<LoginForm>) -> Response {
    let st = lock(&state);
    match st
        .users
        .iter()
        .find(|u| u.username == form.username && u.password == form.password)
    {
        Some(user) => Json(json!({
            "access_token": format!("token-{}", user.username),
            "token_type": "bearer",
        }))
        .into_response(),
        None => detail(StatusCode::UNAUTHORIZED, "Incorrect username or password"),
    }
}

async fn me(State(state): State<Shared>, headers: HeaderMap) -> Response {
    match lock(&state).user_for(&headers) {
        Some(user) => Json(user.to_json()).into_response(),
        None => unauthorized(),
    }
}

/// Resolves the caller and requires the admin flag.
fn require_admin(st: &MockState, headers: &HeaderMap) -> Result<MockUser, Response> {
    let user = st.user_for(headers).ok_or_else(unauthorized)?;
    if !user.is_admin {
        return Err(detail(StatusCode::FORBIDDEN, "Not authorized"));
    }
    Ok(user)
}

async fn list_users(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let st = lock(&state);
    if let Err(resp) = require_admin(&st, &headers) {
        return resp;
    }
    let users: Vec<Value> = st.users.iter().map(MockUser::to_json).collect();
    Json(users).into_response()
}

#[derive(Deserialize)]
struct CreateUserBody {
    username: String,
    password: String,
    #[serde(default)]
    is_admin: bool,
    #[serde(default)]
    email: Option<String>,
}

async fn create_user(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<CreateUserBody>,
) -> Response {
    let mut st = lock(&state);
    if let Err(resp) = require_admin(&st, &headers) {
        return resp;
    }
    if st.users.iter().any(|u| u.username == body.username) {
        return detail(StatusCode::BAD_REQUEST, "Username already registered");
    }
    let user = st.add_user(&body.username, &body.password, body.is_admin, body.email);
    Json(user.to_json()).into_response()
}

async fn update_user(
    State(state): State<Shared>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<i64>,
    Json(body): Json<Value>,
) -> Response {
    let mut st = lock(&state);
    if let Err(resp) = require_admin(&st, &headers) {
        return resp;
    }
    let Some(user) = st.users.iter_mut().find(|u| u.id == id) else {
        return detail(StatusCode::NOT_FOUND, "User not found");
    };
    if let Some(name) = body.get("username").and_then(Value::as_str) {
        user.username = name.to_string();
    }
    if let Some(email) = body.get("email").and_then(Value::as_str) {
        user.email = Some(email.to_string());
    }
    if let Some(password) = body.get("password").and_then(Value::as_str) {
        user.password = password.to_string();
    }
    if let Some(active) = body.get("is_active").and_then(Value::as_bool) {
        user.is_active = active;
    }
    Json(user.to_json()).into_response()
}

async fn delete_user(
    State(state): State<Shared>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<i64>,
) -> Response {
    let mut st = lock(&state);
    if let Err(resp) = require_admin(&st, &headers) {
        return resp;
    }
    let before = st.users.len();
    st.users.retain(|u| u.id != id);
    if st.users.len() == before {
        return detail(StatusCode::NOT_FOUND, "User not found");
    }
    Json(json!({ "message": "User deleted successfully" })).into_response()
}

async fn bulk_create(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut st = lock(&state);
    if let Err(resp) = require_admin(&st, &headers) {
        return resp;
    }
    let rows = body
        .get("users")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    let mut success = Vec::new();
    let mut failed = Vec::new();
    for row in rows {
        let username = row.get("username").and_then(Value::as_str).unwrap_or_default();
        let password = row.get("password").and_then(Value::as_str).unwrap_or_default();
        let is_admin = row.get("is_admin").and_then(Value::as_bool).unwrap_or(false);
        if username == "taken" || st.users.iter().any(|u| u.username == username) {
            failed.push(json!({ "user": row, "error": "Username already exists" }));
            continue;
        }
        st.add_user(username, password, is_admin, None);
        success.push(row);
    }
    Json(json!({ "success": success, "failed": failed })).into_response()
}

async fn list_roles(State(state): State<Shared>, headers: HeaderMap) -> Response {
    if lock(&state).user_for(&headers).is_none() {
        return unauthorized();
    }
    Json(json!([
        {"id": 1, "name": "admin", "description": "Administrator", "permissions": ["manage_users", "chat"]},
        {"id": 2, "name": "user", "description": "Regular user", "permissions": ["chat"]},
    ]))
    .into_response()
}

async fn list_conversations(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let st = lock(&state);
    let Some(user) = st.user_for(&headers) else {
        return unauthorized();
    };
    let list: Vec<Value> = st
        .conversations
        .iter()
        .filter(|c| c.user_id == user.id)
        .map(MockConversation::to_json)
        .collect();
    Json(list).into_response()
}

#[derive(Deserialize)]
struct NewConversationBody {
    title: String,
}

async fn create_conversation(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<NewConversationBody>,
) -> Response {
    let mut st = lock(&state);
    let Some(user) = st.user_for(&headers) else {
        return unauthorized();
    };
    let conversation = MockConversation {
        id: st.next_conversation_id,
        user_id: user.id,
        title: body.title,
        messages: Vec::new(),
    };
    st.next_conversation_id += 1;
    let rendered = conversation.to_json();
    st.conversations.push(conversation);
    Json(rendered).into_response()
}

async fn get_conversation(
    State(state): State<Shared>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<i64>,
) -> Response {
    let st = lock(&state);
    let Some(user) = st.user_for(&headers) else {
        return unauthorized();
    };
    match st
        .conversations
        .iter()
        .find(|c| c.id == id && c.user_id == user.id)
    {
        Some(c) => Json(c.to_json()).into_response(),
        None => detail(StatusCode::NOT_FOUND, "Conversation not found"),
    }
}

async fn user_conversations(
    State(state): State<Shared>,
    headers: HeaderMap,
    UrlPath(user_id): UrlPath<i64>,
) -> Response {
    let st = lock(&state);
    if let Err(resp) = require_admin(&st, &headers) {
        return resp;
    }
    let list: Vec<Value> = st
        .conversations
        .iter()
        .filter(|c| c.user_id == user_id)
        .map(MockConversation::to_json)
        .collect();
    Json(list).into_response()
}

#[derive(Deserialize)]
struct MessageBody {
    content: String,
    role: String,
}

async fn send_message(
    State(state): State<Shared>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<i64>,
    Json(body): Json<MessageBody>,
) -> Response {
    let mut st = lock(&state);
    let Some(user) = st.user_for(&headers) else {
        return unauthorized();
    };
    let Some(conversation) = st
        .conversations
        .iter_mut()
        .find(|c| c.id == id && c.user_id == user.id)
    else {
        return detail(StatusCode::NOT_FOUND, "Conversation not found");
    };
    let reply = format!("Echo: {}", body.content);
    conversation.messages.push((body.role, body.content));
    conversation
        .messages
        .push(("assistant".to_string(), reply.clone()));
    let reply_id = conversation.messages.len();
    Json(json!({
        "id": reply_id,
        "content": reply,
        "role": "assistant",
        "created_at": "2024-05-01T10:00:01.000000",
    }))
    .into_response()
}

async fn summarize(
    State(state): State<Shared>,
    headers: HeaderMap,
    UrlPath(id): UrlPath<i64>,
) -> Response {
    let mut st = lock(&state);
    let Some(user) = st.user_for(&headers) else {
        return unauthorized();
    };
    st.summarize_calls += 1;
    let Some(conversation) = st
        .conversations
        .iter_mut()
        .find(|c| c.id == id && c.user_id == user.id)
    else {
        return detail(StatusCode::NOT_FOUND, "Conversation not found");
    };
    let first = conversation
        .messages
        .first()
        .map(|(_, content)| content.clone())
        .unwrap_or_default();
    conversation.title = format!("About {first}");
    Json(json!({ "title": conversation.title })).into_response()
}
