//! # Admin View State
//!
//! File: cli/src/commands/admin/view.rs
//!
//! `AdminView` holds the user and conversation lists shown on the admin
//! screen and the management operations on top of them. Mutations refresh the
//! user list afterwards; a failed refresh is logged and does not turn a
//! successful mutation into an error.
//!
use crate::common::api::{endpoints, ApiClient};
use crate::common::models::{
    BulkImportRequest, BulkImportResult, Conversation, ImportRow, NewUser, Role, User, UserUpdate,
};
use crate::core::context::AppContext;
use crate::core::error::ChatdeskError;
use tracing::{debug, info, warn};

type ViewResult<T> = std::result::Result<T, ChatdeskError>;

/// The bot count is fixed; there is exactly one bot.
pub const TOTAL_BOTS: usize = 1;

/// Aggregate counts for the overview panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overview {
    pub users: usize,
    pub conversations: usize,
    pub bots: usize,
}

pub struct AdminView {
    api: ApiClient,
    users: Vec<User>,
    conversations: Vec<Conversation>,
}

impl AdminView {
    pub fn new(ctx: &AppContext) -> Self {
        Self {
            api: ctx.api.clone(),
            users: Vec::new(),
            conversations: Vec::new(),
        }
    }

    /// Loads users and conversations.
    pub async fn mount(&mut self) -> ViewResult<()> {
        self.refresh_users().await?;
        self.refresh_conversations().await
    }

    pub async fn refresh_users(&mut self) -> ViewResult<()> {
        self.users = self
            .api
            .get(endpoints::USERS)
            .await
            .map_err(|e| ChatdeskError::api("Failed to fetch users", e))?;
        debug!("Loaded {} users", self.users.len());
        Ok(())
    }

    pub async fn refresh_conversations(&mut self) -> ViewResult<()> {
        self.conversations = self
            .api
            .get(endpoints::CONVERSATIONS)
            .await
            .map_err(|e| ChatdeskError::api("Failed to fetch conversations", e))?;
        debug!("Loaded {} conversations", self.conversations.len());
        Ok(())
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn find_user(&self, id: i64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn overview(&self) -> Overview {
        Overview {
            users: self.users.len(),
            conversations: self.conversations.len(),
            bots: TOTAL_BOTS,
        }
    }

    pub async fn roles(&self) -> ViewResult<Vec<Role>> {
        self.api
            .get(endpoints::ROLES)
            .await
            .map_err(|e| ChatdeskError::api("Failed to fetch roles", e))
    }

    /// Conversations owned by one user, with their messages.
    pub async fn user_conversations(&self, user_id: i64) -> ViewResult<Vec<Conversation>> {
        self.api
            .get(&endpoints::user_conversations(user_id))
            .await
            .map_err(|e| ChatdeskError::api("Failed to fetch conversations", e))
    }

    pub async fn create_user(&mut self, user: NewUser) -> ViewResult<User> {
        if user.username.trim().is_empty() {
            return Err(ChatdeskError::Validation("Please input username".into()));
        }
        if user.password.is_empty() {
            return Err(ChatdeskError::Validation("Please input password".into()));
        }
        let created: User = self
            .api
            .post(endpoints::USERS, &user)
            .await
            .map_err(|e| ChatdeskError::api("Failed to create user", e))?;
        info!("Created user {} ('{}')", created.id, created.username);
        self.refresh_users_after("create").await;
        Ok(created)
    }

    pub async fn update_user(&mut self, id: i64, update: UserUpdate) -> ViewResult<User> {
        if update.is_empty() {
            return Err(ChatdeskError::Validation(
                "Nothing to update; pass at least one field".into(),
            ));
        }
        let updated: User = self
            .api
            .put(&endpoints::user(id), &update)
            .await
            .map_err(|e| ChatdeskError::api("Failed to update user", e))?;
        info!("Updated user {}", id);
        self.refresh_users_after("update").await;
        Ok(updated)
    }

    pub async fn delete_user(&mut self, id: i64) -> ViewResult<()> {
        self.api
            .delete(&endpoints::user(id))
            .await
            .map_err(|e| ChatdeskError::api("Failed to delete user", e))?;
        info!("Deleted user {}", id);
        self.refresh_users_after("delete").await;
        Ok(())
    }

    /// Submits parsed import rows in one batch. An empty batch is rejected
    /// without a request.
    pub async fn import(&mut self, users: Vec<ImportRow>) -> ViewResult<BulkImportResult> {
        if users.is_empty() {
            return Err(ChatdeskError::Import(
                "No valid user rows found (expected: username,password,is_admin)".into(),
            ));
        }
        debug!("Importing {} users", users.len());
        let result: BulkImportResult = self
            .api
            .post(endpoints::USERS_BULK, &BulkImportRequest { users })
            .await
            .map_err(|e| ChatdeskError::api("Failed to process file", e))?;
        info!(
            "Import finished: {} created, {} failed",
            result.success.len(),
            result.failed.len()
        );
        self.refresh_users_after("import").await;
        Ok(result)
    }

    async fn refresh_users_after(&mut self, action: &str) {
        if let Err(e) = self.refresh_users().await {
            warn!("User list refresh after {} failed: {}", action, e);
        }
    }
}
