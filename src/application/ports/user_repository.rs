use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::users::Role;

#[derive(Debug, Clone)]
pub struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        role: Role,
        password_hash: &str,
    ) -> anyhow::Result<UserRow>;
    /// Includes the password hash, for credential checks.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRow>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRow>>;
    /// Like `find_by_id` but includes the password hash.
    async fn find_by_id_with_password(&self, id: Uuid) -> anyhow::Result<Option<UserRow>>;
    async fn update_details(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
    ) -> anyhow::Result<Option<UserRow>>;
    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> anyhow::Result<bool>;
    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> anyhow::Result<()>;
    async fn clear_reset_token(&self, id: Uuid) -> anyhow::Result<()>;
    /// Matches only when the stored token is unexpired as of `now`.
    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<UserRow>>;
}
