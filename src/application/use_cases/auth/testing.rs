//! In-memory `UserRepository` used by the use-case tests.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::application::ports::user_repository::{UserRepository, UserRow};
use crate::domain::users::Role;

#[derive(Debug, Clone)]
struct StoredUser {
    row: UserRow,
    reset_token_hash: Option<String>,
    reset_expires_at: Option<DateTime<Utc>>,
}

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<StoredUser>>,
}

impl InMemoryUsers {
    pub fn reset_token_hash(&self, id: Uuid) -> Option<String> {
        let users = self.users.lock().unwrap();
        users
            .iter()
            .find(|u| u.row.id == id)
            .and_then(|u| u.reset_token_hash.clone())
    }

    /// Backdates the stored reset-token expiry, for expiry tests.
    pub fn expire_reset_token(&self, id: Uuid) {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.row.id == id) {
            u.reset_expires_at = Some(Utc::now() - chrono::Duration::seconds(1));
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn create_user(
        &self,
        name: &str,
        email: &str,
        role: Role,
        password_hash: &str,
    ) -> anyhow::Result<UserRow> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.row.email == email) {
            anyhow::bail!("duplicate email");
        }
        let row = UserRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            role,
            password_hash: Some(password_hash.to_string()),
            created_at: Utc::now(),
        };
        users.push(StoredUser {
            row: row.clone(),
            reset_token_hash: None,
            reset_expires_at: None,
        });
        Ok(row)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<UserRow>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| u.row.email == email)
            .map(|u| u.row.clone()))
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRow>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.row.id == id).map(|u| UserRow {
            password_hash: None,
            ..u.row.clone()
        }))
    }

    async fn find_by_id_with_password(&self, id: Uuid) -> anyhow::Result<Option<UserRow>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.row.id == id).map(|u| u.row.clone()))
    }

    async fn update_details(
        &self,
        id: Uuid,
        name: &str,
        email: &str,
    ) -> anyhow::Result<Option<UserRow>> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.row.id == id) {
            Some(u) => {
                u.row.name = name.to_string();
                u.row.email = email.to_string();
                Ok(Some(UserRow {
                    password_hash: None,
                    ..u.row.clone()
                }))
            }
            None => Ok(None),
        }
    }

    async fn update_password_hash(&self, id: Uuid, password_hash: &str) -> anyhow::Result<bool> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.row.id == id) {
            Some(u) => {
                u.row.password_hash = Some(password_hash.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_reset_token(
        &self,
        id: Uuid,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> anyhow::Result<()> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.row.id == id) {
            u.reset_token_hash = Some(token_hash.to_string());
            u.reset_expires_at = Some(expires_at);
        }
        Ok(())
    }

    async fn clear_reset_token(&self, id: Uuid) -> anyhow::Result<()> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.row.id == id) {
            u.reset_token_hash = None;
            u.reset_expires_at = None;
        }
        Ok(())
    }

    async fn find_by_reset_token(
        &self,
        token_hash: &str,
        now: DateTime<Utc>,
    ) -> anyhow::Result<Option<UserRow>> {
        let users = self.users.lock().unwrap();
        Ok(users
            .iter()
            .find(|u| {
                u.reset_token_hash.as_deref() == Some(token_hash)
                    && u.reset_expires_at.map(|e| e > now).unwrap_or(false)
            })
            .map(|u| u.row.clone()))
    }
}

/// Mailer stub that records sent mail, optionally failing every send.
use crate::application::ports::mailer::{Mailer, OutgoingEmail};

#[derive(Default)]
pub struct RecordingMailer {
    pub fail: bool,
    pub sent: Mutex<Vec<OutgoingEmail>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("smtp unreachable");
        }
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}
