use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::application::ports::user_repository::{UserRepository, UserRow};

pub struct UpdatePassword<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

pub enum PasswordUpdate {
    Updated(UserRow),
    IncorrectPassword,
}

impl<'a, R: UserRepository + ?Sized> UpdatePassword<'a, R> {
    /// `Ok(None)` when the user no longer exists.
    pub async fn execute(
        &self,
        id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> anyhow::Result<Option<PasswordUpdate>> {
        let row = match self.repo.find_by_id_with_password(id).await? {
            Some(r) => r,
            None => return Ok(None),
        };
        let hash = row.password_hash.clone().unwrap_or_default();
        let parsed = PasswordHash::new(&hash).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        if Argon2::default()
            .verify_password(current_password.as_bytes(), &parsed)
            .is_err()
        {
            return Ok(Some(PasswordUpdate::IncorrectPassword));
        }

        let salt = SaltString::generate(&mut OsRng);
        let new_hash = Argon2::default()
            .hash_password(new_password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?
            .to_string();
        self.repo.update_password_hash(id, &new_hash).await?;
        Ok(Some(PasswordUpdate::Updated(UserRow {
            password_hash: None,
            ..row
        })))
    }
}
