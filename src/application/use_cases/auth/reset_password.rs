use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use chrono::Utc;
use password_hash::rand_core::OsRng;

use crate::application::ports::user_repository::{UserRepository, UserRow};
use crate::application::use_cases::auth::reset_tokens;

pub struct ResetPassword<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> ResetPassword<'a, R> {
    /// `Ok(None)` when the token is unknown or expired.
    pub async fn execute(
        &self,
        token: &str,
        new_password: &str,
    ) -> anyhow::Result<Option<UserRow>> {
        let token_hash = reset_tokens::hash(token);
        let user = match self
            .repo
            .find_by_reset_token(&token_hash, Utc::now())
            .await?
        {
            Some(u) => u,
            None => return Ok(None),
        };

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(new_password.as_bytes(), &salt)
            .map_err(|e| anyhow::anyhow!(e.to_string()))?
            .to_string();
        self.repo.update_password_hash(user.id, &hash).await?;
        self.repo.clear_reset_token(user.id).await?;
        Ok(Some(UserRow {
            password_hash: None,
            ..user
        }))
    }
}
