use chrono::{Duration, Utc};

use crate::application::ports::mailer::{Mailer, OutgoingEmail};
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::auth::reset_tokens;

pub struct ForgotPassword<'a, R: UserRepository + ?Sized, M: Mailer + ?Sized> {
    pub repo: &'a R,
    pub mailer: &'a M,
    pub reset_token_ttl_secs: i64,
}

#[derive(Debug, PartialEq, Eq)]
pub enum ForgotPasswordOutcome {
    EmailSent,
    UnknownEmail,
    /// Dispatch failed; the stored token was cleared so the half-issued
    /// token can never be redeemed.
    SendFailed,
}

impl<'a, R: UserRepository + ?Sized, M: Mailer + ?Sized> ForgotPassword<'a, R, M> {
    /// `reset_url_base` is the prefix the plaintext token is appended to,
    /// e.g. `https://host/api/v1/auth/resetpassword`.
    pub async fn execute(
        &self,
        email: &str,
        reset_url_base: &str,
    ) -> anyhow::Result<ForgotPasswordOutcome> {
        let user = match self.repo.find_by_email(email).await? {
            Some(u) => u,
            None => return Ok(ForgotPasswordOutcome::UnknownEmail),
        };

        let token = reset_tokens::generate();
        let expires_at = Utc::now() + Duration::seconds(self.reset_token_ttl_secs);
        self.repo
            .set_reset_token(user.id, &reset_tokens::hash(&token), expires_at)
            .await?;

        let reset_url = format!("{}/{}", reset_url_base.trim_end_matches('/'), token);
        let message = format!(
            "You are receiving this email because you (or someone else) has \
             requested the reset of a password. Please make a PUT request to:\n\n{reset_url}"
        );
        let mail = OutgoingEmail {
            to: user.email.clone(),
            subject: "Password reset token".into(),
            text: message,
        };
        if let Err(e) = self.mailer.send(&mail).await {
            tracing::error!(error = ?e, "password reset email dispatch failed");
            self.repo.clear_reset_token(user.id).await?;
            return Ok(ForgotPasswordOutcome::SendFailed);
        }
        Ok(ForgotPasswordOutcome::EmailSent)
    }
}
