use async_trait::async_trait;
use serde::Serialize;

use crate::application::ports::mailer::{Mailer, OutgoingEmail};

/// Sends through an HTTP transactional-mail API (Resend/Mailgun style
/// JSON POST with a bearer key).
pub struct HttpMailer {
    client: reqwest::Client,
    api_url: String,
    api_key: Option<String>,
    from: String,
}

impl HttpMailer {
    pub fn new(api_url: &str, api_key: Option<String>, from_name: &str, from_email: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url: api_url.to_string(),
            api_key,
            from: format!("{from_name} <{from_email}>"),
        }
    }
}

#[derive(Serialize)]
struct MailPayload<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()> {
        let payload = MailPayload {
            from: &self.from,
            to: &email.to,
            subject: &email.subject,
            text: &email.text,
        };
        let mut req = self.client.post(&self.api_url).json(&payload);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }
        let resp = req
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("mail request failed: {e}"))?;
        if !resp.status().is_success() {
            anyhow::bail!("mail provider returned status {}", resp.status());
        }
        Ok(())
    }
}

/// Development fallback when no mail provider is configured: logs the
/// message instead of delivering it.
pub struct DevMailer;

#[async_trait]
impl Mailer for DevMailer {
    async fn send(&self, email: &OutgoingEmail) -> anyhow::Result<()> {
        tracing::info!(to = %email.to, subject = %email.subject, body = %email.text, "dev mailer: email not delivered");
        Ok(())
    }
}
