use serde::Serialize;
use tracing::{error, info};

use crate::domain::mail::MailMessage;
use crate::domain::repository::Mailer;
use crate::error::AuthServiceError;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

// ── Resend ────────────────────────────────────────────────────────────────────

/// Delivers mail through the Resend HTTP API.
#[derive(Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    sender: String,
}

#[derive(Serialize)]
struct ResendPayload<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

impl ResendMailer {
    pub fn new(api_key: String, sender: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            sender,
        }
    }
}

impl Mailer for ResendMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), AuthServiceError> {
        let payload = ResendPayload {
            from: &self.sender,
            to: [&message.to],
            subject: &message.subject,
            html: &message.html,
            text: &message.text,
        };
        let response = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|error| {
                error!(%error, to = %message.to, "mail request failed");
                AuthServiceError::EmailDeliveryFailed
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, body, to = %message.to, "mail provider rejected message");
            return Err(AuthServiceError::EmailDeliveryFailed);
        }
        Ok(())
    }
}

// ── Log-only sender ───────────────────────────────────────────────────────────

/// Development fallback when no API key is configured: logs the message
/// instead of sending it, so local flows still surface codes and links.
#[derive(Clone)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), AuthServiceError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.text,
            "mail delivery skipped (no provider configured)"
        );
        Ok(())
    }
}

// ── Runtime selection ─────────────────────────────────────────────────────────

/// Concrete mailer chosen at startup. An enum rather than a trait object so
/// usecases stay generic over the [`Mailer`] port.
#[derive(Clone)]
pub enum AppMailer {
    Resend(ResendMailer),
    Log(LogMailer),
}

impl Mailer for AppMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), AuthServiceError> {
        match self {
            Self::Resend(mailer) => mailer.send(message).await,
            Self::Log(mailer) => mailer.send(message).await,
        }
    }
}
