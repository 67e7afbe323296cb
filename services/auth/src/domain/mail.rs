//! Outbound mail message shape and the two templated emails this service
//! sends. Links point at the frontend origin; the backend only embeds the
//! code (and, for resets, the expiry) in the URL.

use chrono::{DateTime, Utc};

/// One templated message handed to the [`crate::domain::repository::Mailer`]
/// port.
#[derive(Debug, Clone)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Email asking the recipient to confirm their address.
pub fn verification_email(to: &str, app_origin: &str, code: &str) -> MailMessage {
    let link = format!("{app_origin}/confirm-account?code={code}");
    MailMessage {
        to: to.to_owned(),
        subject: "Confirm your email address".to_owned(),
        html: format!(
            "<p>Welcome! Please confirm your email address to finish setting up \
             your account.</p>\
             <p><a href=\"{link}\">Confirm email</a></p>\
             <p>This link expires in 45 minutes.</p>"
        ),
        text: format!(
            "Welcome! Please confirm your email address to finish setting up \
             your account: {link}\nThis link expires in 45 minutes."
        ),
    }
}

/// Email carrying a password-reset link. The expiry timestamp rides along in
/// the URL so the frontend can show a countdown.
pub fn password_reset_email(
    to: &str,
    app_origin: &str,
    code: &str,
    expires_at: DateTime<Utc>,
) -> MailMessage {
    let link = format!(
        "{app_origin}/reset-password?code={code}&exp={}",
        expires_at.timestamp_millis()
    );
    MailMessage {
        to: to.to_owned(),
        subject: "Reset your password".to_owned(),
        html: format!(
            "<p>We received a request to reset your password.</p>\
             <p><a href=\"{link}\">Reset password</a></p>\
             <p>If you did not request this, you can ignore this email.</p>"
        ),
        text: format!(
            "We received a request to reset your password: {link}\n\
             If you did not request this, you can ignore this email."
        ),
    }
}
