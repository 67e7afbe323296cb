#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::mail::MailMessage;
use crate::domain::types::{AuthUser, Session, VerificationCode, VerificationPurpose};
use crate::error::AuthServiceError;

/// Repository for account records.
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthServiceError>;
    async fn create(&self, user: &AuthUser) -> Result<(), AuthServiceError>;

    /// Mark the user's email verified. Returns `false` when no row matched.
    async fn set_email_verified(&self, id: Uuid) -> Result<bool, AuthServiceError>;

    /// Replace the stored password hash. Returns `false` when no row matched.
    async fn update_password_hash(&self, id: Uuid, hash: &str) -> Result<bool, AuthServiceError>;

    /// Store a pending (not yet confirmed) TOTP secret.
    async fn set_mfa_secret(&self, id: Uuid, secret: &str) -> Result<(), AuthServiceError>;

    /// Flip the MFA-enabled flag, keeping the stored secret.
    async fn set_mfa_enabled(&self, id: Uuid, enabled: bool) -> Result<(), AuthServiceError>;

    /// Disable MFA and erase the stored secret.
    async fn clear_mfa(&self, id: Uuid) -> Result<(), AuthServiceError>;
}

/// Repository for sessions. One row per logged-in device.
pub trait SessionRepository: Send + Sync {
    async fn create(&self, session: &Session) -> Result<(), AuthServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, AuthServiceError>;

    /// Unexpired sessions for a user, newest first.
    async fn list_active_by_user(&self, user_id: Uuid) -> Result<Vec<Session>, AuthServiceError>;

    /// Push the session's expiry forward (refresh rotation).
    async fn extend_expiry(
        &self,
        id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError>;

    /// Delete by id. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, AuthServiceError>;

    /// Delete by id, scoped to an owner. Returns `true` if a row was deleted.
    async fn delete_for_user(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, AuthServiceError>;

    /// Delete every session a user owns (forced logout everywhere).
    /// Returns the number of rows deleted.
    async fn delete_all_by_user(&self, user_id: Uuid) -> Result<u64, AuthServiceError>;
}

/// Repository for verification codes. Expired rows are treated as absent,
/// never returned and never purged here.
pub trait VerificationCodeRepository: Send + Sync {
    async fn create(&self, code: &VerificationCode) -> Result<(), AuthServiceError>;

    /// Find an unexpired code by exact code string and purpose.
    async fn find_valid(
        &self,
        code: &str,
        purpose: VerificationPurpose,
    ) -> Result<Option<VerificationCode>, AuthServiceError>;

    /// Count codes of a purpose created for a user since the given instant
    /// (rate-limit window query).
    async fn count_recent(
        &self,
        user_id: Uuid,
        purpose: VerificationPurpose,
        since: DateTime<Utc>,
    ) -> Result<u64, AuthServiceError>;

    /// Consume a code.
    async fn delete(&self, id: Uuid) -> Result<(), AuthServiceError>;
}

/// Outbound mail port. Implementations report delivery failure as
/// [`AuthServiceError::EmailDeliveryFailed`].
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), AuthServiceError>;
}
