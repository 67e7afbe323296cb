use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Account record as the service works with it. Secrets stay inside the
/// service: callers get a [`UserView`], never this struct.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub email_verified: bool,
    pub mfa_enabled: bool,
    /// base32 TOTP secret; set during MFA enrollment, cleared on revoke.
    pub mfa_secret: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Redacted user representation for API responses: no password hash, no
/// MFA secret.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub email_verified: bool,
    pub mfa_enabled: bool,
    #[serde(serialize_with = "credence_core::serde::to_rfc3339_ms")]
    pub created_at: DateTime<Utc>,
}

impl From<&AuthUser> for UserView {
    fn from(user: &AuthUser) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            email_verified: user.email_verified,
            mfa_enabled: user.mfa_enabled,
            created_at: user.created_at,
        }
    }
}

/// One authenticated device/browser.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub user_id: Uuid,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// What a verification code authorizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationPurpose {
    EmailVerification,
    PasswordReset,
}

impl VerificationPurpose {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::EmailVerification => "email_verification",
            Self::PasswordReset => "password_reset",
        }
    }

    /// Parse the stored column value. Since `find_valid` filters by purpose
    /// string, anything else in the column never reaches the domain.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "email_verification" => Some(Self::EmailVerification),
            "password_reset" => Some(Self::PasswordReset),
            _ => None,
        }
    }
}

/// Single-use random code tied to a user and a purpose.
#[derive(Debug, Clone)]
pub struct VerificationCode {
    pub id: Uuid,
    pub user_id: Uuid,
    pub code: String,
    pub purpose: VerificationPurpose,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl VerificationCode {
    pub fn is_valid(&self) -> bool {
        self.expires_at > Utc::now()
    }
}

/// Length of generated verification code strings.
pub const VERIFICATION_CODE_LEN: usize = 25;

/// Sliding window for the password-reset rate limit.
pub const RESET_RATE_WINDOW_SECS: i64 = 3 * 60;

/// Maximum password-reset codes issued per user inside the window.
pub const MAX_RESET_REQUESTS_PER_WINDOW: u64 = 2;
