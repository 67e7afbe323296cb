use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use credence_auth::domain::mail::MailMessage;
use credence_auth::domain::repository::{
    Mailer, SessionRepository, UserRepository, VerificationCodeRepository,
};
use credence_auth::domain::types::{AuthUser, Session, VerificationCode, VerificationPurpose};
use credence_auth::error::AuthServiceError;
use credence_auth::password::hash_password;
use credence_auth::usecase::TokenConfig;

// ── MockUserRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockUserRepo {
    pub users: Arc<Mutex<Vec<AuthUser>>>,
}

impl MockUserRepo {
    pub fn new(users: Vec<AuthUser>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Shared handle to the internal list for post-execution inspection.
    pub fn users_handle(&self) -> Arc<Mutex<Vec<AuthUser>>> {
        Arc::clone(&self.users)
    }
}

impl UserRepository for MockUserRepo {
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthServiceError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthServiceError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, user: &AuthUser) -> Result<(), AuthServiceError> {
        self.users.lock().unwrap().push(user.clone());
        Ok(())
    }

    async fn set_email_verified(&self, id: Uuid) -> Result<bool, AuthServiceError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == id) {
            Some(u) => {
                u.email_verified = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn update_password_hash(&self, id: Uuid, hash: &str) -> Result<bool, AuthServiceError> {
        let mut users = self.users.lock().unwrap();
        match users.iter_mut().find(|u| u.id == id) {
            Some(u) => {
                u.password_hash = hash.to_owned();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_mfa_secret(&self, id: Uuid, secret: &str) -> Result<(), AuthServiceError> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.mfa_secret = Some(secret.to_owned());
        }
        Ok(())
    }

    async fn set_mfa_enabled(&self, id: Uuid, enabled: bool) -> Result<(), AuthServiceError> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.mfa_enabled = enabled;
        }
        Ok(())
    }

    async fn clear_mfa(&self, id: Uuid) -> Result<(), AuthServiceError> {
        let mut users = self.users.lock().unwrap();
        if let Some(u) = users.iter_mut().find(|u| u.id == id) {
            u.mfa_enabled = false;
            u.mfa_secret = None;
        }
        Ok(())
    }
}

// ── MockSessionRepo ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockSessionRepo {
    pub sessions: Arc<Mutex<Vec<Session>>>,
}

impl MockSessionRepo {
    pub fn new(sessions: Vec<Session>) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(sessions)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn sessions_handle(&self) -> Arc<Mutex<Vec<Session>>> {
        Arc::clone(&self.sessions)
    }
}

impl SessionRepository for MockSessionRepo {
    async fn create(&self, session: &Session) -> Result<(), AuthServiceError> {
        self.sessions.lock().unwrap().push(session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, AuthServiceError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == id)
            .cloned())
    }

    async fn list_active_by_user(&self, user_id: Uuid) -> Result<Vec<Session>, AuthServiceError> {
        let mut sessions: Vec<Session> = self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id && !s.is_expired())
            .cloned()
            .collect();
        sessions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(sessions)
    }

    async fn extend_expiry(
        &self,
        id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        let mut sessions = self.sessions.lock().unwrap();
        if let Some(s) = sessions.iter_mut().find(|s| s.id == id) {
            s.expires_at = expires_at;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AuthServiceError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.id != id);
        Ok(sessions.len() < before)
    }

    async fn delete_for_user(&self, id: Uuid, user_id: Uuid) -> Result<bool, AuthServiceError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| !(s.id == id && s.user_id == user_id));
        Ok(sessions.len() < before)
    }

    async fn delete_all_by_user(&self, user_id: Uuid) -> Result<u64, AuthServiceError> {
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| s.user_id != user_id);
        Ok((before - sessions.len()) as u64)
    }
}

// ── MockCodeRepo ─────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockCodeRepo {
    pub codes: Arc<Mutex<Vec<VerificationCode>>>,
}

impl MockCodeRepo {
    pub fn new(codes: Vec<VerificationCode>) -> Self {
        Self {
            codes: Arc::new(Mutex::new(codes)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    pub fn codes_handle(&self) -> Arc<Mutex<Vec<VerificationCode>>> {
        Arc::clone(&self.codes)
    }
}

impl VerificationCodeRepository for MockCodeRepo {
    async fn create(&self, code: &VerificationCode) -> Result<(), AuthServiceError> {
        self.codes.lock().unwrap().push(code.clone());
        Ok(())
    }

    async fn find_valid(
        &self,
        code: &str,
        purpose: VerificationPurpose,
    ) -> Result<Option<VerificationCode>, AuthServiceError> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.code == code && c.purpose == purpose && c.is_valid())
            .cloned())
    }

    async fn count_recent(
        &self,
        user_id: Uuid,
        purpose: VerificationPurpose,
        since: DateTime<Utc>,
    ) -> Result<u64, AuthServiceError> {
        Ok(self
            .codes
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id && c.purpose == purpose && c.created_at > since)
            .count() as u64)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AuthServiceError> {
        self.codes.lock().unwrap().retain(|c| c.id != id);
        Ok(())
    }
}

// ── MockMailer ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct MockMailer {
    pub sent: Arc<Mutex<Vec<MailMessage>>>,
    pub fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail: true,
        }
    }

    pub fn sent_handle(&self) -> Arc<Mutex<Vec<MailMessage>>> {
        Arc::clone(&self.sent)
    }
}

impl Mailer for MockMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), AuthServiceError> {
        if self.fail {
            return Err(AuthServiceError::EmailDeliveryFailed);
        }
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub const TEST_ACCESS_SECRET: &str = "test-access-secret-for-unit-tests-only";
pub const TEST_REFRESH_SECRET: &str = "test-refresh-secret-for-unit-tests-only";
pub const TEST_PASSWORD: &str = "correct horse battery staple";

pub fn test_token_config() -> TokenConfig {
    TokenConfig {
        access_secret: TEST_ACCESS_SECRET.to_owned(),
        access_lifetime_secs: 900,
        refresh_secret: TEST_REFRESH_SECRET.to_owned(),
        refresh_lifetime_secs: 30 * 24 * 60 * 60,
    }
}

pub fn test_user() -> AuthUser {
    let now = Utc::now();
    AuthUser {
        id: Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap(),
        email: "user@example.com".to_owned(),
        name: "Test User".to_owned(),
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
        email_verified: true,
        mfa_enabled: false,
        mfa_secret: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn test_session(user_id: Uuid, expires_at: DateTime<Utc>) -> Session {
    Session {
        id: Uuid::new_v4(),
        user_id,
        user_agent: Some("integration-test".to_owned()),
        created_at: Utc::now(),
        expires_at,
    }
}

pub fn test_code(user_id: Uuid, purpose: VerificationPurpose) -> VerificationCode {
    let now = Utc::now();
    VerificationCode {
        id: Uuid::new_v4(),
        user_id,
        code: "abcdef0123456789abcdef012".to_owned(),
        purpose,
        created_at: now,
        expires_at: now + chrono::Duration::minutes(45),
    }
}
