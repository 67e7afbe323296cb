//! Registration, login, email verification, and the password flows.

use chrono::{Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use crate::domain::mail::{password_reset_email, verification_email};
use crate::domain::repository::{
    Mailer, SessionRepository, UserRepository, VerificationCodeRepository,
};
use crate::domain::types::{
    AuthUser, MAX_RESET_REQUESTS_PER_WINDOW, RESET_RATE_WINDOW_SECS, UserView, VerificationCode,
    VERIFICATION_CODE_LEN, VerificationPurpose,
};
use crate::error::AuthServiceError;
use crate::expiry::{an_hour_after, forty_five_minutes_after};
use crate::password::{hash_password, verify_password};
use crate::usecase::{SessionTokens, TokenConfig, open_session};

/// Generate an unguessable single-use code: 128 random bits rendered as
/// lowercase hex, truncated to 25 characters.
fn generate_verification_code() -> String {
    let mut rng = rand::rng();
    let n: u128 = rng.random();
    format!("{n:032x}")[..VERIFICATION_CODE_LEN].to_owned()
}

fn validate_email(email: &str) -> Result<(), AuthServiceError> {
    if email.is_empty() || email.len() > 255 || !email.contains('@') {
        return Err(AuthServiceError::Validation("invalid email".to_owned()));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), AuthServiceError> {
    if password.len() < 6 || password.len() > 255 {
        return Err(AuthServiceError::Validation(
            "password must be between 6 and 255 characters".to_owned(),
        ));
    }
    Ok(())
}

// ── Register ─────────────────────────────────────────────────────────────────

pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

pub struct RegisterUseCase<U, V, M>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    M: Mailer,
{
    pub users: U,
    pub codes: V,
    pub mailer: M,
    pub app_origin: String,
}

impl<U, V, M> RegisterUseCase<U, V, M>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    M: Mailer,
{
    pub async fn execute(&self, input: RegisterInput) -> Result<UserView, AuthServiceError> {
        if input.name.is_empty() || input.name.len() > 255 {
            return Err(AuthServiceError::Validation("invalid name".to_owned()));
        }
        validate_email(&input.email)?;
        validate_password(&input.password)?;
        if input.password != input.confirm_password {
            return Err(AuthServiceError::Validation(
                "passwords do not match".to_owned(),
            ));
        }

        if self.users.find_by_email(&input.email).await?.is_some() {
            return Err(AuthServiceError::DuplicateAccount);
        }

        let now = Utc::now();
        let user = AuthUser {
            id: Uuid::new_v4(),
            email: input.email,
            name: input.name,
            password_hash: hash_password(&input.password)?,
            email_verified: false,
            mfa_enabled: false,
            mfa_secret: None,
            created_at: now,
            updated_at: now,
        };
        self.users.create(&user).await?;

        let code = VerificationCode {
            id: Uuid::new_v4(),
            user_id: user.id,
            code: generate_verification_code(),
            purpose: VerificationPurpose::EmailVerification,
            created_at: now,
            expires_at: forty_five_minutes_after(now),
        };
        self.codes.create(&code).await?;

        // If delivery fails the account and code are retained: the call fails
        // with EmailDeliveryFailed and no compensation runs. A retried
        // registration surfaces DuplicateAccount.
        let message = verification_email(&user.email, &self.app_origin, &code.code);
        self.mailer.send(&message).await?;

        Ok(UserView::from(&user))
    }
}

// ── Login ────────────────────────────────────────────────────────────────────

pub struct LoginInput {
    pub email: String,
    pub password: String,
    pub user_agent: Option<String>,
}

#[derive(Debug)]
pub enum LoginOutput {
    /// Credentials are valid but the user has MFA enabled: no session, no
    /// tokens. The client must complete the MFA login step.
    MfaRequired { user: UserView },
    LoggedIn {
        user: UserView,
        tokens: SessionTokens,
    },
}

pub struct LoginUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub users: U,
    pub sessions: S,
    pub tokens: TokenConfig,
}

impl<U, S> LoginUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, AuthServiceError> {
        // Unknown email and wrong password surface the same error so
        // responses never reveal whether an account exists.
        let user = self
            .users
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthServiceError::InvalidCredentials)?;

        if !verify_password(&input.password, &user.password_hash) {
            return Err(AuthServiceError::InvalidCredentials);
        }

        if user.mfa_enabled {
            return Ok(LoginOutput::MfaRequired {
                user: UserView::from(&user),
            });
        }

        let tokens = open_session(&self.sessions, user.id, input.user_agent, &self.tokens).await?;
        Ok(LoginOutput::LoggedIn {
            user: UserView::from(&user),
            tokens,
        })
    }
}

// ── VerifyEmail ──────────────────────────────────────────────────────────────

pub struct VerifyEmailUseCase<U, V>
where
    U: UserRepository,
    V: VerificationCodeRepository,
{
    pub users: U,
    pub codes: V,
}

impl<U, V> VerifyEmailUseCase<U, V>
where
    U: UserRepository,
    V: VerificationCodeRepository,
{
    pub async fn execute(&self, code: &str) -> Result<(), AuthServiceError> {
        let code = self
            .codes
            .find_valid(code, VerificationPurpose::EmailVerification)
            .await?
            .ok_or(AuthServiceError::InvalidOrExpiredCode)?;

        if !self.users.set_email_verified(code.user_id).await? {
            return Err(AuthServiceError::UpdateFailed);
        }

        self.codes.delete(code.id).await
    }
}

// ── ForgotPassword ───────────────────────────────────────────────────────────

pub struct ForgotPasswordUseCase<U, V, M>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    M: Mailer,
{
    pub users: U,
    pub codes: V,
    pub mailer: M,
    pub app_origin: String,
}

impl<U, V, M> ForgotPasswordUseCase<U, V, M>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    M: Mailer,
{
    pub async fn execute(&self, email: &str) -> Result<(), AuthServiceError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        // Sliding-window rate limit: at most two reset codes per user per
        // three minutes bounds email-flood abuse per account.
        let since = Utc::now() - Duration::seconds(RESET_RATE_WINDOW_SECS);
        let recent = self
            .codes
            .count_recent(user.id, VerificationPurpose::PasswordReset, since)
            .await?;
        if recent >= MAX_RESET_REQUESTS_PER_WINDOW {
            return Err(AuthServiceError::TooManyAttempts);
        }

        let now = Utc::now();
        let code = VerificationCode {
            id: Uuid::new_v4(),
            user_id: user.id,
            code: generate_verification_code(),
            purpose: VerificationPurpose::PasswordReset,
            created_at: now,
            expires_at: an_hour_after(now),
        };
        self.codes.create(&code).await?;

        let message =
            password_reset_email(&user.email, &self.app_origin, &code.code, code.expires_at);
        self.mailer.send(&message).await
    }
}

// ── ResetPassword ────────────────────────────────────────────────────────────

pub struct ResetPasswordInput {
    pub password: String,
    pub verification_code: String,
}

pub struct ResetPasswordUseCase<U, V, S>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    S: SessionRepository,
{
    pub users: U,
    pub codes: V,
    pub sessions: S,
}

impl<U, V, S> ResetPasswordUseCase<U, V, S>
where
    U: UserRepository,
    V: VerificationCodeRepository,
    S: SessionRepository,
{
    pub async fn execute(&self, input: ResetPasswordInput) -> Result<(), AuthServiceError> {
        validate_password(&input.password)?;

        let code = self
            .codes
            .find_valid(&input.verification_code, VerificationPurpose::PasswordReset)
            .await?
            .ok_or(AuthServiceError::InvalidOrExpiredCode)?;

        let hash = hash_password(&input.password)?;
        if !self.users.update_password_hash(code.user_id, &hash).await? {
            return Err(AuthServiceError::UpdateFailed);
        }

        self.codes.delete(code.id).await?;

        // A password reset invalidates every existing session: any refresh
        // token issued before this point dies with its session.
        self.sessions.delete_all_by_user(code.user_id).await?;
        Ok(())
    }
}

// ── ChangePassword ───────────────────────────────────────────────────────────

pub struct ChangePasswordInput {
    pub old_password: String,
    pub new_password: String,
}

pub struct ChangePasswordUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub users: U,
    pub sessions: S,
}

impl<U, S> ChangePasswordUseCase<U, S>
where
    U: UserRepository,
    S: SessionRepository,
{
    pub async fn execute(
        &self,
        user_id: Uuid,
        input: ChangePasswordInput,
    ) -> Result<(), AuthServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if !verify_password(&input.old_password, &user.password_hash) {
            return Err(AuthServiceError::InvalidCredentials);
        }
        validate_password(&input.new_password)?;

        let hash = hash_password(&input.new_password)?;
        if !self.users.update_password_hash(user.id, &hash).await? {
            return Err(AuthServiceError::UpdateFailed);
        }

        // Same forced-logout policy as reset: the caller re-authenticates.
        self.sessions.delete_all_by_user(user.id).await?;
        Ok(())
    }
}

// ── Logout ───────────────────────────────────────────────────────────────────

pub struct LogoutUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> LogoutUseCase<S> {
    /// Idempotent: deleting a session that is already gone is not an error.
    pub async fn execute(&self, session_id: Uuid) -> Result<(), AuthServiceError> {
        self.sessions.delete(session_id).await?;
        Ok(())
    }
}
