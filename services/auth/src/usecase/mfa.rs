//! TOTP second-factor enrollment and verification.
//!
//! Enrollment is a two-step handshake: `GenerateMfaSetup` provisions (or
//! re-uses) a pending secret without enabling anything, and `VerifyMfaSetup`
//! flips `mfa_enabled` only after the user proves they can produce a valid
//! code. Until that proof lands, login is unaffected.

use totp_rs::{Algorithm, Secret, TOTP};
use uuid::Uuid;

use crate::domain::repository::{SessionRepository, UserRepository};
use crate::error::AuthServiceError;
use crate::usecase::{open_session, SessionTokens, TokenConfig};

/// Builds the TOTP generator for a base32-encoded secret. Parameters follow
/// the common authenticator-app defaults (SHA-1, 6 digits, 30s step, one
/// step of clock skew either way).
fn build_totp(
    encoded_secret: &str,
    issuer: &str,
    account_name: &str,
) -> Result<TOTP, AuthServiceError> {
    let secret = Secret::Encoded(encoded_secret.to_owned())
        .to_bytes()
        .map_err(|_| AuthServiceError::InvalidMfaCode)?;
    TOTP::new(
        Algorithm::SHA1,
        6,
        1,
        30,
        secret,
        Some(issuer.to_owned()),
        account_name.to_owned(),
    )
    .map_err(|e| AuthServiceError::Internal(anyhow::anyhow!("totp construction: {e}")))
}

fn check_code(totp: &TOTP, code: &str) -> Result<(), AuthServiceError> {
    let ok = totp
        .check_current(code)
        .map_err(|e| AuthServiceError::Internal(anyhow::anyhow!("system clock: {e}")))?;
    if ok {
        Ok(())
    } else {
        Err(AuthServiceError::InvalidMfaCode)
    }
}

// ── Generate setup ──────────────────────────────────────────────────────────

#[derive(Debug)]
pub enum MfaSetupOutput {
    /// The account already has a verified second factor; nothing to set up.
    AlreadyEnabled,
    Pending {
        secret: String,
        otpauth_url: String,
        qr_png_base64: String,
    },
}

pub struct GenerateMfaSetupUseCase<U: UserRepository> {
    pub users: U,
    pub issuer: String,
}

impl<U: UserRepository> GenerateMfaSetupUseCase<U> {
    pub async fn execute(&self, user_id: Uuid) -> Result<MfaSetupOutput, AuthServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if user.mfa_enabled {
            return Ok(MfaSetupOutput::AlreadyEnabled);
        }

        // Re-issuing setup re-uses the pending secret so an earlier QR scan
        // stays valid.
        let encoded = match user.mfa_secret {
            Some(secret) => secret,
            None => {
                let secret = Secret::generate_secret().to_encoded().to_string();
                self.users.set_mfa_secret(user.id, &secret).await?;
                secret
            }
        };

        let totp = build_totp(&encoded, &self.issuer, &user.email)?;
        let qr_png_base64 = totp
            .get_qr_base64()
            .map_err(|e| AuthServiceError::Internal(anyhow::anyhow!("qr render: {e}")))?;

        Ok(MfaSetupOutput::Pending {
            otpauth_url: totp.get_url(),
            qr_png_base64,
            secret: encoded,
        })
    }
}

// ── Verify setup ────────────────────────────────────────────────────────────

pub struct VerifyMfaSetupUseCase<U: UserRepository> {
    pub users: U,
    pub issuer: String,
}

impl<U: UserRepository> VerifyMfaSetupUseCase<U> {
    /// Confirms enrollment by checking a live code against the secret the
    /// client scanned, then persists that secret and enables MFA. The secret
    /// is written back so the stored value can never diverge from the one
    /// the authenticator app holds. Verifying an already-enabled account is
    /// a no-op success.
    pub async fn execute(
        &self,
        user_id: Uuid,
        code: &str,
        secret: &str,
    ) -> Result<(), AuthServiceError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if user.mfa_enabled {
            return Ok(());
        }

        let totp = build_totp(secret, &self.issuer, &user.email)?;
        check_code(&totp, code)?;

        self.users.set_mfa_secret(user.id, secret).await?;
        self.users.set_mfa_enabled(user.id, true).await?;
        Ok(())
    }
}

// ── Revoke ──────────────────────────────────────────────────────────────────

pub struct RevokeMfaUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> RevokeMfaUseCase<U> {
    /// Clears both the enabled flag and the stored secret. Idempotent:
    /// revoking an account without MFA succeeds silently.
    pub async fn execute(&self, user_id: Uuid) -> Result<(), AuthServiceError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(AuthServiceError::NotFound);
        }
        self.users.clear_mfa(user_id).await?;
        Ok(())
    }
}

// ── Verify for login ────────────────────────────────────────────────────────

pub struct VerifyMfaLoginUseCase<U: UserRepository, S: SessionRepository> {
    pub users: U,
    pub sessions: S,
    pub issuer: String,
    pub tokens: TokenConfig,
}

impl<U: UserRepository, S: SessionRepository> VerifyMfaLoginUseCase<U, S> {
    /// Completes a login that was interrupted by the MFA challenge: checks
    /// the code against the stored secret and opens a session on success.
    /// A missing stored secret means there is nothing to verify against,
    /// whatever the enabled flag says.
    pub async fn execute(
        &self,
        email: &str,
        code: &str,
        user_agent: Option<String>,
    ) -> Result<SessionTokens, AuthServiceError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let secret = user.mfa_secret.ok_or(AuthServiceError::MfaNotEnabled)?;

        let totp = build_totp(&secret, &self.issuer, &user.email)?;
        check_code(&totp, code)?;

        open_session(&self.sessions, user.id, user_agent, &self.tokens).await
    }
}
