//! Refresh-token validation and sliding-window rotation.
//!
//! A session's refresh-eligibility walks `Fresh (> 1 day to expiry)` →
//! `NearExpiry (<= 1 day)` → rotation → `Fresh` again; `Expired` is terminal
//! and requires a full re-login. Rotation extends the session in place and
//! mints a replacement refresh token only when the old one is close to dying,
//! bounding token churn while keeping active sessions alive indefinitely.

use chrono::{Duration, Utc};

use credence_auth_types::token::{sign_access_token, sign_refresh_token, validate_token};

use crate::domain::repository::SessionRepository;
use crate::error::AuthServiceError;
use crate::expiry::ONE_DAY_SECS;
use crate::usecase::TokenConfig;

#[derive(Debug)]
pub struct RefreshTokenOutput {
    pub access_token: String,
    pub access_token_exp: u64,
    /// Present only when rotation occurred; clients keep their existing
    /// refresh token otherwise.
    pub new_refresh_token: Option<String>,
}

pub struct RefreshTokenUseCase<S: SessionRepository> {
    pub sessions: S,
    pub tokens: TokenConfig,
}

impl<S: SessionRepository> RefreshTokenUseCase<S> {
    pub async fn execute(
        &self,
        refresh_token_value: &str,
    ) -> Result<RefreshTokenOutput, AuthServiceError> {
        // Signature/expiry/audience failures all collapse into InvalidToken;
        // the codec never raises past its boundary.
        let info = validate_token(refresh_token_value, &self.tokens.refresh_secret)
            .map_err(|_| AuthServiceError::InvalidToken)?;

        let session = self
            .sessions
            .find_by_id(info.session_id)
            .await?
            .ok_or(AuthServiceError::SessionNotFound)?;

        let now = Utc::now();
        if session.expires_at <= now {
            return Err(AuthServiceError::SessionExpired);
        }

        // Two concurrent refreshes can both observe near-expiry and both
        // rotate; last write wins and the loser re-logs-in. Accepted race.
        let time_to_expiry = session.expires_at - now;
        let new_refresh_token = if time_to_expiry <= Duration::seconds(ONE_DAY_SECS) {
            let extended = now + Duration::seconds(self.tokens.refresh_lifetime_secs as i64);
            self.sessions.extend_expiry(session.id, extended).await?;
            let token = sign_refresh_token(
                session.id,
                &self.tokens.refresh_secret,
                self.tokens.refresh_lifetime_secs,
            )
            .map_err(|e| AuthServiceError::Internal(e.into()))?;
            Some(token)
        } else {
            None
        };

        let (access_token, access_token_exp) = sign_access_token(
            session.user_id,
            session.id,
            &self.tokens.access_secret,
            self.tokens.access_lifetime_secs,
        )
        .map_err(|e| AuthServiceError::Internal(e.into()))?;

        Ok(RefreshTokenOutput {
            access_token,
            access_token_exp,
            new_refresh_token,
        })
    }
}
