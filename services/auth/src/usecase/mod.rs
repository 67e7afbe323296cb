pub mod credential;
pub mod mfa;
pub mod refresh;
pub mod session;

use chrono::{Duration, Utc};
use uuid::Uuid;

use credence_auth_types::token::{sign_access_token, sign_refresh_token};

use crate::domain::repository::SessionRepository;
use crate::domain::types::Session;
use crate::error::AuthServiceError;

/// Token signing material, resolved once from configuration at startup.
/// Access and refresh tokens use distinct secrets so compromise of one key
/// does not compromise the other token class.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub access_secret: String,
    pub access_lifetime_secs: u64,
    pub refresh_secret: String,
    pub refresh_lifetime_secs: u64,
}

/// A freshly created session with its token pair.
#[derive(Debug)]
pub struct SessionTokens {
    pub session: Session,
    pub access_token: String,
    pub access_token_exp: u64,
    pub refresh_token: String,
}

/// Create a session for a user and mint its access/refresh token pair.
/// Shared by direct login and the MFA login step.
pub(crate) async fn open_session<S: SessionRepository>(
    sessions: &S,
    user_id: Uuid,
    user_agent: Option<String>,
    tokens: &TokenConfig,
) -> Result<SessionTokens, AuthServiceError> {
    let now = Utc::now();
    let session = Session {
        id: Uuid::new_v4(),
        user_id,
        user_agent,
        created_at: now,
        expires_at: now + Duration::seconds(tokens.refresh_lifetime_secs as i64),
    };
    sessions.create(&session).await?;

    let (access_token, access_token_exp) = sign_access_token(
        user_id,
        session.id,
        &tokens.access_secret,
        tokens.access_lifetime_secs,
    )
    .map_err(|e| AuthServiceError::Internal(e.into()))?;
    let refresh_token = sign_refresh_token(
        session.id,
        &tokens.refresh_secret,
        tokens.refresh_lifetime_secs,
    )
    .map_err(|e| AuthServiceError::Internal(e.into()))?;

    Ok(SessionTokens {
        session,
        access_token,
        access_token_exp,
        refresh_token,
    })
}
