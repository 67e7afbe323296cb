//! JWT token codec for access and refresh tokens.
//!
//! Access and refresh tokens share one wire format and differ only in claims,
//! signing secret, and lifetime. Access tokens carry the user id in `sub`;
//! refresh tokens carry only the session id. Both are scoped to the `user`
//! audience so a token minted for one purpose cannot be replayed elsewhere.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Audience claim stamped on every token this codec issues.
pub const TOKEN_AUDIENCE: &str = "user";

/// Errors returned by the token codec. Verification never panics and never
/// propagates a raw jsonwebtoken error past this boundary.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("audience mismatch")]
    BadAudience,
    #[error("malformed token")]
    Malformed,
    #[error("signing failed")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// JWT claims payload for both token classes.
///
/// | Field | Present on | Meaning |
/// |-------|------------|---------|
/// | `sub` | access only | user ID (UUID string) |
/// | `sid` | both | session ID (UUID string) |
/// | `aud` | both | always `["user"]` |
/// | `exp` | both | expiration, seconds since epoch |
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    pub sid: String,
    pub aud: Vec<String>,
    pub exp: u64,
}

/// Verified token contents.
#[derive(Debug, Clone)]
pub struct TokenInfo {
    /// Set for access tokens, `None` for refresh tokens.
    pub user_id: Option<Uuid>,
    pub session_id: Uuid,
    pub exp: u64,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock before UNIX epoch")
        .as_secs()
}

fn sign(claims: &TokenClaims, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Signing)
}

/// Issue an access token bound to a user and session.
///
/// Returns the token together with its `exp` timestamp so callers can expose
/// the expiry without re-decoding.
pub fn sign_access_token(
    user_id: Uuid,
    session_id: Uuid,
    secret: &str,
    lifetime_secs: u64,
) -> Result<(String, u64), TokenError> {
    let exp = now_secs() + lifetime_secs;
    let claims = TokenClaims {
        sub: Some(user_id.to_string()),
        sid: session_id.to_string(),
        aud: vec![TOKEN_AUDIENCE.to_owned()],
        exp,
    };
    Ok((sign(&claims, secret)?, exp))
}

/// Issue a refresh token bound to a session only.
pub fn sign_refresh_token(
    session_id: Uuid,
    secret: &str,
    lifetime_secs: u64,
) -> Result<String, TokenError> {
    let claims = TokenClaims {
        sub: None,
        sid: session_id.to_string(),
        aud: vec![TOKEN_AUDIENCE.to_owned()],
        exp: now_secs() + lifetime_secs,
    };
    sign(&claims, secret)
}

/// Decode and validate a token against the given secret.
///
/// Validation: HS256, exp checked, audience must contain `user`.
/// Default leeway = 60s — tolerates clock skew between hosts.
pub fn validate_token(token: &str, secret: &str) -> Result<TokenInfo, TokenError> {
    let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_audience(&[TOKEN_AUDIENCE]);
    validation.required_spec_claims.clear();
    validation.set_required_spec_claims(&["exp", "aud"]);

    let data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
        jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
        jsonwebtoken::errors::ErrorKind::InvalidAudience => TokenError::BadAudience,
        _ => TokenError::Malformed,
    })?;

    let claims = data.claims;
    let session_id = claims
        .sid
        .parse::<Uuid>()
        .map_err(|_| TokenError::Malformed)?;
    let user_id = match claims.sub {
        Some(sub) => Some(sub.parse::<Uuid>().map_err(|_| TokenError::Malformed)?),
        None => None,
    };

    Ok(TokenInfo {
        user_id,
        session_id,
        exp: claims.exp,
    })
}
