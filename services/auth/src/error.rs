use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Auth service domain error variants.
///
/// Credential and MFA failures carry deliberately generic messages: the same
/// `InvalidCredentials` covers unknown email and wrong password so responses
/// never reveal which factor failed.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("account already exists for this email")]
    DuplicateAccount,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("invalid or expired verification code")]
    InvalidOrExpiredCode,
    #[error("too many attempts, try again later")]
    TooManyAttempts,
    #[error("could not send email")]
    EmailDeliveryFailed,
    #[error("invalid token")]
    InvalidToken,
    #[error("session not found, please log in")]
    SessionNotFound,
    #[error("session expired, please log in")]
    SessionExpired,
    #[error("invalid MFA code, please try again")]
    InvalidMfaCode,
    #[error("MFA is not enabled for this user")]
    MfaNotEnabled,
    #[error("not found")]
    NotFound,
    #[error("could not update user")]
    UpdateFailed,
    #[error("{0}")]
    Validation(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DuplicateAccount => "DUPLICATE_ACCOUNT",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::InvalidOrExpiredCode => "INVALID_OR_EXPIRED_CODE",
            Self::TooManyAttempts => "TOO_MANY_ATTEMPTS",
            Self::EmailDeliveryFailed => "EMAIL_DELIVERY_FAILED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::SessionExpired => "SESSION_EXPIRED",
            Self::InvalidMfaCode => "INVALID_MFA_CODE",
            Self::MfaNotEnabled => "MFA_NOT_ENABLED",
            Self::NotFound => "NOT_FOUND",
            Self::UpdateFailed => "UPDATE_FAILED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL",
        }
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::DuplicateAccount => StatusCode::CONFLICT,
            Self::InvalidCredentials
            | Self::InvalidOrExpiredCode
            | Self::InvalidMfaCode
            | Self::MfaNotEnabled
            | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::TooManyAttempts => StatusCode::TOO_MANY_REQUESTS,
            Self::InvalidToken | Self::SessionNotFound | Self::SessionExpired => {
                StatusCode::UNAUTHORIZED
            }
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::EmailDeliveryFailed | Self::UpdateFailed | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status
        // for all requests. 4xx are expected client errors; logging them here
        // would be noise. Internal errors need the anyhow chain logged so the
        // root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "kind": self.kind(),
            "message": self.to_string(),
        });
        (status, axum::Json(body)).into_response()
    }
}
