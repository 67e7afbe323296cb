use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header::USER_AGENT},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use credence_auth_types::cookie::{set_access_token_cookie, set_refresh_token_cookie};
use credence_auth_types::principal::AuthenticatedPrincipal;

use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::mfa::{
    GenerateMfaSetupUseCase, MfaSetupOutput, RevokeMfaUseCase, VerifyMfaLoginUseCase,
    VerifyMfaSetupUseCase,
};

// ── POST /mfa/setup ───────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MfaSetupResponse {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otpauth_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qr_code: Option<String>,
}

pub async fn generate_setup(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = GenerateMfaSetupUseCase {
        users: state.user_repo(),
        issuer: state.mfa_issuer.clone(),
    };

    let body = match usecase.execute(principal.id).await? {
        MfaSetupOutput::AlreadyEnabled => MfaSetupResponse {
            enabled: true,
            secret: None,
            otpauth_url: None,
            qr_code: None,
        },
        MfaSetupOutput::Pending {
            secret,
            otpauth_url,
            qr_png_base64,
        } => MfaSetupResponse {
            enabled: false,
            secret: Some(secret),
            otpauth_url: Some(otpauth_url),
            qr_code: Some(qr_png_base64),
        },
    };

    Ok(Json(body))
}

// ── POST /mfa/verify ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifySetupRequest {
    pub code: String,
    pub secret: String,
}

pub async fn verify_setup(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Json(body): Json<VerifySetupRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = VerifyMfaSetupUseCase {
        users: state.user_repo(),
        issuer: state.mfa_issuer.clone(),
    };
    usecase
        .execute(principal.id, &body.code, &body.secret)
        .await?;
    Ok(StatusCode::OK)
}

// ── PUT /mfa/revoke ───────────────────────────────────────────────────────────

pub async fn revoke(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = RevokeMfaUseCase {
        users: state.user_repo(),
    };
    usecase.execute(principal.id).await?;
    Ok(StatusCode::OK)
}

// ── POST /mfa/verify-login ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyLoginRequest {
    pub email: String,
    pub code: String,
}

/// Second half of an MFA login. Public route: the caller holds no tokens yet,
/// only the credentials it already proved in the password step.
pub async fn verify_login(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Json(body): Json<VerifyLoginRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = VerifyMfaLoginUseCase {
        users: state.user_repo(),
        sessions: state.session_repo(),
        issuer: state.mfa_issuer.clone(),
        tokens: state.tokens.clone(),
    };

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let tokens = usecase.execute(&body.email, &body.code, user_agent).await?;

    let jar = set_access_token_cookie(
        jar,
        tokens.access_token,
        state.tokens.access_lifetime_secs,
        state.production,
    );
    let jar = set_refresh_token_cookie(
        jar,
        tokens.refresh_token,
        state.tokens.refresh_lifetime_secs,
        state.production,
    );

    Ok((StatusCode::OK, jar))
}
