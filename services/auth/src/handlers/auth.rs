use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode, header::USER_AGENT},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};

use credence_auth_types::{
    cookie::{
        REFRESH_TOKEN_COOKIE, clear_auth_cookies, set_access_token_cookie,
        set_refresh_token_cookie,
    },
    principal::{AuthenticatedPrincipal, CurrentSession},
};

use crate::domain::types::UserView;
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::SessionTokens;
use crate::usecase::credential::{
    ChangePasswordInput, ChangePasswordUseCase, ForgotPasswordUseCase, LoginInput, LoginOutput,
    LoginUseCase, LogoutUseCase, RegisterInput, RegisterUseCase, ResetPasswordInput,
    ResetPasswordUseCase, VerifyEmailUseCase,
};
use crate::usecase::refresh::RefreshTokenUseCase;

fn user_agent_of(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Sets both token cookies for a freshly opened session.
fn session_cookies(jar: CookieJar, tokens: &SessionTokens, state: &AppState) -> CookieJar {
    let jar = set_access_token_cookie(
        jar,
        tokens.access_token.clone(),
        state.tokens.access_lifetime_secs,
        state.production,
    );
    set_refresh_token_cookie(
        jar,
        tokens.refresh_token.clone(),
        state.tokens.refresh_lifetime_secs,
        state.production,
    )
}

// ── POST /auth/register ───────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = RegisterUseCase {
        users: state.user_repo(),
        codes: state.verification_code_repo(),
        mailer: state.mailer.clone(),
        app_origin: state.app_origin.clone(),
    };

    let user = usecase
        .execute(RegisterInput {
            name: body.name,
            email: body.email,
            password: body.password,
            confirm_password: body.confirm_password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

// ── POST /auth/login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub user: UserView,
    pub mfa_required: bool,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    headers: HeaderMap,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = LoginUseCase {
        users: state.user_repo(),
        sessions: state.session_repo(),
        tokens: state.tokens.clone(),
    };

    let out = usecase
        .execute(LoginInput {
            email: body.email,
            password: body.password,
            user_agent: user_agent_of(&headers),
        })
        .await?;

    match out {
        LoginOutput::MfaRequired { user } => {
            // No session and no cookies until the MFA step succeeds.
            let body = LoginResponse {
                user,
                mfa_required: true,
            };
            Ok((jar, Json(body)))
        }
        LoginOutput::LoggedIn { user, tokens } => {
            let jar = session_cookies(jar, &tokens, &state);
            let body = LoginResponse {
                user,
                mfa_required: false,
            };
            Ok((jar, Json(body)))
        }
    }
}

// ── POST /auth/refresh ────────────────────────────────────────────────────────

pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let refresh_value = jar
        .get(REFRESH_TOKEN_COOKIE)
        .map(|c| c.value().to_owned())
        .ok_or(AuthServiceError::InvalidToken)?;

    let usecase = RefreshTokenUseCase {
        sessions: state.session_repo(),
        tokens: state.tokens.clone(),
    };

    let out = usecase.execute(&refresh_value).await?;

    let jar = set_access_token_cookie(
        jar,
        out.access_token,
        state.tokens.access_lifetime_secs,
        state.production,
    );
    // The refresh cookie is replaced only when rotation occurred.
    let jar = match out.new_refresh_token {
        Some(token) => set_refresh_token_cookie(
            jar,
            token,
            state.tokens.refresh_lifetime_secs,
            state.production,
        ),
        None => jar,
    };

    Ok((StatusCode::OK, jar))
}

// ── POST /auth/verify/email ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyEmailRequest {
    pub code: String,
}

pub async fn verify_email(
    State(state): State<AppState>,
    Json(body): Json<VerifyEmailRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = VerifyEmailUseCase {
        users: state.user_repo(),
        codes: state.verification_code_repo(),
    };
    usecase.execute(&body.code).await?;
    Ok(StatusCode::OK)
}

// ── POST /auth/password/forgot ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    Json(body): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = ForgotPasswordUseCase {
        users: state.user_repo(),
        codes: state.verification_code_repo(),
        mailer: state.mailer.clone(),
        app_origin: state.app_origin.clone(),
    };
    usecase.execute(&body.email).await?;
    Ok(StatusCode::OK)
}

// ── POST /auth/password/reset ─────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub password: String,
    pub verification_code: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = ResetPasswordUseCase {
        users: state.user_repo(),
        codes: state.verification_code_repo(),
        sessions: state.session_repo(),
    };
    usecase
        .execute(ResetPasswordInput {
            password: body.password,
            verification_code: body.verification_code,
        })
        .await?;

    // All sessions are gone; stale cookies on this client are useless.
    let jar = clear_auth_cookies(jar, state.production);
    Ok((StatusCode::OK, jar))
}

// ── POST /auth/password/change ────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
}

pub async fn change_password(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    jar: CookieJar,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = ChangePasswordUseCase {
        users: state.user_repo(),
        sessions: state.session_repo(),
    };
    usecase
        .execute(
            principal.id,
            ChangePasswordInput {
                old_password: body.old_password,
                new_password: body.new_password,
            },
        )
        .await?;

    let jar = clear_auth_cookies(jar, state.production);
    Ok((StatusCode::OK, jar))
}

// ── POST /auth/logout ─────────────────────────────────────────────────────────

pub async fn logout(
    State(state): State<AppState>,
    session: CurrentSession,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = LogoutUseCase {
        sessions: state.session_repo(),
    };
    usecase.execute(session.0).await?;

    let jar = clear_auth_cookies(jar, state.production);
    Ok((StatusCode::OK, jar))
}
