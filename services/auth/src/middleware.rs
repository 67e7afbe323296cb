//! Access-token middleware for protected routes.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use axum_extra::extract::cookie::CookieJar;

use credence_auth_types::cookie::ACCESS_TOKEN_COOKIE;
use credence_auth_types::principal::{AuthenticatedPrincipal, CurrentSession};
use credence_auth_types::token::validate_token;

use crate::domain::repository::UserRepository as _;
use crate::error::AuthServiceError;
use crate::state::AppState;

/// Validates the access-token cookie and attaches [`AuthenticatedPrincipal`]
/// and [`CurrentSession`] to the request. Any failure short-circuits with
/// `INVALID_TOKEN`; refresh tokens are rejected here because they lack a
/// subject claim and are signed with a different secret.
pub async fn authenticate(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthServiceError> {
    let token = jar
        .get(ACCESS_TOKEN_COOKIE)
        .map(|cookie| cookie.value().to_owned())
        .ok_or(AuthServiceError::InvalidToken)?;

    let info = validate_token(&token, &state.tokens.access_secret)
        .map_err(|_| AuthServiceError::InvalidToken)?;
    let user_id = info.user_id.ok_or(AuthServiceError::InvalidToken)?;

    let user = state
        .user_repo()
        .find_by_id(user_id)
        .await?
        .ok_or(AuthServiceError::InvalidToken)?;

    request.extensions_mut().insert(AuthenticatedPrincipal {
        id: user.id,
        email: user.email,
        mfa_enabled: user.mfa_enabled,
    });
    request
        .extensions_mut()
        .insert(CurrentSession(info.session_id));

    Ok(next.run(request).await)
}
