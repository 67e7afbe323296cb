use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post, put},
};
use tower_http::trace::TraceLayer;

use credence_core::health::healthz;
use credence_core::middleware::request_id_layer;

use crate::handlers::{
    auth::{
        change_password, forgot_password, login, logout, refresh, register, reset_password,
        verify_email,
    },
    health::readyz,
    mfa::{generate_setup, revoke, verify_login, verify_setup},
    session::{delete_session, list_sessions},
};
use crate::middleware::authenticate;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    // Routes that require a valid access token.
    let protected = Router::new()
        .route("/auth/password/change", post(change_password))
        .route("/auth/logout", post(logout))
        .route("/sessions", get(list_sessions))
        .route("/sessions/{session_id}", delete(delete_session))
        .route("/mfa/setup", post(generate_setup))
        .route("/mfa/verify", post(verify_setup))
        .route("/mfa/revoke", put(revoke))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            authenticate,
        ));

    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Credential flows
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/auth/verify/email", post(verify_email))
        .route("/auth/password/forgot", post(forgot_password))
        .route("/auth/password/reset", post(reset_password))
        // MFA login completion (caller holds no tokens yet)
        .route("/mfa/verify-login", post(verify_login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
