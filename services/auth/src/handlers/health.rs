use axum::{extract::State, http::StatusCode};
use tracing::warn;

use crate::state::AppState;

/// `GET /readyz` — the service is ready when Postgres answers a ping.
pub async fn readyz(State(state): State<AppState>) -> StatusCode {
    match state.db.ping().await {
        Ok(()) => StatusCode::OK,
        Err(err) => {
            warn!(error = %err, "readiness probe failed: database unreachable");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
