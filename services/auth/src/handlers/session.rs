use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Serialize;
use uuid::Uuid;

use credence_auth_types::principal::{AuthenticatedPrincipal, CurrentSession};

use crate::domain::types::Session;
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::session::{DeleteSessionUseCase, ListSessionsUseCase};

// ── GET /sessions ─────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub id: Uuid,
    pub user_agent: Option<String>,
    #[serde(serialize_with = "credence_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "credence_core::serde::to_rfc3339_ms")]
    pub expires_at: chrono::DateTime<chrono::Utc>,
    /// Marks the session backing the caller's own access token.
    pub current: bool,
}

pub async fn list_sessions(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    current: CurrentSession,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = ListSessionsUseCase {
        sessions: state.session_repo(),
    };
    let sessions = usecase.execute(principal.id).await?;

    let views: Vec<SessionView> = sessions
        .into_iter()
        .map(|s: Session| SessionView {
            current: s.id == current.0,
            id: s.id,
            user_agent: s.user_agent,
            created_at: s.created_at,
            expires_at: s.expires_at,
        })
        .collect();

    Ok(Json(views))
}

// ── DELETE /sessions/{session_id} ─────────────────────────────────────────────

pub async fn delete_session(
    State(state): State<AppState>,
    principal: AuthenticatedPrincipal,
    Path(session_id): Path<Uuid>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = DeleteSessionUseCase {
        sessions: state.session_repo(),
    };
    usecase.execute(principal.id, session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
