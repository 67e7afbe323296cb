//! Session inspection and remote revocation for the signed-in user.

use uuid::Uuid;

use crate::domain::repository::SessionRepository;
use crate::domain::types::Session;
use crate::error::AuthServiceError;

pub struct ListSessionsUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> ListSessionsUseCase<S> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<Session>, AuthServiceError> {
        self.sessions.list_active_by_user(user_id).await
    }
}

pub struct DeleteSessionUseCase<S: SessionRepository> {
    pub sessions: S,
}

impl<S: SessionRepository> DeleteSessionUseCase<S> {
    /// Revokes a single session. Scoped to the caller so users cannot kill
    /// sessions they do not own; a miss (wrong owner or no such row) is
    /// reported the same way as not-found.
    pub async fn execute(&self, user_id: Uuid, session_id: Uuid) -> Result<(), AuthServiceError> {
        let deleted = self.sessions.delete_for_user(session_id, user_id).await?;
        if deleted {
            Ok(())
        } else {
            Err(AuthServiceError::NotFound)
        }
    }
}
