use sea_orm::DatabaseConnection;

use crate::infra::db::{DbSessionRepository, DbUserRepository, DbVerificationCodeRepository};
use crate::infra::mailer::AppMailer;
use crate::usecase::TokenConfig;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub mailer: AppMailer,
    pub tokens: TokenConfig,
    pub production: bool,
    pub app_origin: String,
    pub mfa_issuer: String,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn session_repo(&self) -> DbSessionRepository {
        DbSessionRepository {
            db: self.db.clone(),
        }
    }

    pub fn verification_code_repo(&self) -> DbVerificationCodeRepository {
        DbVerificationCodeRepository {
            db: self.db.clone(),
        }
    }
}
