use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, sea_query::Expr,
};
use uuid::Uuid;

use credence_auth_schema::{sessions, users, verification_codes};

use crate::domain::repository::{SessionRepository, UserRepository, VerificationCodeRepository};
use crate::domain::types::{AuthUser, Session, VerificationCode, VerificationPurpose};
use crate::error::AuthServiceError;

// ── User repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(user_from_model))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<AuthUser>, AuthServiceError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn create(&self, user: &AuthUser) -> Result<(), AuthServiceError> {
        users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            name: Set(user.name.clone()),
            password_hash: Set(user.password_hash.clone()),
            email_verified: Set(user.email_verified),
            mfa_enabled: Set(user.mfa_enabled),
            mfa_secret: Set(user.mfa_secret.clone()),
            created_at: Set(user.created_at),
            updated_at: Set(user.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(())
    }

    async fn set_email_verified(&self, id: Uuid) -> Result<bool, AuthServiceError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::EmailVerified, Expr::value(true))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("set email verified")?;
        Ok(result.rows_affected > 0)
    }

    async fn update_password_hash(&self, id: Uuid, hash: &str) -> Result<bool, AuthServiceError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::PasswordHash, Expr::value(hash))
            .col_expr(users::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("update password hash")?;
        Ok(result.rows_affected > 0)
    }

    async fn set_mfa_secret(&self, id: Uuid, secret: &str) -> Result<(), AuthServiceError> {
        users::ActiveModel {
            id: Set(id),
            mfa_secret: Set(Some(secret.to_owned())),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set mfa secret")?;
        Ok(())
    }

    async fn set_mfa_enabled(&self, id: Uuid, enabled: bool) -> Result<(), AuthServiceError> {
        users::ActiveModel {
            id: Set(id),
            mfa_enabled: Set(enabled),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("set mfa enabled")?;
        Ok(())
    }

    async fn clear_mfa(&self, id: Uuid) -> Result<(), AuthServiceError> {
        users::ActiveModel {
            id: Set(id),
            mfa_enabled: Set(false),
            mfa_secret: Set(None),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("clear mfa")?;
        Ok(())
    }
}

fn user_from_model(model: users::Model) -> AuthUser {
    AuthUser {
        id: model.id,
        email: model.email,
        name: model.name,
        password_hash: model.password_hash,
        email_verified: model.email_verified,
        mfa_enabled: model.mfa_enabled,
        mfa_secret: model.mfa_secret,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Session repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSessionRepository {
    pub db: DatabaseConnection,
}

impl SessionRepository for DbSessionRepository {
    async fn create(&self, session: &Session) -> Result<(), AuthServiceError> {
        sessions::ActiveModel {
            id: Set(session.id),
            user_id: Set(session.user_id),
            user_agent: Set(session.user_agent.clone()),
            created_at: Set(session.created_at),
            expires_at: Set(session.expires_at),
        }
        .insert(&self.db)
        .await
        .context("create session")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Session>, AuthServiceError> {
        let model = sessions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find session by id")?;
        Ok(model.map(session_from_model))
    }

    async fn list_active_by_user(&self, user_id: Uuid) -> Result<Vec<Session>, AuthServiceError> {
        let now = Utc::now();
        let models = sessions::Entity::find()
            .filter(sessions::Column::UserId.eq(user_id))
            .filter(sessions::Column::ExpiresAt.gt(now))
            .order_by_desc(sessions::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list active sessions")?;
        Ok(models.into_iter().map(session_from_model).collect())
    }

    async fn extend_expiry(
        &self,
        id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthServiceError> {
        sessions::ActiveModel {
            id: Set(id),
            expires_at: Set(expires_at),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("extend session expiry")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AuthServiceError> {
        let result = sessions::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete session")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_for_user(&self, id: Uuid, user_id: Uuid) -> Result<bool, AuthServiceError> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::Id.eq(id))
            .filter(sessions::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete session for user")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_all_by_user(&self, user_id: Uuid) -> Result<u64, AuthServiceError> {
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .context("delete all sessions for user")?;
        Ok(result.rows_affected)
    }
}

fn session_from_model(model: sessions::Model) -> Session {
    Session {
        id: model.id,
        user_id: model.user_id,
        user_agent: model.user_agent,
        created_at: model.created_at,
        expires_at: model.expires_at,
    }
}

// ── Verification code repository ──────────────────────────────────────────────

#[derive(Clone)]
pub struct DbVerificationCodeRepository {
    pub db: DatabaseConnection,
}

impl VerificationCodeRepository for DbVerificationCodeRepository {
    async fn create(&self, code: &VerificationCode) -> Result<(), AuthServiceError> {
        verification_codes::ActiveModel {
            id: Set(code.id),
            user_id: Set(code.user_id),
            code: Set(code.code.clone()),
            purpose: Set(code.purpose.as_str().to_owned()),
            created_at: Set(code.created_at),
            expires_at: Set(code.expires_at),
        }
        .insert(&self.db)
        .await
        .context("create verification code")?;
        Ok(())
    }

    async fn find_valid(
        &self,
        code: &str,
        purpose: VerificationPurpose,
    ) -> Result<Option<VerificationCode>, AuthServiceError> {
        let now = Utc::now();
        let model = verification_codes::Entity::find()
            .filter(verification_codes::Column::Code.eq(code))
            .filter(verification_codes::Column::Purpose.eq(purpose.as_str()))
            .filter(verification_codes::Column::ExpiresAt.gt(now))
            .one(&self.db)
            .await
            .context("find valid verification code")?;
        // The query filtered on purpose, so the column value matches.
        Ok(model.map(|m| code_from_model(m, purpose)))
    }

    async fn count_recent(
        &self,
        user_id: Uuid,
        purpose: VerificationPurpose,
        since: DateTime<Utc>,
    ) -> Result<u64, AuthServiceError> {
        let count = verification_codes::Entity::find()
            .filter(verification_codes::Column::UserId.eq(user_id))
            .filter(verification_codes::Column::Purpose.eq(purpose.as_str()))
            .filter(verification_codes::Column::CreatedAt.gt(since))
            .count(&self.db)
            .await
            .context("count recent verification codes")?;
        Ok(count)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AuthServiceError> {
        verification_codes::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete verification code")?;
        Ok(())
    }
}

fn code_from_model(
    model: verification_codes::Model,
    purpose: VerificationPurpose,
) -> VerificationCode {
    VerificationCode {
        id: model.id,
        user_id: model.user_id,
        code: model.code,
        purpose,
        created_at: model.created_at,
        expires_at: model.expires_at,
    }
}
