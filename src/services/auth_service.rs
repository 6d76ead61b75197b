use crate::entities::{UserRole, session_entity as sessions, user_entity as users};
use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::utils::{JwtService, SessionClaims};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use uuid::Uuid;

/// A freshly stored session and the signed token that refers to it.
#[derive(Debug, Clone)]
pub struct IssuedSession {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct AuthService {
    pool: DbPool,
    jwt_service: JwtService,
}

impl AuthService {
    pub fn new(pool: DbPool, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    /// Store a session row for `user_id` and sign a cookie token for it.
    ///
    /// This is the hook the identity provider's sign-in callback calls once it
    /// has resolved the local user.
    pub async fn issue_session(&self, user_id: i64) -> AppResult<IssuedSession> {
        let expires = Utc::now() + Duration::seconds(self.jwt_service.get_session_expires_in());

        let session = sessions::ActiveModel {
            session_token: Set(Uuid::new_v4().to_string()),
            user_id: Set(user_id),
            expires: Set(expires),
            ..Default::default()
        }
        .insert(self.pool.as_ref())
        .await?;

        let token = self.jwt_service.generate_session_token(
            session.user_id,
            &session.session_token,
            session.expires,
        )?;

        log::info!("Session issued for user {user_id}");
        Ok(IssuedSession {
            token,
            expires_at: session.expires,
        })
    }

    /// Resolve the signed-in user behind verified session claims.
    pub async fn resolve_user(&self, claims: &SessionClaims) -> AppResult<users::Model> {
        let user_id = claims.user_id()?;

        let session = sessions::Entity::find_by_id(claims.sid.clone())
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::AuthError("Session not found".to_string()))?;

        if session.user_id != user_id {
            return Err(AppError::AuthError("Session does not match user".to_string()));
        }
        if session.expires <= Utc::now() {
            return Err(AppError::AuthError("Session expired".to_string()));
        }

        users::Entity::find_by_id(user_id)
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::AuthError("User not found".to_string()))
    }

    pub async fn revoke_session(&self, claims: &SessionClaims) -> AppResult<()> {
        sessions::Entity::delete_by_id(claims.sid.clone())
            .exec(self.pool.as_ref())
            .await?;
        Ok(())
    }
}

pub fn ensure_admin(user: &users::Model) -> AppResult<()> {
    if user.role != UserRole::Admin {
        log::warn!("User {} with role {} denied admin access", user.id, user.role);
        return Err(AppError::Forbidden);
    }
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    pub(crate) fn sample_user(id: i64, role: UserRole) -> users::Model {
        users::Model {
            id,
            name: Some("Asha Verma".to_string()),
            email: Some(format!("user{id}@example.com")),
            phone_number: None,
            image: None,
            role,
            created_at: None,
            updated_at: None,
        }
    }

    fn sample_session(token: &str, user_id: i64, expires: DateTime<Utc>) -> sessions::Model {
        sessions::Model {
            session_token: token.to_string(),
            user_id,
            expires,
            created_at: None,
        }
    }

    fn claims(user_id: i64, sid: &str) -> SessionClaims {
        SessionClaims {
            sub: user_id.to_string(),
            sid: sid.to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
            iat: Utc::now().timestamp(),
        }
    }

    fn jwt() -> JwtService {
        JwtService::new("test-secret", 3600)
    }

    #[tokio::test]
    async fn issue_session_signs_the_stored_token() {
        let expires = Utc::now() + Duration::hours(1);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_session("stored-token", 7, expires)]])
            .into_connection();
        let service = AuthService::new(Arc::new(db), jwt());

        let issued = service.issue_session(7).await.unwrap();
        let claims = jwt().verify_session_token(&issued.token).unwrap();

        assert_eq!(claims.sid, "stored-token");
        assert_eq!(claims.user_id().unwrap(), 7);
        assert_eq!(issued.expires_at, expires);
    }

    #[tokio::test]
    async fn resolve_user_loads_user_for_live_session() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_session(
                "s1",
                3,
                Utc::now() + Duration::hours(1),
            )]])
            .append_query_results([vec![sample_user(3, UserRole::Intern)]])
            .into_connection();
        let service = AuthService::new(Arc::new(db), jwt());

        let user = service.resolve_user(&claims(3, "s1")).await.unwrap();
        assert_eq!(user.id, 3);
        assert_eq!(user.role, UserRole::Intern);
    }

    #[tokio::test]
    async fn resolve_user_rejects_expired_session() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_session(
                "s1",
                3,
                Utc::now() - Duration::minutes(1),
            )]])
            .into_connection();
        let service = AuthService::new(Arc::new(db), jwt());

        let err = service.resolve_user(&claims(3, "s1")).await.unwrap_err();
        assert!(matches!(err, AppError::AuthError(_)));
    }

    #[tokio::test]
    async fn resolve_user_rejects_missing_or_foreign_session() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<sessions::Model>::new()])
            .append_query_results([vec![sample_session(
                "s2",
                99,
                Utc::now() + Duration::hours(1),
            )]])
            .into_connection();
        let service = AuthService::new(Arc::new(db), jwt());

        let missing = service.resolve_user(&claims(3, "gone")).await.unwrap_err();
        assert!(matches!(missing, AppError::AuthError(_)));

        let foreign = service.resolve_user(&claims(3, "s2")).await.unwrap_err();
        assert!(matches!(foreign, AppError::AuthError(_)));
    }

    #[tokio::test]
    async fn revoke_session_deletes_the_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let service = AuthService::new(Arc::new(db), jwt());

        service.revoke_session(&claims(3, "s1")).await.unwrap();
    }

    #[test]
    fn only_admins_pass_admin_gate() {
        assert!(ensure_admin(&sample_user(1, UserRole::Admin)).is_ok());
        assert!(matches!(
            ensure_admin(&sample_user(1, UserRole::Intern)),
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            ensure_admin(&sample_user(1, UserRole::User)),
            Err(AppError::Forbidden)
        ));
    }
}
