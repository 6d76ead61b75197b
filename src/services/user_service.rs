use crate::entities::{
    account_entity as accounts, enrollment_entity as enrollments, payment_entity as payments,
    progress_entity as progress, session_entity as sessions, user_entity as users,
};
use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::{PaginatedResponse, PaginationParams, normalize_phone_number, validate_phone_number};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

const MAX_NAME_LEN: usize = 100;

#[derive(Clone)]
pub struct UserService {
    pool: DbPool,
}

impl UserService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Update the caller's profile. `name` is required; a blank or missing
    /// phone number or image leaves the stored value untouched.
    pub async fn update_profile(
        &self,
        user: users::Model,
        request: UpdateUserRequest,
    ) -> AppResult<UserResponse> {
        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::ValidationError("Name is required".to_string()))?;
        if name.chars().count() > MAX_NAME_LEN {
            return Err(AppError::ValidationError(format!(
                "Name must be at most {MAX_NAME_LEN} characters"
            )));
        }

        let phone_number = match request.phone_number.as_deref().map(str::trim) {
            Some(p) if !p.is_empty() => {
                validate_phone_number(p)?;
                Some(normalize_phone_number(p))
            }
            _ => None,
        };

        let image = match request.image_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Some(validate_image_url(url)?),
            _ => None,
        };

        let user_id = user.id;
        let mut model = user.into_active_model();
        model.name = Set(Some(name.to_string()));
        if let Some(p) = phone_number {
            model.phone_number = Set(Some(p));
        }
        if let Some(i) = image {
            model.image = Set(Some(i));
        }
        model.updated_at = Set(Some(Utc::now()));
        let updated = model.update(self.pool.as_ref()).await?;

        log::info!("User {user_id} updated profile");
        Ok(updated.into())
    }

    pub async fn is_enrolled(
        &self,
        user_id: i64,
        request: CheckEnrollmentRequest,
    ) -> AppResult<CheckEnrollmentResponse> {
        let course_id = request
            .course_id
            .ok_or_else(|| AppError::ValidationError("Missing courseId".to_string()))?;

        let enrollment = enrollments::Entity::find()
            .filter(enrollments::Column::UserId.eq(user_id))
            .filter(enrollments::Column::CourseId.eq(course_id))
            .one(self.pool.as_ref())
            .await?;

        Ok(CheckEnrollmentResponse {
            enrolled: enrollment.is_some_and(|e| e.grants_access()),
        })
    }

    /// Remove a user and every row that references it in one transaction.
    pub async fn delete_user(&self, user_id: i64) -> AppResult<()> {
        let txn = self.pool.begin().await?;

        users::Entity::find_by_id(user_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        progress::Entity::delete_many()
            .filter(progress::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        enrollments::Entity::delete_many()
            .filter(enrollments::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        payments::Entity::delete_many()
            .filter(payments::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        accounts::Entity::delete_many()
            .filter(accounts::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        sessions::Entity::delete_many()
            .filter(sessions::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        users::Entity::delete_by_id(user_id).exec(&txn).await?;

        txn.commit().await?;

        log::info!("User {user_id} deleted");
        Ok(())
    }

    pub async fn list_users(
        &self,
        params: &PaginationParams,
    ) -> AppResult<PaginatedResponse<UserResponse>> {
        let paginator = users::Entity::find()
            .order_by_desc(users::Column::Id)
            .paginate(self.pool.as_ref(), params.get_per_page());

        let total = paginator.num_items().await?;
        let items = paginator
            .fetch_page(params.page_index())
            .await?
            .into_iter()
            .map(UserResponse::from)
            .collect();

        Ok(PaginatedResponse::new(items, params, total))
    }
}

fn validate_image_url(raw: &str) -> AppResult<String> {
    let url = reqwest::Url::parse(raw)
        .map_err(|_| AppError::ValidationError("Invalid image URL".to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url.to_string()),
        _ => Err(AppError::ValidationError(
            "Image URL must use http or https".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::UserRole;
    use crate::services::auth_service::tests::sample_user;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult, Value};
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn deleted(rows: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected: rows,
        }
    }

    #[tokio::test]
    async fn delete_user_removes_children_before_user_in_one_transaction() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![sample_user(42, UserRole::User)]])
            .append_exec_results([
                deleted(3),
                deleted(1),
                deleted(1),
                deleted(1),
                deleted(2),
                deleted(1),
            ])
            .into_connection();
        let db = Arc::new(db);
        let service = UserService::new(Arc::clone(&db));

        service.delete_user(42).await.unwrap();
        drop(service);

        let log = Arc::try_unwrap(db)
            .ok()
            .expect("service released the connection")
            .into_transaction_log();
        assert_eq!(log.len(), 1, "all statements belong to one transaction");

        let rendered = format!("{:?}", log[0]);
        let position = |table: &str| {
            rendered
                .find(&format!(r#"DELETE FROM \"{table}\""#))
                .unwrap_or_else(|| panic!("no delete for {table}"))
        };
        let order = [
            position("progress"),
            position("enrollments"),
            position("payments"),
            position("accounts"),
            position("sessions"),
            position("users"),
        ];
        assert!(order.windows(2).all(|w| w[0] < w[1]));
    }

    #[tokio::test]
    async fn deleting_missing_user_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<users::Model>::new()])
            .into_connection();
        let service = UserService::new(Arc::new(db));

        let err = service.delete_user(42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn enrollment_check_requires_course_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = UserService::new(Arc::new(db));

        let err = service
            .is_enrolled(1, CheckEnrollmentRequest { course_id: None })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn enrollment_check_needs_an_active_row() {
        let inactive = enrollments::Model {
            id: 1,
            user_id: 1,
            course_id: 9,
            plan: "basic".to_string(),
            end_date: None,
            is_active: false,
            created_at: None,
        };
        let active = enrollments::Model {
            is_active: true,
            ..inactive.clone()
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![inactive], vec![active], vec![]])
            .into_connection();
        let service = UserService::new(Arc::new(db));
        let request = || CheckEnrollmentRequest { course_id: Some(9) };

        assert!(!service.is_enrolled(1, request()).await.unwrap().enrolled);
        assert!(service.is_enrolled(1, request()).await.unwrap().enrolled);
        assert!(!service.is_enrolled(1, request()).await.unwrap().enrolled);
    }

    #[tokio::test]
    async fn update_profile_normalizes_phone_number() {
        let updated = users::Model {
            name: Some("Ravi".to_string()),
            phone_number: Some("+919876543210".to_string()),
            ..sample_user(4, UserRole::User)
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![updated]])
            .into_connection();
        let service = UserService::new(Arc::new(db));

        let response = service
            .update_profile(
                sample_user(4, UserRole::User),
                UpdateUserRequest {
                    name: Some("  Ravi ".to_string()),
                    phone_number: Some("+91 98765-43210".to_string()),
                    image_url: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(response.phone_number.as_deref(), Some("+919876543210"));
    }

    #[tokio::test]
    async fn update_profile_rejects_invalid_input() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let service = UserService::new(Arc::new(db));
        let user = || sample_user(4, UserRole::User);

        let no_name = service
            .update_profile(user(), UpdateUserRequest::default())
            .await;
        assert!(matches!(no_name, Err(AppError::ValidationError(_))));

        let bad_phone = service
            .update_profile(
                user(),
                UpdateUserRequest {
                    name: Some("Ravi".to_string()),
                    phone_number: Some("12".to_string()),
                    image_url: None,
                },
            )
            .await;
        assert!(matches!(bad_phone, Err(AppError::ValidationError(_))));

        let bad_image = service
            .update_profile(
                user(),
                UpdateUserRequest {
                    name: Some("Ravi".to_string()),
                    phone_number: None,
                    image_url: Some("javascript:alert(1)".to_string()),
                },
            )
            .await;
        assert!(matches!(bad_image, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn list_users_reports_totals() {
        let count = BTreeMap::from([("num_items", Value::BigInt(Some(3)))]);
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![count]])
            .append_query_results([vec![
                sample_user(3, UserRole::Admin),
                sample_user(2, UserRole::User),
            ]])
            .into_connection();
        let service = UserService::new(Arc::new(db));

        let page = service
            .list_users(&PaginationParams::new(Some(1), Some(2)))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.pagination.total, 3);
        assert_eq!(page.pagination.total_pages, 2);
    }
}
