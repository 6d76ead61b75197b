use crate::entities::{coupon_entity as coupons, course_plan_entity as course_plans};
use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::utils::normalize_coupon_code;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

const MAX_CODE_LEN: usize = 64;

#[derive(Clone)]
pub struct CouponService {
    pool: DbPool,
}

impl CouponService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Check a coupon against an optional plan. Every outcome except a
    /// database failure is reported in the body, never as an error status.
    pub async fn validate_coupon(
        &self,
        request: ValidateCouponRequest,
    ) -> AppResult<ValidateCouponResponse> {
        let code = request
            .code
            .as_deref()
            .map(normalize_coupon_code)
            .unwrap_or_default();
        if code.is_empty() {
            return Ok(ValidateCouponResponse::rejected("Coupon code is required"));
        }

        let coupon = coupons::Entity::find()
            .filter(coupons::Column::Code.eq(code.as_str()))
            .one(self.pool.as_ref())
            .await?;

        let Some(coupon) = coupon else {
            log::debug!("Coupon {code} not found");
            return Ok(ValidateCouponResponse::rejected("Invalid coupon code"));
        };

        if !coupon.is_active {
            return Ok(ValidateCouponResponse::rejected(
                "This coupon is no longer active",
            ));
        }

        if let Some(plan_id) = coupon.plan_id {
            if request.plan_id != Some(plan_id) {
                return Ok(ValidateCouponResponse::rejected(
                    "This coupon is not valid for the selected plan",
                ));
            }
        }

        Ok(ValidateCouponResponse::accepted(&coupon))
    }

    pub async fn list_coupons(&self) -> AppResult<Vec<CouponResponse>> {
        let all = coupons::Entity::find()
            .order_by_desc(coupons::Column::CreatedAt)
            .all(self.pool.as_ref())
            .await?;
        Ok(all.into_iter().map(CouponResponse::from).collect())
    }

    pub async fn create_coupon(&self, request: CreateCouponRequest) -> AppResult<CouponResponse> {
        let code = normalize_coupon_code(&request.code);
        if code.is_empty() || code.len() > MAX_CODE_LEN {
            return Err(AppError::ValidationError(format!(
                "Coupon code must be between 1 and {MAX_CODE_LEN} characters"
            )));
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(AppError::ValidationError(
                "Coupon code may only contain letters, digits, '-' and '_'".to_string(),
            ));
        }
        if request.discount_amount <= 0 {
            return Err(AppError::ValidationError(
                "Discount amount must be positive".to_string(),
            ));
        }

        if let Some(plan_id) = request.plan_id {
            course_plans::Entity::find_by_id(plan_id)
                .one(self.pool.as_ref())
                .await?
                .ok_or_else(|| AppError::ValidationError("Plan does not exist".to_string()))?;
        }

        let existing = coupons::Entity::find()
            .filter(coupons::Column::Code.eq(code.as_str()))
            .one(self.pool.as_ref())
            .await?;
        if existing.is_some() {
            return Err(AppError::ValidationError(
                "Coupon code already exists".to_string(),
            ));
        }

        let coupon = coupons::ActiveModel {
            code: Set(code),
            plan_id: Set(request.plan_id),
            discount_amount: Set(request.discount_amount),
            is_active: Set(request.is_active.unwrap_or(true)),
            ..Default::default()
        }
        .insert(self.pool.as_ref())
        .await?;

        log::info!("Coupon {} created", coupon.code);
        Ok(coupon.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn coupon(code: &str, plan_id: Option<i64>, is_active: bool) -> coupons::Model {
        coupons::Model {
            id: 1,
            code: code.to_string(),
            plan_id,
            discount_amount: 1000,
            is_active,
            created_at: None,
        }
    }

    fn service_with(results: Vec<Vec<coupons::Model>>) -> CouponService {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(results)
            .into_connection();
        CouponService::new(Arc::new(db))
    }

    fn request(code: &str, plan_id: Option<i64>) -> ValidateCouponRequest {
        ValidateCouponRequest {
            code: Some(code.to_string()),
            plan_id,
        }
    }

    #[tokio::test]
    async fn lowercase_code_matches_stored_uppercase_code() {
        let service = service_with(vec![vec![coupon("SAVE10", Some(3), true)]]);

        let response = service
            .validate_coupon(request("save10", Some(3)))
            .await
            .unwrap();

        assert_eq!(
            response,
            ValidateCouponResponse {
                valid: true,
                discount_amount: Some(1000),
                code: Some("SAVE10".to_string()),
                plan_id: Some(3),
                message: None,
            }
        );
    }

    #[tokio::test]
    async fn plan_bound_coupon_requires_matching_plan() {
        let service = service_with(vec![
            vec![coupon("SAVE10", Some(3), true)],
            vec![coupon("SAVE10", Some(3), true)],
        ]);

        let missing_plan = service.validate_coupon(request("SAVE10", None)).await.unwrap();
        assert!(!missing_plan.valid);
        assert!(missing_plan.discount_amount.is_none());

        let other_plan = service
            .validate_coupon(request("SAVE10", Some(4)))
            .await
            .unwrap();
        assert!(!other_plan.valid);
    }

    #[tokio::test]
    async fn unbound_coupon_applies_to_any_plan() {
        let service = service_with(vec![
            vec![coupon("WELCOME", None, true)],
            vec![coupon("WELCOME", None, true)],
        ]);

        assert!(service.validate_coupon(request("welcome", None)).await.unwrap().valid);
        assert!(service.validate_coupon(request("welcome", Some(9))).await.unwrap().valid);
    }

    #[tokio::test]
    async fn inactive_and_unknown_coupons_are_rejected() {
        let service = service_with(vec![vec![coupon("OLD", None, false)], vec![]]);

        let inactive = service.validate_coupon(request("old", None)).await.unwrap();
        assert!(!inactive.valid);
        assert!(inactive.message.is_some());

        let unknown = service.validate_coupon(request("nope", None)).await.unwrap();
        assert!(!unknown.valid);
        assert_eq!(unknown.message.as_deref(), Some("Invalid coupon code"));
    }

    #[tokio::test]
    async fn blank_code_is_rejected_without_a_query() {
        let service = service_with(vec![]);
        let response = service.validate_coupon(request("   ", Some(3))).await.unwrap();
        assert!(!response.valid);
    }

    #[tokio::test]
    async fn create_rejects_bad_input_before_touching_the_database() {
        let service = service_with(vec![]);

        let bad_chars = service
            .create_coupon(CreateCouponRequest {
                code: "save 10%".to_string(),
                plan_id: None,
                discount_amount: 1000,
                is_active: None,
            })
            .await;
        assert!(matches!(bad_chars, Err(AppError::ValidationError(_))));

        let zero = service
            .create_coupon(CreateCouponRequest {
                code: "SAVE10".to_string(),
                plan_id: None,
                discount_amount: 0,
                is_active: None,
            })
            .await;
        assert!(matches!(zero, Err(AppError::ValidationError(_))));
    }

    #[tokio::test]
    async fn create_stores_uppercased_code() {
        let service = service_with(vec![vec![], vec![coupon("SPRING25", None, true)]]);

        let created = service
            .create_coupon(CreateCouponRequest {
                code: "spring25".to_string(),
                plan_id: None,
                discount_amount: 1000,
                is_active: None,
            })
            .await
            .unwrap();

        assert_eq!(created.code, "SPRING25");
        assert!(created.is_active);
    }

    #[tokio::test]
    async fn create_rejects_duplicate_code() {
        let service = service_with(vec![vec![coupon("SPRING25", None, true)]]);

        let duplicate = service
            .create_coupon(CreateCouponRequest {
                code: "Spring25".to_string(),
                plan_id: None,
                discount_amount: 500,
                is_active: Some(true),
            })
            .await;
        assert!(matches!(duplicate, Err(AppError::ValidationError(_))));
    }
}
