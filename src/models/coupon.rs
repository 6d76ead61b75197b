use crate::entities::coupon_entity as coupons;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCouponRequest {
    #[serde(default)]
    #[schema(example = "save10")]
    pub code: Option<String>,
    #[serde(default)]
    #[schema(example = 3)]
    pub plan_id: Option<i64>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidateCouponResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discount_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidateCouponResponse {
    pub fn accepted(coupon: &coupons::Model) -> Self {
        Self {
            valid: true,
            discount_amount: Some(coupon.discount_amount),
            code: Some(coupon.code.clone()),
            plan_id: coupon.plan_id,
            message: None,
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            discount_amount: None,
            code: None,
            plan_id: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCouponRequest {
    #[schema(example = "WELCOME20")]
    pub code: String,
    pub plan_id: Option<i64>,
    #[schema(example = 2000)]
    pub discount_amount: i64,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CouponResponse {
    pub id: i64,
    pub code: String,
    pub plan_id: Option<i64>,
    pub discount_amount: i64,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<coupons::Model> for CouponResponse {
    fn from(coupon: coupons::Model) -> Self {
        Self {
            id: coupon.id,
            code: coupon.code,
            plan_id: coupon.plan_id,
            discount_amount: coupon.discount_amount,
            is_active: coupon.is_active,
            created_at: coupon.created_at,
        }
    }
}
