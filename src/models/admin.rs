use crate::entities::{course_plan_entity as course_plans, internship_registration_entity as internships};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminPlanResponse {
    pub id: i64,
    pub course_id: i64,
    pub course_title: Option<String>,
    pub plan_type: String,
    pub price: i64,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl AdminPlanResponse {
    pub fn new(plan: course_plans::Model, course_title: Option<String>) -> Self {
        Self {
            id: plan.id,
            course_id: plan.course_id,
            course_title,
            plan_type: plan.plan_type,
            price: plan.price,
            is_active: plan.is_active,
            created_at: plan.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InternshipRegistrationResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub college: Option<String>,
    pub domain: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<internships::Model> for InternshipRegistrationResponse {
    fn from(reg: internships::Model) -> Self {
        Self {
            id: reg.id,
            name: reg.name,
            email: reg.email,
            phone_number: reg.phone_number,
            college: reg.college,
            domain: reg.domain,
            created_at: reg.created_at,
        }
    }
}
