use crate::entities::{
    content_entity as contents, course_entity as courses, course_plan_entity as course_plans,
    enrollment_entity as enrollments, module_entity as modules,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: i64,
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub course_id: i64,
    pub plan: String,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseWithEnrollment {
    pub course: CourseResponse,
    pub enrollment: Option<EnrollmentResponse>,
    pub has_access: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContentResponse {
    pub id: i64,
    pub title: String,
    pub video_key: Option<String>,
    pub duration_seconds: Option<i32>,
    pub order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModuleResponse {
    pub id: i64,
    pub title: String,
    pub order: i32,
    pub contents: Vec<ContentResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetailResponse {
    pub course: CourseResponse,
    pub modules: Vec<ModuleResponse>,
    pub enrollment: Option<EnrollmentResponse>,
    pub has_access: bool,
    /// First content, by ascending order, of the first module that has any.
    /// Empty modules are skipped; `None` when the course has no contents.
    pub entry_content_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub id: i64,
    pub course_id: i64,
    pub plan_type: String,
    pub price: i64,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CoursePlansResponse {
    pub plans: Vec<PlanResponse>,
}

impl From<courses::Model> for CourseResponse {
    fn from(course: courses::Model) -> Self {
        Self {
            id: course.id,
            slug: course.slug,
            title: course.title,
            description: course.description,
            thumbnail_url: course.thumbnail_url,
        }
    }
}

impl From<enrollments::Model> for EnrollmentResponse {
    fn from(enrollment: enrollments::Model) -> Self {
        Self {
            course_id: enrollment.course_id,
            plan: enrollment.plan,
            end_date: enrollment.end_date,
            is_active: enrollment.is_active,
        }
    }
}

impl CourseWithEnrollment {
    pub fn new(course: courses::Model, enrollment: Option<enrollments::Model>) -> Self {
        let has_access = enrollment.as_ref().is_some_and(|e| e.grants_access());
        Self {
            course: course.into(),
            enrollment: enrollment.map(EnrollmentResponse::from),
            has_access,
        }
    }
}

impl From<contents::Model> for ContentResponse {
    fn from(content: contents::Model) -> Self {
        Self {
            id: content.id,
            title: content.title,
            video_key: content.video_key,
            duration_seconds: content.duration_seconds,
            order: content.sort_order,
        }
    }
}

impl ModuleResponse {
    pub fn new(module: modules::Model, contents: Vec<contents::Model>) -> Self {
        Self {
            id: module.id,
            title: module.title,
            order: module.sort_order,
            contents: contents.into_iter().map(ContentResponse::from).collect(),
        }
    }
}

impl From<course_plans::Model> for PlanResponse {
    fn from(plan: course_plans::Model) -> Self {
        Self {
            id: plan.id,
            course_id: plan.course_id,
            plan_type: plan.plan_type,
            price: plan.price,
            is_active: plan.is_active,
        }
    }
}
