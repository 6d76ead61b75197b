use crate::entities::{
    content_entity as contents, course_entity as courses, course_plan_entity as course_plans,
    enrollment_entity as enrollments, module_entity as modules, user_entity as users,
};
use crate::database::DbPool;
use crate::error::{AppError, AppResult};
use crate::models::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;

#[derive(Clone)]
pub struct CourseService {
    pool: DbPool,
}

impl CourseService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Catalog with the caller's enrollment attached to each course.
    pub async fn list_courses(&self, user_id: i64) -> AppResult<Vec<CourseWithEnrollment>> {
        let all_courses = courses::Entity::find()
            .order_by_asc(courses::Column::Id)
            .all(self.pool.as_ref())
            .await?;

        let mut by_course: HashMap<i64, enrollments::Model> = enrollments::Entity::find()
            .filter(enrollments::Column::UserId.eq(user_id))
            .all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(|e| (e.course_id, e))
            .collect();

        Ok(all_courses
            .into_iter()
            .map(|course| {
                let enrollment = by_course.remove(&course.id);
                CourseWithEnrollment::new(course, enrollment)
            })
            .collect())
    }

    pub async fn get_course_detail(
        &self,
        slug: &str,
        user_id: i64,
    ) -> AppResult<CourseDetailResponse> {
        let course = self.find_course_by_slug(slug).await?;

        let course_modules = modules::Entity::find()
            .filter(modules::Column::CourseId.eq(course.id))
            .order_by_asc(modules::Column::SortOrder)
            .all(self.pool.as_ref())
            .await?;

        let mut contents_by_module: HashMap<i64, Vec<contents::Model>> = HashMap::new();
        if !course_modules.is_empty() {
            let module_ids: Vec<i64> = course_modules.iter().map(|m| m.id).collect();
            let module_contents = contents::Entity::find()
                .filter(contents::Column::ModuleId.is_in(module_ids))
                .order_by_asc(contents::Column::SortOrder)
                .all(self.pool.as_ref())
                .await?;
            for content in module_contents {
                contents_by_module
                    .entry(content.module_id)
                    .or_default()
                    .push(content);
            }
        }

        let enrollment = enrollments::Entity::find()
            .filter(enrollments::Column::UserId.eq(user_id))
            .filter(enrollments::Column::CourseId.eq(course.id))
            .one(self.pool.as_ref())
            .await?;

        let module_responses: Vec<ModuleResponse> = course_modules
            .into_iter()
            .map(|module| {
                let items = contents_by_module.remove(&module.id).unwrap_or_default();
                ModuleResponse::new(module, items)
            })
            .collect();

        let entry_content_id = entry_content_id(&module_responses);
        let has_access = enrollment.as_ref().is_some_and(|e| e.grants_access());

        Ok(CourseDetailResponse {
            course: course.into(),
            modules: module_responses,
            enrollment: enrollment.map(EnrollmentResponse::from),
            has_access,
            entry_content_id,
        })
    }

    /// Active plans of a course, cheapest first.
    pub async fn get_course_plans(&self, slug: &str) -> AppResult<CoursePlansResponse> {
        let course = self.find_course_by_slug(slug).await?;

        let plans = course_plans::Entity::find()
            .filter(course_plans::Column::CourseId.eq(course.id))
            .filter(course_plans::Column::IsActive.eq(true))
            .order_by_asc(course_plans::Column::Price)
            .all(self.pool.as_ref())
            .await?;

        Ok(CoursePlansResponse {
            plans: plans.into_iter().map(PlanResponse::from).collect(),
        })
    }

    /// Courses the user is actively enrolled in; learners with the plain
    /// `user` role are turned away.
    pub async fn get_dashboard_courses(
        &self,
        user: &users::Model,
    ) -> AppResult<Vec<CourseWithEnrollment>> {
        if !user.role.can_access_dashboard() {
            return Err(AppError::Forbidden);
        }

        let active = enrollments::Entity::find()
            .filter(enrollments::Column::UserId.eq(user.id))
            .filter(enrollments::Column::IsActive.eq(true))
            .all(self.pool.as_ref())
            .await?;
        if active.is_empty() {
            return Ok(Vec::new());
        }

        let course_ids: Vec<i64> = active.iter().map(|e| e.course_id).collect();
        let mut by_course: HashMap<i64, enrollments::Model> =
            active.into_iter().map(|e| (e.course_id, e)).collect();

        let enrolled = courses::Entity::find()
            .filter(courses::Column::Id.is_in(course_ids))
            .order_by_asc(courses::Column::Id)
            .all(self.pool.as_ref())
            .await?;

        Ok(enrolled
            .into_iter()
            .map(|course| {
                let enrollment = by_course.remove(&course.id);
                CourseWithEnrollment::new(course, enrollment)
            })
            .collect())
    }

    async fn find_course_by_slug(&self, slug: &str) -> AppResult<courses::Model> {
        courses::Entity::find()
            .filter(courses::Column::Slug.eq(slug))
            .one(self.pool.as_ref())
            .await?
            .ok_or_else(|| AppError::NotFound("Course not found".to_string()))
    }
}

/// Modules and their contents arrive sorted, so the entry point is the first
/// content of the first module that has any.
fn entry_content_id(modules: &[ModuleResponse]) -> Option<i64> {
    modules
        .iter()
        .find_map(|module| module.contents.first().map(|content| content.id))
}
