use crate::entities::{
    course_entity as courses, course_plan_entity as course_plans,
    internship_registration_entity as internships,
};
use crate::database::DbPool;
use crate::error::AppResult;
use crate::models::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashMap;

/// Read-only views backing the admin console.
#[derive(Clone)]
pub struct AdminService {
    pool: DbPool,
}

impl AdminService {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Every plan, active or not, labelled with its course title.
    pub async fn list_plans(&self) -> AppResult<Vec<AdminPlanResponse>> {
        let plans = course_plans::Entity::find()
            .order_by_asc(course_plans::Column::CourseId)
            .order_by_asc(course_plans::Column::Price)
            .all(self.pool.as_ref())
            .await?;
        if plans.is_empty() {
            return Ok(Vec::new());
        }

        let mut course_ids: Vec<i64> = plans.iter().map(|p| p.course_id).collect();
        course_ids.dedup();
        let titles: HashMap<i64, String> = courses::Entity::find()
            .filter(courses::Column::Id.is_in(course_ids))
            .all(self.pool.as_ref())
            .await?
            .into_iter()
            .map(|c| (c.id, c.title))
            .collect();

        Ok(plans
            .into_iter()
            .map(|plan| {
                let title = titles.get(&plan.course_id).cloned();
                AdminPlanResponse::new(plan, title)
            })
            .collect())
    }

    pub async fn list_internships(&self) -> AppResult<Vec<InternshipRegistrationResponse>> {
        let registrations = internships::Entity::find()
            .order_by_desc(internships::Column::CreatedAt)
            .order_by_desc(internships::Column::Id)
            .all(self.pool.as_ref())
            .await?;
        Ok(registrations
            .into_iter()
            .map(InternshipRegistrationResponse::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn plan(id: i64, course_id: i64, price: i64, is_active: bool) -> course_plans::Model {
        course_plans::Model {
            id,
            course_id,
            plan_type: if price > 10000 { "premium" } else { "basic" }.to_string(),
            price,
            is_active,
            created_at: None,
        }
    }

    #[tokio::test]
    async fn plans_carry_course_titles_including_inactive_ones() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![
                plan(1, 1, 4900, true),
                plan(2, 1, 19900, false),
                plan(3, 2, 9900, true),
            ]])
            .append_query_results([vec![courses::Model {
                id: 1,
                slug: "rust-basics".to_string(),
                title: "Rust Basics".to_string(),
                description: None,
                thumbnail_url: None,
                created_at: None,
            }]])
            .into_connection();
        let service = AdminService::new(Arc::new(db));

        let plans = service.list_plans().await.unwrap();

        assert_eq!(plans.len(), 3);
        assert_eq!(plans[1].course_title.as_deref(), Some("Rust Basics"));
        assert!(!plans[1].is_active);
        // course 2 was not returned by the lookup
        assert_eq!(plans[2].course_title, None);
    }

    #[tokio::test]
    async fn internships_keep_query_order() {
        let registration = |id: i64, day: u32| internships::Model {
            id,
            name: format!("Applicant {id}"),
            email: format!("applicant{id}@example.com"),
            phone_number: "+919876543210".to_string(),
            college: None,
            domain: "backend".to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 4, day, 9, 0, 0).single(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![registration(2, 12), registration(1, 3)]])
            .into_connection();
        let service = AdminService::new(Arc::new(db));

        let listed = service.list_internships().await.unwrap();
        assert_eq!(listed.iter().map(|r| r.id).collect::<Vec<_>>(), vec![2, 1]);
    }
}
