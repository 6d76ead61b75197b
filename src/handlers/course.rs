use crate::handlers::current_user;
use crate::models::*;
use crate::services::{AuthService, CourseService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/courses",
    tag = "course",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Catalog with the caller's enrollments", body = [CourseWithEnrollment]),
        (status = 401, description = "No valid session", body = ErrorResponse)
    )
)]
pub async fn list_courses(
    auth_service: web::Data<AuthService>,
    course_service: web::Data<CourseService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let result = async {
        let user = current_user(&auth_service, &req).await?;
        course_service.list_courses(user.id).await
    }
    .await;

    match result {
        Ok(courses) => Ok(HttpResponse::Ok().json(courses)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/courses/{slug}",
    tag = "course",
    params(
        ("slug" = String, Path, description = "Course slug")
    ),
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Course with modules, contents and access state", body = CourseDetailResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    )
)]
pub async fn get_course(
    auth_service: web::Data<AuthService>,
    course_service: web::Data<CourseService>,
    req: HttpRequest,
    slug: web::Path<String>,
) -> Result<HttpResponse> {
    let result = async {
        let user = current_user(&auth_service, &req).await?;
        course_service.get_course_detail(&slug, user.id).await
    }
    .await;

    match result {
        Ok(detail) => Ok(HttpResponse::Ok().json(detail)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/courses/{slug}/plans",
    tag = "course",
    params(
        ("slug" = String, Path, description = "Course slug")
    ),
    responses(
        (status = 200, description = "Active plans, cheapest first", body = CoursePlansResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    )
)]
pub async fn get_course_plans(
    course_service: web::Data<CourseService>,
    slug: web::Path<String>,
) -> Result<HttpResponse> {
    match course_service.get_course_plans(&slug).await {
        Ok(plans) => Ok(HttpResponse::Ok().json(plans)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn course_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/courses")
            .route("", web::get().to(list_courses))
            .route("/{slug}", web::get().to(get_course))
            .route("/{slug}/plans", web::get().to(get_course_plans)),
    );
}
