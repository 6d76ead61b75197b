use crate::handlers::current_user;
use crate::models::*;
use crate::services::{AuthService, CourseService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/dashboard/courses",
    tag = "dashboard",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Courses with an active enrollment", body = [CourseWithEnrollment]),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Role may not use the dashboard", body = ErrorResponse)
    )
)]
pub async fn get_dashboard_courses(
    auth_service: web::Data<AuthService>,
    course_service: web::Data<CourseService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let result = async {
        let user = current_user(&auth_service, &req).await?;
        course_service.get_dashboard_courses(&user).await
    }
    .await;

    match result {
        Ok(courses) => Ok(HttpResponse::Ok().json(courses)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn dashboard_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/dashboard").route("/courses", web::get().to(get_dashboard_courses)));
}
