use crate::handlers::current_user;
use crate::models::*;
use crate::services::{AuthService, UserService};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/user/enrollments/check",
    tag = "user",
    request_body = CheckEnrollmentRequest,
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Whether the caller holds an active enrollment", body = CheckEnrollmentResponse),
        (status = 400, description = "courseId missing", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse)
    )
)]
pub async fn check_enrollment(
    auth_service: web::Data<AuthService>,
    user_service: web::Data<UserService>,
    req: HttpRequest,
    request: web::Json<CheckEnrollmentRequest>,
) -> Result<HttpResponse> {
    let result = async {
        let user = current_user(&auth_service, &req).await?;
        user_service.is_enrolled(user.id, request.into_inner()).await
    }
    .await;

    match result {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/user/update",
    tag = "user",
    request_body = UpdateUserRequest,
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Profile updated", body = SuccessResponse),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse)
    )
)]
pub async fn update_profile(
    auth_service: web::Data<AuthService>,
    user_service: web::Data<UserService>,
    req: HttpRequest,
    request: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse> {
    let result = async {
        let user = current_user(&auth_service, &req).await?;
        user_service.update_profile(user, request.into_inner()).await
    }
    .await;

    match result {
        Ok(_) => Ok(HttpResponse::Ok().json(SuccessResponse::ok())),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn user_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/user")
            .route("/enrollments/check", web::post().to(check_enrollment))
            .route("/update", web::post().to(update_profile)),
    );
}
