use crate::handlers::current_admin;
use crate::models::*;
use crate::services::{AdminService, AuthService, CouponService, UserService};
use crate::utils::{PaginatedUsers, PaginationParams};
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/admin/plans",
    tag = "admin",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "All plans with course titles", body = [AdminPlanResponse]),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    )
)]
pub async fn list_plans(
    auth_service: web::Data<AuthService>,
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let result = async {
        current_admin(&auth_service, &req).await?;
        admin_service.list_plans().await
    }
    .await;

    match result {
        Ok(plans) => Ok(HttpResponse::Ok().json(plans)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/internships",
    tag = "admin",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Registrations, newest first", body = [InternshipRegistrationResponse]),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    )
)]
pub async fn list_internships(
    auth_service: web::Data<AuthService>,
    admin_service: web::Data<AdminService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let result = async {
        current_admin(&auth_service, &req).await?;
        admin_service.list_internships().await
    }
    .await;

    match result {
        Ok(registrations) => Ok(HttpResponse::Ok().json(registrations)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/users",
    tag = "admin",
    params(PaginationParams),
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "One page of users", body = PaginatedUsers),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    )
)]
pub async fn list_users(
    auth_service: web::Data<AuthService>,
    user_service: web::Data<UserService>,
    req: HttpRequest,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse> {
    let result = async {
        current_admin(&auth_service, &req).await?;
        user_service.list_users(&query).await
    }
    .await;

    match result {
        Ok(page) => Ok(HttpResponse::Ok().json(page)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/users/{user_id}",
    tag = "admin",
    params(
        ("user_id" = i64, Path, description = "User to delete")
    ),
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "User and dependent rows deleted", body = SuccessResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    auth_service: web::Data<AuthService>,
    user_service: web::Data<UserService>,
    req: HttpRequest,
    user_id: web::Path<i64>,
) -> Result<HttpResponse> {
    let user_id = user_id.into_inner();
    let result = async {
        let admin = current_admin(&auth_service, &req).await?;
        log::info!("Admin {} deleting user {user_id}", admin.id);
        user_service.delete_user(user_id).await
    }
    .await;

    match result {
        Ok(()) => Ok(HttpResponse::Ok().json(SuccessResponse::with_message(
            "User and related data deleted",
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/coupons",
    tag = "admin",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "All coupons, newest first", body = [CouponResponse]),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    )
)]
pub async fn list_coupons(
    auth_service: web::Data<AuthService>,
    coupon_service: web::Data<CouponService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let result = async {
        current_admin(&auth_service, &req).await?;
        coupon_service.list_coupons().await
    }
    .await;

    match result {
        Ok(coupons) => Ok(HttpResponse::Ok().json(coupons)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/coupons",
    tag = "admin",
    request_body = CreateCouponRequest,
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Coupon created", body = CouponResponse),
        (status = 400, description = "Invalid or duplicate coupon", body = ErrorResponse),
        (status = 401, description = "No valid session", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse)
    )
)]
pub async fn create_coupon(
    auth_service: web::Data<AuthService>,
    coupon_service: web::Data<CouponService>,
    req: HttpRequest,
    request: web::Json<CreateCouponRequest>,
) -> Result<HttpResponse> {
    let result = async {
        current_admin(&auth_service, &req).await?;
        coupon_service.create_coupon(request.into_inner()).await
    }
    .await;

    match result {
        Ok(coupon) => Ok(HttpResponse::Created().json(coupon)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/plans", web::get().to(list_plans))
            .route("/internships", web::get().to(list_internships))
            .route("/users", web::get().to(list_users))
            .route("/users/{user_id}", web::delete().to(delete_user))
            .route("/coupons", web::get().to(list_coupons))
            .route("/coupons", web::post().to(create_coupon)),
    );
}
