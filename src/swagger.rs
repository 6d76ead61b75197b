use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{ApiKey, ApiKeyValue, Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::UserRole;
use crate::handlers;
use crate::models::*;
use crate::utils::{PaginatedUsers, PaginationInfo};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let Some(components) = openapi.components.as_mut() else {
            return;
        };
        components.add_security_scheme(
            "session_cookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new("session_token"))),
        );
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::get_session,
        handlers::auth::logout,
        handlers::course::list_courses,
        handlers::course::get_course,
        handlers::course::get_course_plans,
        handlers::dashboard::get_dashboard_courses,
        handlers::coupon::validate_coupon,
        handlers::user::check_enrollment,
        handlers::user::update_profile,
        handlers::admin::list_plans,
        handlers::admin::list_internships,
        handlers::admin::list_users,
        handlers::admin::delete_user,
        handlers::admin::list_coupons,
        handlers::admin::create_coupon,
        handlers::storage::list_objects,
        handlers::storage::presign,
        handlers::storage::create_upload_url,
    ),
    components(
        schemas(
            UserRole,
            UserResponse,
            SessionResponse,
            UpdateUserRequest,
            CourseResponse,
            EnrollmentResponse,
            CourseWithEnrollment,
            ContentResponse,
            ModuleResponse,
            CourseDetailResponse,
            PlanResponse,
            CoursePlansResponse,
            ValidateCouponRequest,
            ValidateCouponResponse,
            CreateCouponRequest,
            CouponResponse,
            CheckEnrollmentRequest,
            CheckEnrollmentResponse,
            AdminPlanResponse,
            InternshipRegistrationResponse,
            PaginationInfo,
            PaginatedUsers,
            StorageObject,
            StorageListResponse,
            PresignResponse,
            UploadUrlRequest,
            UploadUrlResponse,
            SuccessResponse,
            ErrorResponse,
            ApiError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Session API"),
        (name = "course", description = "Course catalog API"),
        (name = "dashboard", description = "Intern and admin dashboard API"),
        (name = "coupon", description = "Coupon API"),
        (name = "user", description = "Account API"),
        (name = "admin", description = "Administration API"),
        (name = "storage", description = "Video asset storage API"),
    ),
    info(
        title = "LearnHub Backend API",
        version = "1.0.0",
        description = "LearnHub e-learning platform REST API documentation"
    ),
    servers(
        (url = "/api", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
