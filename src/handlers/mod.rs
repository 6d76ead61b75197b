pub mod admin;
pub mod auth;
pub mod coupon;
pub mod course;
pub mod dashboard;
pub mod storage;
pub mod user;

pub use admin::admin_config;
pub use auth::auth_config;
pub use coupon::coupon_config;
pub use course::course_config;
pub use dashboard::dashboard_config;
pub use storage::storage_config;
pub use user::user_config;

use crate::entities::user_entity as users;
use crate::error::{AppError, AppResult};
use crate::middlewares::session_claims;
use crate::services::{AuthService, ensure_admin};
use actix_web::{HttpRequest, web};

/// Load the signed-in user behind the claims the session middleware stored.
pub(crate) async fn current_user(
    auth_service: &AuthService,
    req: &HttpRequest,
) -> AppResult<users::Model> {
    let claims =
        session_claims(req).ok_or_else(|| AppError::AuthError("Missing session".to_string()))?;
    auth_service.resolve_user(&claims).await
}

pub(crate) async fn current_admin(
    auth_service: &AuthService,
    req: &HttpRequest,
) -> AppResult<users::Model> {
    let user = current_user(auth_service, req).await?;
    ensure_admin(&user)?;
    Ok(user)
}

/// Unreadable JSON bodies answer with the same error body as every other failure.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid request body: {err}")).into()
    })
}

/// Every JSON route, mounted under `/api`.
pub fn api_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(json_config())
            .configure(auth_config)
            .configure(course_config)
            .configure(dashboard_config)
            .configure(coupon_config)
            .configure(user_config)
            .configure(admin_config)
            .configure(storage_config),
    );
}
