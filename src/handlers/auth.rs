use crate::config::SessionConfig;
use crate::error::AppError;
use crate::handlers::current_user;
use crate::middlewares::session_claims;
use crate::models::*;
use crate::services::AuthService;
use actix_web::cookie::Cookie;
use actix_web::{HttpRequest, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/auth/session",
    tag = "auth",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Signed-in user", body = SessionResponse),
        (status = 401, description = "No valid session", body = ErrorResponse)
    )
)]
pub async fn get_session(
    auth_service: web::Data<AuthService>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    match current_user(&auth_service, &req).await {
        Ok(user) => Ok(HttpResponse::Ok().json(SessionResponse { user: user.into() })),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    security(
        ("session_cookie" = []),
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Session revoked and cookie cleared", body = SuccessResponse),
        (status = 401, description = "No valid session", body = ErrorResponse)
    )
)]
pub async fn logout(
    auth_service: web::Data<AuthService>,
    session_config: web::Data<SessionConfig>,
    req: HttpRequest,
) -> Result<HttpResponse> {
    let result = async {
        let claims = session_claims(&req)
            .ok_or_else(|| AppError::AuthError("Missing session".to_string()))?;
        let user = auth_service.resolve_user(&claims).await?;
        auth_service.revoke_session(&claims).await?;
        log::info!("User {} signed out", user.id);
        Ok::<_, AppError>(())
    }
    .await;

    match result {
        Ok(()) => {
            let mut cookie = Cookie::build(session_config.cookie_name.clone(), "")
                .path("/")
                .http_only(true)
                .finish();
            cookie.make_removal();
            Ok(HttpResponse::Ok().cookie(cookie).json(SuccessResponse::ok()))
        }
        Err(e) => Ok(e.error_response()),
    }
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/session", web::get().to(get_session))
            .route("/logout", web::post().to(logout)),
    );
}
