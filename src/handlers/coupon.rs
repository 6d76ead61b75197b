use crate::models::*;
use crate::services::CouponService;
use actix_web::{Error, HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/coupons/validate",
    tag = "coupon",
    request_body = ValidateCouponRequest,
    responses(
        (status = 200, description = "Validation outcome; rejection, including an unreadable body, is reported in the body", body = ValidateCouponResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    )
)]
pub async fn validate_coupon(
    coupon_service: web::Data<CouponService>,
    request: Result<web::Json<ValidateCouponRequest>, Error>,
) -> Result<HttpResponse> {
    let request = match request {
        Ok(request) => request.into_inner(),
        Err(e) => {
            log::debug!("Unreadable coupon validation body: {e}");
            return Ok(HttpResponse::Ok().json(ValidateCouponResponse::rejected("Invalid request body")));
        }
    };

    match coupon_service.validate_coupon(request).await {
        Ok(response) => Ok(HttpResponse::Ok().json(response)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn coupon_config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/coupons").route("/validate", web::post().to(validate_coupon)));
}
