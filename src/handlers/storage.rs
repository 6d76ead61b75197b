use crate::models::*;
use crate::services::StorageService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/s3/list",
    tag = "storage",
    params(
        ("prefix" = Option<String>, Query, description = "Only list keys under this prefix")
    ),
    responses(
        (status = 200, description = "Objects in the bucket", body = StorageListResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_objects(
    storage_service: web::Data<StorageService>,
    query: web::Query<StorageListQuery>,
) -> Result<HttpResponse> {
    match storage_service.list(query.into_inner().prefix).await {
        Ok(listing) => Ok(HttpResponse::Ok().json(listing)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/s3/presign",
    tag = "storage",
    params(
        ("key" = String, Query, description = "Object key to sign for playback")
    ),
    responses(
        (status = 200, description = "Signed playback URL", body = PresignResponse),
        (status = 400, description = "Missing key", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn presign(
    storage_service: web::Data<StorageService>,
    query: web::Query<PresignQuery>,
) -> Result<HttpResponse> {
    match storage_service.presign_playback(query.into_inner().key).await {
        Ok(signed) => Ok(HttpResponse::Ok().json(signed)),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/s3/upload",
    tag = "storage",
    request_body = UploadUrlRequest,
    responses(
        (status = 200, description = "Signed upload URL and the public URL of the object", body = UploadUrlResponse),
        (status = 400, description = "contentType or fileName missing", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn create_upload_url(
    storage_service: web::Data<StorageService>,
    request: web::Json<UploadUrlRequest>,
) -> Result<HttpResponse> {
    match storage_service.create_upload_url(request.into_inner()).await {
        Ok(upload) => Ok(HttpResponse::Ok().json(upload)),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn storage_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/s3")
            .route("/list", web::get().to(list_objects))
            .route("/presign", web::get().to(presign))
            .route("/upload", web::post().to(create_upload_url)),
    );
}
