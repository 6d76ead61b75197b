use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{App, test, web};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::{Value, json};
use std::sync::Arc;

use learnhub_backend::config::{SessionConfig, StorageConfig};
use learnhub_backend::entities::{UserRole, coupons, course_plans, courses, enrollments, sessions, users};
use learnhub_backend::external::ObjectStorage;
use learnhub_backend::handlers;
use learnhub_backend::middlewares::SessionMiddleware;
use learnhub_backend::models::StorageObject;
use learnhub_backend::services::*;
use learnhub_backend::utils::JwtService;
use learnhub_backend::AppResult;

const SECRET: &str = "integration-secret";

struct FakeStorage;

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn list_objects(&self, _prefix: Option<String>) -> AppResult<Vec<StorageObject>> {
        Ok(vec![StorageObject {
            key: "uploads/intro.mp4".to_string(),
            size: 2048,
        }])
    }

    async fn presign_get(&self, key: &str, _expires_in: std::time::Duration) -> AppResult<String> {
        Ok(format!("https://signed.example.com/{key}"))
    }

    async fn presign_put(
        &self,
        key: &str,
        _content_type: &str,
        _expires_in: std::time::Duration,
    ) -> AppResult<String> {
        Ok(format!("https://signed.example.com/{key}?put"))
    }
}

fn storage_config() -> StorageConfig {
    StorageConfig {
        bucket: "media".to_string(),
        region: "us-east-1".to_string(),
        endpoint: None,
        access_key: "key".to_string(),
        secret_key: "secret".to_string(),
        public_base_url: "https://cdn.example.com".to_string(),
        force_path_style: false,
        playback_url_expires_in: 900,
        upload_url_expires_in: 3600,
    }
}

fn session_config() -> SessionConfig {
    SessionConfig {
        secret: SECRET.to_string(),
        expires_in: 3600,
        cookie_name: "session_token".to_string(),
    }
}

fn jwt() -> JwtService {
    JwtService::new(SECRET, 3600)
}

macro_rules! test_app {
    ($db:expr) => {{
        let db = Arc::new($db);
        let jwt = jwt();
        let storage: Arc<dyn ObjectStorage> = Arc::new(FakeStorage);
        test::init_service(
            App::new()
                .wrap(SessionMiddleware::new(jwt.clone(), "session_token"))
                .app_data(web::Data::new(session_config()))
                .app_data(web::Data::new(AuthService::new(Arc::clone(&db), jwt)))
                .app_data(web::Data::new(CourseService::new(Arc::clone(&db))))
                .app_data(web::Data::new(CouponService::new(Arc::clone(&db))))
                .app_data(web::Data::new(UserService::new(Arc::clone(&db))))
                .app_data(web::Data::new(AdminService::new(Arc::clone(&db))))
                .app_data(web::Data::new(StorageService::new(storage, &storage_config())))
                .configure(handlers::api_config),
        )
        .await
    }};
}

/// Status of a request whether the route or the session middleware answered.
macro_rules! status_of {
    ($app:expr, $req:expr) => {
        match test::try_call_service($app, $req.to_request()).await {
            Ok(res) => res.status(),
            Err(err) => err.error_response().status(),
        }
    };
}

fn user(id: i64, role: UserRole) -> users::Model {
    users::Model {
        id,
        name: Some("Meera".to_string()),
        email: Some(format!("user{id}@example.com")),
        phone_number: None,
        image: None,
        role,
        created_at: None,
        updated_at: None,
    }
}

fn session_row(user_id: i64) -> sessions::Model {
    sessions::Model {
        session_token: format!("sess-{user_id}"),
        user_id,
        expires: Utc::now() + Duration::hours(1),
        created_at: None,
    }
}

fn session_cookie(user_id: i64) -> Cookie<'static> {
    let token = jwt()
        .generate_session_token(user_id, &format!("sess-{user_id}"), Utc::now() + Duration::hours(1))
        .unwrap();
    Cookie::new("session_token", token)
}

fn course(id: i64, slug: &str) -> courses::Model {
    courses::Model {
        id,
        slug: slug.to_string(),
        title: format!("Course {id}"),
        description: None,
        thumbnail_url: None,
        created_at: None,
    }
}

fn active_enrollment(user_id: i64, course_id: i64) -> enrollments::Model {
    enrollments::Model {
        id: course_id,
        user_id,
        course_id,
        plan: "premium".to_string(),
        end_date: None,
        is_active: true,
        created_at: None,
    }
}

/// Session lookup, user lookup, then the dashboard queries.
fn dashboard_db(role: UserRole) -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![session_row(5)]])
        .append_query_results([vec![user(5, role)]])
        .append_query_results([vec![active_enrollment(5, 1)]])
        .append_query_results([vec![course(1, "rust-basics")]])
        .into_connection()
}

#[actix_web::test]
async fn courses_require_a_session() {
    let app = test_app!(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let status = status_of!(&app, test::TestRequest::get().uri("/api/courses"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let forged = test::TestRequest::get()
        .uri("/api/courses")
        .cookie(Cookie::new("session_token", "not-a-jwt"));
    assert_eq!(status_of!(&app, forged), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn course_plans_are_public() {
    let plan = course_plans::Model {
        id: 3,
        course_id: 1,
        plan_type: "premium".to_string(),
        price: 49900,
        is_active: true,
        created_at: None,
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![course(1, "rust-basics")]])
        .append_query_results([vec![plan]])
        .into_connection();
    let app = test_app!(db);

    let req = test::TestRequest::get()
        .uri("/api/courses/rust-basics/plans")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["plans"][0]["id"], 3);
    assert_eq!(body["plans"][0]["price"], 49900);
}

#[actix_web::test]
async fn coupon_validation_speaks_camel_case() {
    let coupon = coupons::Model {
        id: 1,
        code: "SAVE10".to_string(),
        plan_id: Some(3),
        discount_amount: 1000,
        is_active: true,
        created_at: None,
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![coupon]])
        .into_connection();
    let app = test_app!(db);

    let req = test::TestRequest::post()
        .uri("/api/coupons/validate")
        .set_json(json!({"code": "save10", "planId": 3}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        body,
        json!({"valid": true, "discountAmount": 1000, "code": "SAVE10", "planId": 3})
    );
}

#[actix_web::test]
async fn unreadable_coupon_body_is_an_invalid_coupon() {
    let app = test_app!(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let bodies = [
        (ContentType::json(), "not json"),
        (ContentType::json(), r#"{"code":5}"#),
        (ContentType::plaintext(), r#"{"code":"SAVE10"}"#),
    ];
    for (content_type, payload) in bodies {
        let req = test::TestRequest::post()
            .uri("/api/coupons/validate")
            .insert_header(content_type)
            .set_payload(payload)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK, "payload {payload}");

        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["valid"], false);
        assert_eq!(body["message"], "Invalid request body");
    }
}

#[actix_web::test]
async fn malformed_json_gets_the_uniform_error_body() {
    let app = test_app!(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let req = test::TestRequest::post()
        .uri("/api/s3/upload")
        .insert_header(ContentType::json())
        .set_payload("{\"contentType\":")
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn dashboard_is_closed_to_plain_users() {
    let app = test_app!(dashboard_db(UserRole::User));

    let req = test::TestRequest::get()
        .uri("/api/dashboard/courses")
        .cookie(session_cookie(5));
    assert_eq!(status_of!(&app, req), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn dashboard_serves_interns_and_admins() {
    for role in [UserRole::Intern, UserRole::Admin] {
        let app = test_app!(dashboard_db(role));

        let req = test::TestRequest::get()
            .uri("/api/dashboard/courses")
            .cookie(session_cookie(5))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body[0]["course"]["slug"], "rust-basics");
        assert_eq!(body[0]["hasAccess"], true);
    }
}

#[actix_web::test]
async fn bearer_token_is_accepted() {
    let app = test_app!(dashboard_db(UserRole::Intern));
    let token = session_cookie(5).value().to_string();

    let req = test::TestRequest::get()
        .uri("/api/dashboard/courses")
        .insert_header(("Authorization", format!("Bearer {token}")));
    assert_eq!(status_of!(&app, req), StatusCode::OK);
}

#[actix_web::test]
async fn admin_routes_reject_interns() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![session_row(5)]])
        .append_query_results([vec![user(5, UserRole::Intern)]])
        .into_connection();
    let app = test_app!(db);

    let req = test::TestRequest::delete()
        .uri("/api/admin/users/9")
        .cookie(session_cookie(5));
    assert_eq!(status_of!(&app, req), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn presign_requires_a_key() {
    let app = test_app!(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let req = test::TestRequest::get().uri("/api/s3/presign");
    assert_eq!(status_of!(&app, req), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get()
        .uri("/api/s3/presign?key=uploads/intro.mp4")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["key"], "uploads/intro.mp4");
    assert_eq!(body["url"], "https://signed.example.com/uploads/intro.mp4");
}

#[actix_web::test]
async fn upload_returns_public_url_for_generated_key() {
    let app = test_app!(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let req = test::TestRequest::post()
        .uri("/api/s3/upload")
        .set_json(json!({"contentType": "video/mp4", "fileName": "Intro Video.mp4"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let key = body["key"].as_str().unwrap();
    assert!(key.starts_with("uploads/"));
    assert!(key.ends_with("-IntroVideo.mp4"));
    assert_eq!(body["publicUrl"], format!("https://cdn.example.com/{key}"));

    let missing = test::TestRequest::post()
        .uri("/api/s3/upload")
        .set_json(json!({"contentType": "video/mp4"}));
    assert_eq!(status_of!(&app, missing), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn storage_listing_is_public() {
    let app = test_app!(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

    let req = test::TestRequest::get().uri("/api/s3/list?prefix=uploads/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body, json!({"items": [{"key": "uploads/intro.mp4", "size": 2048}]}));
}
