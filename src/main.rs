use actix_web::{App, HttpServer, middleware::Logger, web};
use anyhow::Context;
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use learnhub_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::{ObjectStorage, S3Storage},
    handlers,
    middlewares::{SessionMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    let config = Config::from_toml().context("failed to load configuration")?;
    for warning in config.insecure_defaults() {
        log::warn!("Insecure configuration: {warning}");
    }

    let pool = create_pool(&config.database)
        .await
        .context("failed to connect to the database")?;
    run_migrations(&pool)
        .await
        .context("failed to run database migrations")?;

    let jwt_service = JwtService::new(&config.session.secret, config.session.expires_in);
    let storage: Arc<dyn ObjectStorage> = Arc::new(S3Storage::new(&config.storage).await);

    let auth_service = AuthService::new(pool.clone(), jwt_service.clone());
    let course_service = CourseService::new(pool.clone());
    let coupon_service = CouponService::new(pool.clone());
    let user_service = UserService::new(pool.clone());
    let admin_service = AdminService::new(pool.clone());
    let storage_service = StorageService::new(storage, &config.storage);

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    let server_config = config.server.clone();
    let session_config = config.session.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(SessionMiddleware::new(
                jwt_service.clone(),
                session_config.cookie_name.clone(),
            ))
            .wrap(create_cors(&server_config.allowed_origins))
            .wrap(Logger::default())
            .app_data(web::Data::new(session_config.clone()))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(course_service.clone()))
            .app_data(web::Data::new(coupon_service.clone()))
            .app_data(web::Data::new(user_service.clone()))
            .app_data(web::Data::new(admin_service.clone()))
            .app_data(web::Data::new(storage_service.clone()))
            .configure(swagger_config)
            .configure(handlers::api_config)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await?;

    Ok(())
}
