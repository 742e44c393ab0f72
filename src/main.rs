use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use sea_orm::{EntityTrait, PaginatorTrait};
use std::io::Write; // for env_logger custom formatter
use std::sync::Arc;

use diner_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    entities::order_entity,
    error::expose_internal_details,
    external::{EmailService, GoogleOAuthService, StripeService},
    extractor_config,
    middlewares::create_cors,
    routes,
    services::*,
    swagger::swagger_config,
    utils::{BusinessHours, Clock, JwtService, OrderNumberGenerator, SystemClock},
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
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

    let config = Config::from_toml().expect("Failed to load configuration");
    expose_internal_details(config.server.is_development());

    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let existing_orders = match order_entity::Entity::find().count(&pool).await {
        Ok(count) => count,
        Err(e) => {
            log::warn!("Could not count orders, order sequence starts at zero: {e}");
            0
        }
    };
    let order_numbers = Arc::new(OrderNumberGenerator::starting_after(existing_orders));

    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.expires_in);
    let hours = BusinessHours::from(&config.hours);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let stripe_service = Arc::new(StripeService::new(config.stripe.clone()));
    let email_service = Arc::new(EmailService::new(config.email.clone()));
    let google_service = Arc::new(GoogleOAuthService::new(config.google.clone()));

    let auth_service = AuthService::new(
        pool.clone(),
        jwt_service,
        email_service,
        google_service,
        config.email.frontend_url.clone(),
    );
    if let Err(e) = auth_service.ensure_admin(&config.admin).await {
        log::error!("Admin bootstrap failed: {e}");
    }

    let menu_service = MenuService::new(pool.clone(), hours, clock.clone());
    let order_service = OrderService::new(
        pool.clone(),
        stripe_service,
        hours,
        clock.clone(),
        order_numbers,
    );
    let admin_service = AdminService::new(pool.clone(), hours, clock);

    log::info!(
        "Starting HTTP server at {}:{} ({})",
        config.server.host,
        config.server.port,
        config.server.environment
    );

    let cors_origin = config.server.cors_origin.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors(&cors_origin))
            .app_data(web::Data::new(auth_service.clone()))
            .app_data(web::Data::new(menu_service.clone()))
            .app_data(web::Data::new(order_service.clone()))
            .app_data(web::Data::new(admin_service.clone()))
            .configure(extractor_config)
            .configure(swagger_config)
            .configure(routes)
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
