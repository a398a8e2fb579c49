use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local;
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use bingo_backend::{
    config::Config,
    database::{create_connection, run_migrations},
    external::GeneratorClient,
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
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

    let config = Config::from_toml().expect("Failed to load configuration file");

    let pool = create_connection(&config.database)
        .await
        .expect("Failed to create database connection pool");

    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let jwt_service = JwtService::new(&config.jwt.secret);

    let generator_client = GeneratorClient::new(config.generator.clone());

    // One broadcast bus shared by everything that publishes after commit.
    let publisher = NotificationPublisher::default();

    let event_service = EventService::new(pool.clone());
    let card_service = CardService::new(pool.clone(), generator_client);
    let draw_service = DrawService::new(pool.clone(), publisher.clone());
    let claim_service = ClaimService::new(pool.clone(), publisher.clone());

    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(event_service.clone()))
            .app_data(web::Data::new(card_service.clone()))
            .app_data(web::Data::new(draw_service.clone()))
            .app_data(web::Data::new(claim_service.clone()))
            .app_data(web::Data::new(publisher.clone()))
            .configure(swagger_config)
            .configure(handlers::health_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::event_config)
                    .configure(handlers::card_config)
                    .configure(handlers::draw_config)
                    .configure(handlers::claim_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
