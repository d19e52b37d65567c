use actix_cors::Cors;
use actix_files::Files;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use migration::{Migrator, MigratorTrait};
use std::path::Path;
use tracing_subscriber::EnvFilter;
use vinexpert_backend::auth::jwt::JwtKeys;
use vinexpert_backend::config::Config;
use vinexpert_backend::create_pool;
use vinexpert_backend::geolocation::GeoLocator;
use vinexpert_backend::handlers;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = Config::from_env().expect("Invalid configuration");

    let db = create_pool(&config)
        .await
        .expect("Failed to connect to the database");
    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .expect("Failed to run database migrations");
        tracing::info!("Database schema is up to date");
    }
    let db_data = web::Data::new(db);

    let jwt_keys = web::Data::new(JwtKeys::new(&config.jwt_secret, config.jwt_ttl));
    let geo_locator = web::Data::new(GeoLocator::new(&config.geolocation_url));

    let serve_static = Path::new(&config.static_dir).is_dir();
    if !serve_static {
        tracing::warn!("{} not found, static files are not served", config.static_dir);
    }

    let bind_addr = config.bind_addr();
    tracing::info!("Server running at http://{bind_addr}");

    let cors_origins = config.cors_origins.clone();
    let static_dir = config.static_dir.clone();

    HttpServer::new(move || {
        let cors = cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::AUTHORIZATION,
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .supports_credentials()
            .max_age(3600);

        let mut app = App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(db_data.clone())
            .app_data(jwt_keys.clone())
            .app_data(geo_locator.clone())
            .service(web::scope("/api").configure(handlers::init_routes));

        if serve_static {
            app = app.service(Files::new("/", &static_dir).index_file("index.html"));
        }
        app
    })
    .bind(&bind_addr)?
    .run()
    .await
}
