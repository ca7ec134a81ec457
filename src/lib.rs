pub mod application;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod query;
pub mod schema;

use actix_web::{error, middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use config::Config;
pub use db::{create_pool, DbPool};

use crate::domain::errors::DomainError;
use crate::errors::AppError;
use crate::handlers::{categories, items, members, orders, ApiDoc};
use crate::query::BatchLoader;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), DomainError> {
    let mut conn = pool.get()?;
    conn.run_pending_migrations(MIGRATIONS)
        .map_err(|e| DomainError::Internal(format!("migrations failed: {e}")))?;
    Ok(())
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    loader: BatchLoader,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(loader))
            .app_data(web::QueryConfig::default().error_handler(|err, _| {
                error::Error::from(AppError::BadRequest(err.to_string()))
            }))
            .app_data(web::JsonConfig::default().error_handler(|err, _| {
                error::Error::from(AppError::BadRequest(err.to_string()))
            }))
            .wrap(Logger::default())
            .service(
                web::scope("/orders")
                    .route("", web::get().to(orders::list_orders))
                    .route("", web::post().to(orders::create_order))
                    .route("/{id}/cancel", web::post().to(orders::cancel_order)),
            )
            .route("/simple-orders", web::get().to(orders::list_simple_orders))
            .service(
                web::scope("/members")
                    .route("", web::get().to(members::list_members))
                    .route("", web::post().to(members::create_member)),
            )
            .service(
                web::scope("/items")
                    .route("", web::get().to(items::list_items))
                    .route("", web::post().to(items::create_item))
                    .route("/{id}", web::get().to(items::get_item))
                    .route("/{id}", web::put().to(items::update_item)),
            )
            .service(
                web::scope("/categories")
                    .route("", web::post().to(categories::create_category))
                    .route("/{id}/children", web::get().to(categories::list_children))
                    .route(
                        "/{id}/items/{item_id}",
                        web::post().to(categories::add_item),
                    ),
            )
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
