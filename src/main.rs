use bookstore::query::BatchLoader;
use bookstore::{build_server, create_pool, run_migrations, Config};
use dotenvy::dotenv;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let loader = BatchLoader::new(config.batch_fetch_size)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let pool = create_pool(&config.database_url, config.db_pool_size)
        .map_err(|e| io::Error::new(io::ErrorKind::ConnectionRefused, e))?;
    run_migrations(&pool).map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    log::info!(
        "Starting server at http://{} (batch fetch size {})",
        config.addr(),
        loader.batch_size()
    );

    build_server(pool, loader, &config.host, config.port)?.await
}
