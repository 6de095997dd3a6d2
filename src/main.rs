extern crate actix_web;
extern crate chrono;
extern crate dotenv;
extern crate env_logger;
extern crate serde;
extern crate serde_json;
extern crate sqlx;
extern crate thiserror;
extern crate tokio;

mod config;
mod context;
mod core;
mod database;
mod error;
mod handlers;
pub mod response;

use actix_web::web::{to, Data};
use actix_web::HttpServer;
use config::Config;
use database::sqlx::PgSqlxManager;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let config = Config::from_env()?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(format!("{},actix_web=info", config.log_level))).init();

    let manager = PgSqlxManager::connect(&config.database_url, config.max_connections, config.acquire_timeout).await?;
    if config.run_migrations {
        manager.migrate().await?;
        log::info!("database migrations applied");
    }

    log::info!("listening on {}:{}", config.host, config.port);
    HttpServer::new(move || {
        actix_web::App::new()
            .wrap(actix_web::middleware::Logger::default())
            .app_data(Data::new(manager.clone()))
            .configure(handlers::routes::<PgSqlxManager>)
            .default_service(to(handlers::not_found))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;
    Ok(())
}
