use anyhow::{Context, Result};

use support_desk::config;
use support_desk::infrastructure::postgres;
use support_desk::initialization::initialize_services;
use support_desk::server;
use support_desk::SupportError;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();
    log::info!("support-desk starting");

    let config = config::load_config()?;
    log::debug!("Configuration loaded: {:?}", config.server);

    let pool = postgres::create_pool(&config.database).context("Failed to configure database pool")?;
    match postgres::ensure_schema(&pool, config.embedding.dimension).await {
        Ok(()) => {}
        Err(e @ SupportError::Config(_)) => {
            return Err(e).context("Database schema does not match the embedding configuration")
        }
        Err(e) => log::warn!(
            "Could not provision schema at start-up ({}); run init_db once the database is reachable",
            e
        ),
    }

    let state = initialize_services(&config, pool)?;
    server::serve(&config.server.bind_addr, state).await
}
