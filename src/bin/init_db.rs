//! Provisions the pgvector extension and the `company_info` table, then exits.

use anyhow::{Context, Result};

use support_desk::config;
use support_desk::infrastructure::postgres;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let config = config::load_config()?;
    let pool = postgres::create_pool(&config.database).context("Failed to configure database pool")?;

    let result = postgres::ensure_schema(&pool, config.embedding.dimension)
        .await
        .context("Failed to provision company_info schema");
    pool.close().await;
    result?;

    log::info!("Database initialized");
    Ok(())
}
