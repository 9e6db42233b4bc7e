//! Postgres connection pool and `company_info` schema provisioning.

use std::str::FromStr;
use std::time::Duration;

use log::info;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;
use crate::error::{SupportError, SupportResult};

/// Connection options, preferring a full `url` over the discrete fields.
pub fn connect_options(config: &DatabaseConfig) -> SupportResult<PgConnectOptions> {
    match config.url.as_deref() {
        Some(url) => PgConnectOptions::from_str(url)
            .map_err(|e| SupportError::Config(format!("invalid database url: {}", e))),
        None => Ok(PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database)),
    }
}

/// Builds the process-wide pool. No connection is opened until first use.
pub fn create_pool(config: &DatabaseConfig) -> SupportResult<PgPool> {
    let options = connect_options(config)?;
    info!(
        "Database pool: {}:{}/{} (max {} connections)",
        options.get_host(),
        options.get_port(),
        options.get_database().unwrap_or_default(),
        config.max_connections
    );
    Ok(PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect_lazy_with(options))
}

/// Creates the `vector` extension, the `company_info` table and its cosine
/// index, then checks that the stored vector width matches `dimension`.
pub async fn ensure_schema(pool: &PgPool, dimension: usize) -> SupportResult<()> {
    sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
        .execute(pool)
        .await?;

    sqlx::query(&format!(
        "CREATE TABLE IF NOT EXISTS company_info (
            id BIGSERIAL PRIMARY KEY,
            title VARCHAR(255) NOT NULL,
            content TEXT NOT NULL,
            embedding vector({}),
            created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )",
        dimension
    ))
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS company_info_embedding_idx
            ON company_info USING hnsw (embedding vector_cosine_ops)",
    )
    .execute(pool)
    .await?;

    let declared = declared_dimension(pool).await?;
    if declared != Some(dimension) {
        return Err(SupportError::Config(format!(
            "company_info.embedding is declared as vector({}), configured dimension is {}",
            declared.map(|d| d.to_string()).unwrap_or_else(|| "?".to_string()),
            dimension
        )));
    }
    info!("Schema ready: company_info with vector({})", dimension);
    Ok(())
}

/// Width of the `embedding` column as declared in the catalog.
async fn declared_dimension(pool: &PgPool) -> SupportResult<Option<usize>> {
    let typmod: Option<i32> = sqlx::query_scalar(
        "SELECT atttypmod FROM pg_attribute
          WHERE attrelid = 'company_info'::regclass AND attname = 'embedding' AND NOT attisdropped",
    )
    .fetch_optional(pool)
    .await?;
    Ok(typmod.and_then(|m| usize::try_from(m).ok()))
}
