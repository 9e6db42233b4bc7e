use anyhow::{anyhow, Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// Default config file, overridable through `SUPPORT_DESK_CONFIG`.
pub const DEFAULT_CONFIG_PATH: &str = "support_desk.toml";
const CONFIG_PATH_ENV: &str = "SUPPORT_DESK_CONFIG";
const ENV_PREFIX: &str = "SUPPORT_DESK_";

pub const DEFAULT_EMBEDDING_DIMENSION: usize = 1536;

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ServerConfig {
    /// Socket address the HTTP API binds to.
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Postgres connection settings.
///
/// A full `url` (usually from `DATABASE_URL`) wins over the discrete fields.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            database: "vectordb".to_string(),
            max_connections: 10,
            acquire_timeout_secs: 30,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EmbeddingConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    /// Must match the `vector(N)` column of `company_info`.
    pub dimension: usize,
    pub timeout_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimension: DEFAULT_EMBEDDING_DIMENSION,
            timeout_secs: 30,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct WebSearchConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for WebSearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.tavily.com".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct AgentConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    /// Upper bound on model → tool → model round trips per chat turn.
    pub max_tool_rounds: usize,
    pub timeout_secs: u64,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            max_tokens: 1000,
            max_tool_rounds: 4,
            timeout_secs: 60,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub web_search: WebSearchConfig,
    #[serde(default)]
    pub agent: AgentConfig,
}

/// Loads configuration: defaults → TOML file → `SUPPORT_DESK_*` env vars →
/// the conventional `DATABASE_URL` / `OPENAI_API_KEY` / `TAVILY_API_KEY`.
pub fn load_config() -> Result<AppConfig> {
    let config_path_env = std::env::var(CONFIG_PATH_ENV).ok();
    let config_path = config_path_env
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

    if let Some(ref env_path) = config_path_env {
        if !std::path::Path::new(env_path).exists() {
            return Err(anyhow!(
                "Config file not found at {}: {}",
                CONFIG_PATH_ENV,
                env_path
            ));
        }
        log::info!("{} is set: {}", CONFIG_PATH_ENV, env_path);
    } else {
        log::debug!("{} not set, falling back to {}", CONFIG_PATH_ENV, config_path);
    }

    let figment = Figment::new()
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(&config_path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .merge(
            Env::raw()
                .only(&["DATABASE_URL"])
                .map(|_| "database.url".into()),
        )
        .merge(
            Env::raw()
                .only(&["OPENAI_API_KEY"])
                .map(|_| "embedding.api_key".into()),
        )
        .merge(
            Env::raw()
                .only(&["OPENAI_API_KEY"])
                .map(|_| "agent.api_key".into()),
        )
        .merge(
            Env::raw()
                .only(&["TAVILY_API_KEY"])
                .map(|_| "web_search.api_key".into()),
        );

    let config: AppConfig = figment
        .extract()
        .context("Failed to extract AppConfig")?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &AppConfig) -> Result<()> {
    if let Some(url) = &config.database.url {
        if url.trim().is_empty() {
            return Err(anyhow!("database.url cannot be empty when set"));
        }
    }
    if config.database.max_connections == 0 {
        return Err(anyhow!("database.max_connections must be greater than zero"));
    }
    if config.embedding.dimension == 0 {
        return Err(anyhow!("embedding.dimension must be greater than zero"));
    }
    if config.agent.max_tool_rounds == 0 {
        return Err(anyhow!("agent.max_tool_rounds must be greater than zero"));
    }
    if config.embedding.api_key.is_none() {
        log::warn!("No embedding API key configured; set OPENAI_API_KEY.");
    }
    if config.web_search.api_key.is_none() {
        log::warn!("No web-search API key configured; set TAVILY_API_KEY.");
    }
    Ok(())
}
