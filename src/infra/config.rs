//! Centralized configuration (environment variables + defaults).

use anyhow::Context;
use std::time::Duration;

pub const DEFAULT_LLM_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
pub const DEFAULT_LLM_MODEL: &str = "mixtral-8x7b-32768";

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::fmt::Display,
{
    match env_non_empty(name) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value '{}': {}", name, raw, e)),
        None => Ok(default),
    }
}

/// Database URL must be provided (no default) for safety.
pub fn database_url() -> anyhow::Result<String> {
    env_non_empty("DATABASE_URL").context("DATABASE_URL must be set")
}

/// Shared secret callers send in the `X-API-Key` header (required).
pub fn service_api_key() -> anyhow::Result<String> {
    env_non_empty("API_KEY")
        .or_else(|| env_non_empty("VANNA_API_KEY"))
        .context("API_KEY must be set")
}

/// Bearer token for the completion endpoint. `None` puts generation in fallback mode.
pub fn llm_api_key() -> Option<String> {
    env_non_empty("LLM_API_KEY").or_else(|| env_non_empty("GROQ_API_KEY"))
}

pub fn llm_api_url() -> String {
    env_non_empty("LLM_API_URL").unwrap_or_else(|| DEFAULT_LLM_API_URL.to_string())
}

pub fn llm_model() -> String {
    env_non_empty("LLM_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string())
}

pub fn llm_timeout() -> anyhow::Result<Duration> {
    Ok(Duration::from_secs(env_parsed("LLM_TIMEOUT_SECS", 30u64)?))
}

/// Catalog namespace the introspector reads (typically `public`).
pub fn schema_namespace() -> String {
    env_non_empty("SCHEMA_NAMESPACE").unwrap_or_else(|| "public".to_string())
}

pub fn bind_addr() -> String {
    env_non_empty("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:8000".to_string())
}

/// Connection pool sizing and session settings.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub min_connections: u32,
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// `statement_timeout` applied to every pooled session; zero disables it.
    pub statement_timeout_ms: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            min_connections: 2,
            max_connections: 10,
            acquire_timeout: Duration::from_secs(30),
            statement_timeout_ms: 30_000,
        }
    }
}

impl PoolSettings {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let min_connections = env_parsed("DB_MIN_CONNECTIONS", defaults.min_connections)?;
        let max_connections = env_parsed("DB_MAX_CONNECTIONS", defaults.max_connections)?.max(1);
        Ok(Self {
            min_connections: min_connections.min(max_connections),
            max_connections,
            acquire_timeout: Duration::from_secs(env_parsed(
                "DB_ACQUIRE_TIMEOUT_SECS",
                defaults.acquire_timeout.as_secs(),
            )?),
            statement_timeout_ms: env_parsed("STATEMENT_TIMEOUT_MS", defaults.statement_timeout_ms)?,
        })
    }
}

/// Outbound completion endpoint settings.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl LlmSettings {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            api_key: llm_api_key(),
            api_url: llm_api_url(),
            model: llm_model(),
            timeout: llm_timeout()?,
        })
    }

    /// Settings with no credential: every generation degrades to the fallback statement.
    pub fn unconfigured() -> Self {
        Self {
            api_key: None,
            api_url: DEFAULT_LLM_API_URL.to_string(),
            model: DEFAULT_LLM_MODEL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Everything the api server needs, read once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub service_api_key: String,
    pub schema_namespace: String,
    pub bind_addr: String,
    pub pool: PoolSettings,
    pub llm: LlmSettings,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Ok(Self {
            database_url: database_url()?,
            service_api_key: service_api_key()?,
            schema_namespace: schema_namespace(),
            bind_addr: bind_addr(),
            pool: PoolSettings::from_env()?,
            llm: LlmSettings::from_env()?,
        })
    }
}
