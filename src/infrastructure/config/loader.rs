use std::path::Path;

use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::errors::RagError;
use crate::domain::models::config::{Config, EmbeddingProviderKind};
use crate::infrastructure::logging::{parse_log_level, LogFormat, RotationPolicy};

/// Project config file, created by the user
pub const PROJECT_CONFIG: &str = ".mailrag/config.yaml";

/// Optional local overrides, not meant to be committed
pub const LOCAL_CONFIG: &str = ".mailrag/local.yaml";

/// Environment variable prefix; nested keys use `__`
pub const ENV_PREFIX: &str = "MAILRAG_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid chunking config: {0}")]
    InvalidChunking(String),

    #[error("Invalid top_k: {0}. Must be at least 1")]
    InvalidTopK(usize),

    #[error("Invalid embedding dimension: {0}. Must be at least 1")]
    InvalidDimension(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error("Invalid max_retries: {0}. Cannot be 0")]
    InvalidMaxRetries(u32),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Invalid call_timeout_secs: {0}. Must be at least 1")]
    InvalidCallTimeout(u64),

    #[error("{0} path cannot be empty")]
    EmptyPath(&'static str),
}

impl From<ConfigError> for RagError {
    fn from(err: ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `.mailrag/config.yaml`
    /// 3. `.mailrag/local.yaml`
    /// 4. Environment variables (`MAILRAG_*`, `__` separates nested keys)
    pub fn load() -> Result<Config, ConfigError> {
        Self::extract(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Yaml::file(PROJECT_CONFIG))
                .merge(Yaml::file(LOCAL_CONFIG))
                .merge(Env::prefixed(ENV_PREFIX).split("__")),
        )
    }

    /// Load defaults plus one specific file, ignoring project files and env
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ConfigError::Load(format!(
                "config file not found: {}",
                path.display()
            )));
        }

        Self::extract(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Yaml::file(path)),
        )
    }

    fn extract(figment: Figment) -> Result<Config, ConfigError> {
        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Load(e.to_string()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        config
            .chunking
            .validate()
            .map_err(ConfigError::InvalidChunking)?;

        if config.retrieval.top_k == 0 {
            return Err(ConfigError::InvalidTopK(config.retrieval.top_k));
        }

        if config.embedding.provider == EmbeddingProviderKind::Hashing
            && config.embedding.dimension == 0
        {
            return Err(ConfigError::InvalidDimension(config.embedding.dimension));
        }

        if config.corpus.path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath("Corpus"));
        }
        if config.history.transcript_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath("Transcript"));
        }
        if config.history.table_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyPath("Table"));
        }

        parse_log_level(&config.logging.level).map_err(ConfigError::InvalidLogLevel)?;
        config
            .logging
            .format
            .parse::<LogFormat>()
            .map_err(ConfigError::InvalidLogFormat)?;
        config
            .logging
            .rotation
            .parse::<RotationPolicy>()
            .map_err(ConfigError::InvalidLogRotation)?;

        if config.retry.max_retries == 0 {
            return Err(ConfigError::InvalidMaxRetries(config.retry.max_retries));
        }

        if config.retry.initial_backoff_ms >= config.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                config.retry.initial_backoff_ms,
                config.retry.max_backoff_ms,
            ));
        }

        if config.retry.call_timeout_secs == 0 {
            return Err(ConfigError::InvalidCallTimeout(
                config.retry.call_timeout_secs,
            ));
        }

        Ok(())
    }
}
