use config::{Config as ConfigLoader, ConfigError, File};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    pub mongodb: MongoDbConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub messaging: MessagingConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub mongodb_uri: String,
    #[serde(default)]
    pub jwt_secret: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Mongodb,
    Memory,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MongoDbConfig {
    pub database: String,
    pub pool_size: u32,
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub token_ttl_days: i64,
    pub bcrypt_cost: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            token_ttl_days: switchboard_auth::DEFAULT_TOKEN_TTL_DAYS,
            bcrypt_cost: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessagingConfig {
    /// A thread younger than this is reused for the same contact, agent and origin
    pub thread_window_hours: i64,
    pub canned_reply: String,
    /// Capacity of the in-process notification channel
    pub notification_buffer: usize,
}

impl Default for MessagingConfig {
    fn default() -> Self {
        Self {
            thread_window_hours: 24,
            canned_reply: switchboard_persist::conversation::DEFAULT_CANNED_REPLY.to_string(),
            notification_buffer: 256,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Environment variables that override individual TOML keys.
const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("SERVER_HOST", "server.host"),
    ("SERVER_PORT", "server.port"),
    ("SERVER_REQUEST_TIMEOUT_SECS", "server.request_timeout_secs"),
    ("STORAGE_BACKEND", "storage.backend"),
    ("MONGODB_DATABASE", "mongodb.database"),
    ("MONGODB_POOL_SIZE", "mongodb.pool_size"),
    ("MONGODB_TIMEOUT_MS", "mongodb.timeout_ms"),
    ("AUTH_TOKEN_TTL_DAYS", "auth.token_ttl_days"),
    ("AUTH_BCRYPT_COST", "auth.bcrypt_cost"),
    ("MESSAGING_THREAD_WINDOW_HOURS", "messaging.thread_window_hours"),
    ("MESSAGING_CANNED_REPLY", "messaging.canned_reply"),
    ("MESSAGING_NOTIFICATION_BUFFER", "messaging.notification_buffer"),
    ("LOG_LEVEL", "logging.level"),
    ("LOG_FORMAT", "logging.format"),
];

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set)
    /// 3. Environment variables (SERVER_, STORAGE_, MONGODB_, AUTH_, MESSAGING_, LOG_)
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let mut builder = ConfigLoader::builder()
            // 1. Load default config
            .add_source(File::with_name("config/default").required(false))
            // 2. Load environment-specific config
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        // 3. Environment variables override everything
        for (var, key) in ENV_OVERRIDES {
            builder = builder.set_override_option(*key, std::env::var(var).ok())?;
        }

        let mut cfg: Config = builder.build()?.try_deserialize()?;

        // Load secrets from ENV (not in TOML)
        cfg.jwt_secret = std::env::var("JWT_SECRET")
            .ok()
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| {
                ConfigError::Message("JWT_SECRET environment variable is required".to_string())
            })?;
        if cfg.storage.backend == StorageBackend::Mongodb {
            cfg.mongodb_uri = std::env::var("MONGODB_URI").map_err(|_| {
                ConfigError::Message("MONGODB_URI environment variable is required".to_string())
            })?;
        }

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }

    pub fn thread_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.messaging.thread_window_hours)
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.auth.token_ttl_days)
    }
}
