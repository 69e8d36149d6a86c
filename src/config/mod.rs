use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub search: SearchConfig,
    pub storage: StorageConfig,
    pub routing: RoutingConfig,
    pub session: SessionConfig,
    pub security: SecurityConfig,
    pub daily: DailyConfig,
    pub port: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub max_query_length: usize,
    pub debug_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_path: PathBuf,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub persist_memory_store: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// First host label that selects editor mode (`editor` for `editor.duech.cl`).
    pub editor_host_label: String,
    pub editor_path_prefix_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(skip_serializing)]
    pub secret: String,
    pub expiry_hours: u64,
    pub cookie_name: String,
    /// bcrypt work factor
    pub password_cost: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
    pub require_https: bool,
    pub enable_audit_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyConfig {
    /// Offset from UTC used to decide which calendar day "today" is.
    pub utc_offset_hours: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("SESSION_SECRET must be set in {0:?} mode")]
    MissingSessionSecret(Environment),

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

const DEVELOPMENT_SECRET: &str = "duech-development-secret";

// Blank variables count as unset so a preset value survives `FOO=` in a .env file
fn first_non_empty(values: impl IntoIterator<Item = Option<String>>) -> Option<String> {
    values.into_iter().flatten().find(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Search overrides
        if let Ok(v) = env::var("SEARCH_DEFAULT_PAGE_SIZE") {
            self.search.default_page_size = v.parse().unwrap_or(self.search.default_page_size);
        }
        if let Ok(v) = env::var("SEARCH_MAX_PAGE_SIZE") {
            self.search.max_page_size = v.parse().unwrap_or(self.search.max_page_size);
        }
        if let Ok(v) = env::var("SEARCH_DEBUG_LOGGING") {
            self.search.debug_logging = v.parse().unwrap_or(self.search.debug_logging);
        }

        // Storage overrides
        if let Ok(v) = env::var("DUECH_DATA_PATH") {
            self.storage.data_path = PathBuf::from(v);
        }
        if let Ok(v) = env::var("DATABASE_URL") {
            if !v.trim().is_empty() {
                self.storage.database_url = Some(v);
            }
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.storage.max_connections = v.parse().unwrap_or(self.storage.max_connections);
        }
        if let Ok(v) = env::var("DUECH_PERSIST_MEMORY_STORE") {
            self.storage.persist_memory_store = v.parse().unwrap_or(self.storage.persist_memory_store);
        }

        // Routing overrides
        if let Ok(v) = env::var("EDITOR_HOST_LABEL") {
            self.routing.editor_host_label = v.trim().to_ascii_lowercase();
        }
        if let Ok(v) = env::var("EDITOR_PATH_PREFIX_ENABLED") {
            self.routing.editor_path_prefix_enabled = v.parse().unwrap_or(self.routing.editor_path_prefix_enabled);
        }

        // Session overrides
        if let Some(v) = first_non_empty([env::var("SESSION_SECRET").ok(), env::var("JWT_SECRET").ok()]) {
            self.session.secret = v;
        }
        if let Ok(v) = env::var("PASSWORD_HASH_COST") {
            self.session.password_cost = v.parse().unwrap_or(self.session.password_cost);
        }
        if let Ok(v) = env::var("SESSION_EXPIRY_HOURS") {
            self.session.expiry_hours = v.parse().unwrap_or(self.session.expiry_hours);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = v.parse().unwrap_or(self.security.enable_cors);
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect();
        }
        if let Ok(v) = env::var("SECURITY_REQUIRE_HTTPS") {
            self.security.require_https = v.parse().unwrap_or(self.security.require_https);
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_AUDIT_LOGGING") {
            self.security.enable_audit_logging = v.parse().unwrap_or(self.security.enable_audit_logging);
        }

        if let Ok(v) = env::var("DAILY_UTC_OFFSET_HOURS") {
            self.daily.utc_offset_hours = v.parse().unwrap_or(self.daily.utc_offset_hours);
        }

        if let Some(port) = env::var("DUECH_API_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.port = port;
        }

        self
    }

    /// Checks the settings that must hold before the server accepts traffic.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.session.secret.trim().is_empty() {
            return Err(ConfigError::MissingSessionSecret(self.environment));
        }
        if self.search.default_page_size == 0 || self.search.default_page_size > self.search.max_page_size {
            return Err(ConfigError::InvalidValue {
                name: "SEARCH_DEFAULT_PAGE_SIZE",
                value: self.search.default_page_size.to_string(),
            });
        }
        if !(4..=31).contains(&self.session.password_cost) {
            return Err(ConfigError::InvalidValue {
                name: "PASSWORD_HASH_COST",
                value: self.session.password_cost.to_string(),
            });
        }
        if !(-12..=14).contains(&self.daily.utc_offset_hours) {
            return Err(ConfigError::InvalidValue {
                name: "DAILY_UTC_OFFSET_HOURS",
                value: self.daily.utc_offset_hours.to_string(),
            });
        }
        Ok(())
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            search: SearchConfig {
                default_page_size: 25,
                max_page_size: 100,
                max_query_length: 100,
                debug_logging: true,
            },
            storage: StorageConfig {
                data_path: PathBuf::from("data/words.json"),
                database_url: None,
                max_connections: 5,
                persist_memory_store: true,
            },
            routing: RoutingConfig {
                editor_host_label: "editor".to_string(),
                editor_path_prefix_enabled: true,
            },
            session: SessionConfig {
                secret: DEVELOPMENT_SECRET.to_string(),
                expiry_hours: 24 * 7, // 1 week
                cookie_name: "duech_session".to_string(),
                password_cost: 10,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
                require_https: false,
                enable_audit_logging: false,
            },
            daily: DailyConfig { utc_offset_hours: -4 },
            port: 3000,
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            search: SearchConfig {
                default_page_size: 25,
                max_page_size: 100,
                max_query_length: 100,
                debug_logging: false,
            },
            storage: StorageConfig {
                data_path: PathBuf::from("data/words.json"),
                database_url: None,
                max_connections: 10,
                persist_memory_store: true,
            },
            routing: RoutingConfig {
                editor_host_label: "editor".to_string(),
                editor_path_prefix_enabled: true,
            },
            session: SessionConfig {
                secret: String::new(),
                expiry_hours: 24,
                cookie_name: "duech_session".to_string(),
                password_cost: bcrypt::DEFAULT_COST,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://staging.duech.cl".to_string()],
                require_https: true,
                enable_audit_logging: true,
            },
            daily: DailyConfig { utc_offset_hours: -4 },
            port: 3000,
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            search: SearchConfig {
                default_page_size: 25,
                max_page_size: 100,
                max_query_length: 100,
                debug_logging: false,
            },
            storage: StorageConfig {
                data_path: PathBuf::from("data/words.json"),
                database_url: None,
                max_connections: 20,
                persist_memory_store: true,
            },
            routing: RoutingConfig {
                editor_host_label: "editor".to_string(),
                editor_path_prefix_enabled: false,
            },
            session: SessionConfig {
                secret: String::new(),
                expiry_hours: 12,
                cookie_name: "duech_session".to_string(),
                password_cost: bcrypt::DEFAULT_COST,
            },
            security: SecurityConfig {
                enable_cors: true,
                cors_origins: vec!["https://duech.cl".to_string(), "https://editor.duech.cl".to_string()],
                require_https: true,
                enable_audit_logging: true,
            },
            daily: DailyConfig { utc_offset_hours: -4 },
            port: 3000,
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}
