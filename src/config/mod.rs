use chrono::{FixedOffset, Offset, Utc};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub pagination: PaginationConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    /// Offset applied to wall-clock timestamps, in seconds east of UTC
    pub utc_offset_secs: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub enable_query_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    pub max_show: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Use the envelope status as the HTTP status instead of always answering 200
    pub mirror_status: bool,
    /// Surface database error text to clients instead of a generic message
    pub expose_error_detail: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl ServerConfig {
    pub fn offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.utc_offset_secs).unwrap_or_else(|| Utc.fix())
    }
}

// Asia/Singapore, no DST
const SINGAPORE_SECS: i32 = 8 * 3600;

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source. `from_env` is the
    /// process-environment flavour of this.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(lookup)
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        // Server overrides
        if let Some(v) = lookup("APP_PORT").or_else(|| lookup("PORT")) {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Some(v) = lookup("APP_UTC_OFFSET") {
            self.server.utc_offset_secs = parse_utc_offset(&v).unwrap_or(self.server.utc_offset_secs);
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Some(v) = lookup("DATABASE_ENABLE_QUERY_LOGGING") {
            self.database.enable_query_logging = v.parse().unwrap_or(self.database.enable_query_logging);
        }

        // Pagination overrides
        if let Some(v) = lookup("PAGINATION_MAX_SHOW") {
            self.pagination.max_show = v.parse().unwrap_or(self.pagination.max_show);
        }

        // API overrides
        if let Some(v) = lookup("API_MIRROR_STATUS") {
            self.api.mirror_status = v.parse().unwrap_or(self.api.mirror_status);
        }
        if let Some(v) = lookup("API_EXPOSE_ERROR_DETAIL") {
            self.api.expose_error_detail = v.parse().unwrap_or(self.api.expose_error_detail);
        }

        // Security overrides
        if let Some(v) = lookup("SECURITY_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Some(v) = lookup("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Some(v) = lookup("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        // Logging overrides
        if let Some(v) = lookup("LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("LOG_JSON") {
            self.logging.json = v.parse().unwrap_or(self.logging.json);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                port: 3000,
                utc_offset_secs: SINGAPORE_SECS,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                connection_timeout: 30,
                enable_query_logging: true,
            },
            pagination: PaginationConfig { max_show: 1000 },
            api: ApiConfig {
                mirror_status: false,
                expose_error_detail: true,
            },
            security: SecurityConfig {
                jwt_secret: "development-secret".to_string(),
                jwt_expiry_hours: 24 * 7, // 1 week
                cors_origins: vec!["http://localhost:3000".to_string(), "http://localhost:5173".to_string()],
            },
            logging: LoggingConfig {
                level: "debug".to_string(),
                json: false,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig {
                port: 3000,
                utc_offset_secs: SINGAPORE_SECS,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                connection_timeout: 10,
                enable_query_logging: true,
            },
            pagination: PaginationConfig { max_show: 500 },
            api: ApiConfig {
                mirror_status: false,
                expose_error_detail: false,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                cors_origins: vec!["https://staging-portal.skhillz.com".to_string()],
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: true,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig {
                port: 3000,
                utc_offset_secs: SINGAPORE_SECS,
            },
            database: DatabaseConfig {
                url: None,
                max_connections: 50,
                connection_timeout: 5,
                enable_query_logging: false,
            },
            pagination: PaginationConfig { max_show: 100 },
            api: ApiConfig {
                mirror_status: false,
                expose_error_detail: false,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
                cors_origins: vec!["https://portal.skhillz.com".to_string()],
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: true,
            },
        }
    }
}

/// Parse "+08:00" style offsets (or "UTC") into seconds east of UTC
pub fn parse_utc_offset(value: &str) -> Option<i32> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("z") || value.eq_ignore_ascii_case("utc") {
        return Some(0);
    }
    value.parse::<FixedOffset>().ok().map(|offset| offset.local_minus_utc())
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::from_lookup(lookup_from(&[]));
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.pagination.max_show, 1000);
        assert!(config.api.expose_error_detail);
        assert!(!config.api.mirror_status);
        assert_eq!(config.server.utc_offset_secs, 8 * 3600);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::from_lookup(lookup_from(&[("APP_ENV", "prod")]));
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.pagination.max_show, 100);
        assert!(!config.api.expose_error_detail);
        assert!(config.security.jwt_secret.is_empty());
    }

    #[test]
    fn env_overrides_apply_on_top_of_profile() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("APP_ENV", "staging"),
            ("PORT", "8081"),
            ("DATABASE_URL", "postgres://u:p@db/branches"),
            ("API_MIRROR_STATUS", "true"),
            ("SECURITY_CORS_ORIGINS", "https://a.example, https://b.example,"),
            ("APP_UTC_OFFSET", "-05:30"),
        ]));
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.database.url.as_deref(), Some("postgres://u:p@db/branches"));
        assert!(config.api.mirror_status);
        assert_eq!(config.security.cors_origins, vec!["https://a.example", "https://b.example"]);
        assert_eq!(config.server.utc_offset_secs, -(5 * 3600 + 30 * 60));
    }

    #[test]
    fn unparseable_overrides_keep_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DATABASE_MAX_CONNECTIONS", "lots"),
            ("APP_UTC_OFFSET", "somewhere"),
        ]));
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.server.utc_offset_secs, 8 * 3600);
    }

    #[test]
    fn parses_offsets() {
        assert_eq!(parse_utc_offset("+08:00"), Some(28_800));
        assert_eq!(parse_utc_offset("UTC"), Some(0));
        assert_eq!(parse_utc_offset("nope"), None);
    }
}
