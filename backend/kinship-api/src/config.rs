/// Configuration management for Kinship API
///
/// Loads configuration from environment variables (and `.env` when present).
use crate::error::AppError;
use db_pool::DbConfig;

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database pool configuration
    pub database: DbConfig,
    /// Session cookie / token settings
    pub session: SessionConfig,
    /// CORS configuration
    pub cors: CorsConfig,
    /// Pagination bounds
    pub pagination: PaginationConfig,
}

/// Application settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application environment (development, staging, production)
    pub env: String,
    /// Server host to bind to
    pub host: String,
    /// Server port to bind to
    pub port: u16,
}

impl AppConfig {
    pub fn is_development(&self) -> bool {
        matches!(self.env.as_str(), "development" | "dev" | "test")
    }
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub ttl_hours: i64,
    pub cookie_name: String,
    pub cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_hours: 24 * 14,
            cookie_name: "sessionid".to_string(),
            cookie_secure: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    /// Allowed origins; `["*"]` allows any
    pub allowed_origins: Vec<String>,
}

impl CorsConfig {
    pub fn allow_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PaginationConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_origins(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let app = AppConfig {
            env: std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
            host: std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env_parse("PORT").unwrap_or(8000),
        };

        let database = DbConfig::from_env("kinship-api").map_err(AppError::Config)?;

        let session_defaults = SessionConfig::default();
        let session = SessionConfig {
            ttl_hours: env_parse::<i64>("SESSION_TTL_HOURS")
                .filter(|h| *h > 0)
                .unwrap_or(session_defaults.ttl_hours),
            cookie_name: std::env::var("SESSION_COOKIE_NAME")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or(session_defaults.cookie_name),
            cookie_secure: env_parse("SESSION_COOKIE_SECURE").unwrap_or(!app.is_development()),
        };

        let mut allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_default();
        if allowed_origins.is_empty() {
            allowed_origins.push("*".to_string());
        }

        let page_defaults = PaginationConfig::default();
        let max_limit = env_parse::<u32>("PAGE_SIZE_MAX")
            .filter(|v| *v > 0)
            .unwrap_or(page_defaults.max_limit);
        let default_limit = env_parse::<u32>("PAGE_SIZE_DEFAULT")
            .filter(|v| *v > 0)
            .unwrap_or(page_defaults.default_limit)
            .min(max_limit);

        Ok(Config {
            app,
            database,
            session,
            cors: CorsConfig { allowed_origins },
            pagination: PaginationConfig {
                default_limit,
                max_limit,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEYS: &[&str] = &[
        "APP_ENV",
        "APP_HOST",
        "PORT",
        "SESSION_TTL_HOURS",
        "SESSION_COOKIE_NAME",
        "SESSION_COOKIE_SECURE",
        "CORS_ALLOWED_ORIGINS",
        "PAGE_SIZE_DEFAULT",
        "PAGE_SIZE_MAX",
    ];

    fn clear() {
        for key in KEYS {
            std::env::remove_var(key);
        }
    }

    #[test]
    #[serial_test::serial]
    fn test_default_values() {
        clear();
        std::env::set_var("DATABASE_URL", "postgres://test");

        let config = Config::from_env().unwrap();

        assert_eq!(config.app.env, "development");
        assert_eq!(config.app.host, "0.0.0.0");
        assert_eq!(config.app.port, 8000);
        assert_eq!(config.session.ttl_hours, 336);
        assert_eq!(config.session.cookie_name, "sessionid");
        assert!(!config.session.cookie_secure);
        assert!(config.cors.allow_any());
        assert_eq!(config.pagination.default_limit, 20);
        assert_eq!(config.pagination.max_limit, 100);
    }

    #[test]
    #[serial_test::serial]
    fn test_overrides() {
        clear();
        std::env::set_var("DATABASE_URL", "postgres://test");
        std::env::set_var("APP_ENV", "production");
        std::env::set_var("PORT", "9100");
        std::env::set_var("CORS_ALLOWED_ORIGINS", "https://a.example, https://b.example");
        std::env::set_var("PAGE_SIZE_DEFAULT", "500");
        std::env::set_var("PAGE_SIZE_MAX", "50");

        let config = Config::from_env().unwrap();

        assert_eq!(config.app.port, 9100);
        assert!(config.session.cookie_secure);
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
        assert!(!config.cors.allow_any());
        assert_eq!(config.pagination.max_limit, 50);
        assert_eq!(config.pagination.default_limit, 50);

        clear();
    }

    #[test]
    #[serial_test::serial]
    fn test_missing_database_url() {
        clear();
        std::env::remove_var("DATABASE_URL");

        assert!(matches!(Config::from_env(), Err(AppError::Config(_))));
    }
}
