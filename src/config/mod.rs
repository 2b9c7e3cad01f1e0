use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub organization: OrganizationConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Staging => "staging",
            Environment::Production => "production",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Postgres connection string. Absent means requests that need the
    /// database answer 503 until it is configured.
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// HMAC key for session tokens. Never serialized.
    #[serde(skip_serializing, default)]
    pub jwt_secret: String,
    pub session_days: u64,
    pub session_cookie: String,
    /// Cross-site deployments need Secure + SameSite=None cookies; local
    /// plain-http development would silently drop those, so it uses Lax.
    pub cookie_secure: bool,
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrganizationConfig {
    /// Default church name stamped onto new classes.
    pub church_name: String,
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
        // Server overrides
        if let Ok(v) = env::var("PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }

        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            if !v.is_empty() {
                self.database.url = Some(v);
            }
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_ACQUIRE_TIMEOUT_SECS") {
            self.database.acquire_timeout_secs = v.parse().unwrap_or(self.database.acquire_timeout_secs);
        }

        // Security overrides
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SESSION_DAYS") {
            self.security.session_days = v.parse().unwrap_or(self.security.session_days);
        }
        if let Ok(v) = env::var("SESSION_COOKIE") {
            if !v.is_empty() {
                self.security.session_cookie = v;
            }
        }
        if let Ok(v) = env::var("COOKIE_SECURE") {
            self.security.cookie_secure = v.parse().unwrap_or(self.security.cookie_secure);
        }
        if let Ok(v) = env::var("ALLOWED_ORIGINS") {
            self.security.cors_origins = v.split(',').map(|s| s.trim().to_string()).collect();
        }

        // Organization overrides
        if let Ok(v) = env::var("CHURCH_NAME") {
            if !v.is_empty() {
                self.organization.church_name = v;
            }
        }

        self
    }

    /// Startup validation. The signing secret is the one setting with no
    /// workable default; everything else degrades at runtime.
    pub fn validate(&self) -> Result<(), String> {
        if self.security.jwt_secret.is_empty() {
            return Err("JWT_SECRET must be set".to_string());
        }
        if self.security.session_days == 0 {
            return Err("SESSION_DAYS must be at least 1".to_string());
        }
        Ok(())
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: None,
                max_connections: 10,
                acquire_timeout_secs: 30,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                session_days: 7,
                session_cookie: "ss_session".to_string(),
                cookie_secure: false,
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
            },
            organization: OrganizationConfig {
                church_name: "Central Church".to_string(),
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                acquire_timeout_secs: 10,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                session_days: 7,
                session_cookie: "ss_session".to_string(),
                cookie_secure: true,
                cors_origins: vec!["https://staging.example.com".to_string()],
            },
            organization: OrganizationConfig {
                church_name: "Central Church".to_string(),
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 3000 },
            database: DatabaseConfig {
                url: None,
                max_connections: 20,
                acquire_timeout_secs: 5,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                session_days: 7,
                session_cookie: "ss_session".to_string(),
                cookie_secure: true,
                cors_origins: vec!["https://app.example.com".to_string()],
            },
            organization: OrganizationConfig {
                church_name: "Central Church".to_string(),
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

// Helper macros for common checks
#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}

#[macro_export]
macro_rules! is_production {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Production)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_development_config() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 3000);
        assert!(!config.security.cookie_secure);
        assert_eq!(config.security.session_cookie, "ss_session");
        assert_eq!(config.security.session_days, 7);
    }

    #[test]
    fn test_default_production_config() {
        let config = AppConfig::production();
        assert!(config.security.cookie_secure);
        assert!(config.database.url.is_none());
    }

    #[test]
    fn test_validation_requires_jwt_secret() {
        let mut config = AppConfig::development();
        assert!(config.validate().is_err());
        config.security.jwt_secret = "secret".to_string();
        assert!(config.validate().is_ok());
    }
}
