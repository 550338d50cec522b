//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use std::net::Ipv4Addr;
use std::path::PathBuf;

use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0),
            port: 3000,
        }
    }
}

/// Token signing configuration
///
/// The key and algorithm are fixed for the lifetime of the process; an
/// unsupported algorithm name aborts startup when the codec is built.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub secret_key: String,
    pub algorithm: String,
    pub token_ttl_minutes: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret_key: "questionnaire-dev-secret-change-in-production".to_string(),
            algorithm: "HS256".to_string(),
            token_ttl_minutes: 30,
        }
    }
}

/// Question store configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub questions_path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            questions_path: PathBuf::from("data/questions.jsonl"),
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3001".to_string()],
        }
    }
}

/// Complete application settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub store: StoreConfig,
    pub cors: CorsConfig,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();

        let server = ServerConfig {
            host: std::env::var("HOST")
                .ok()
                .and_then(|h| h.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().host),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or_else(|| ServerConfig::default().port),
        };

        let auth = AuthConfig {
            secret_key: std::env::var("SECRET_KEY").unwrap_or_else(|_| {
                warn!("SECRET_KEY not set, using default (INSECURE - set in production!)");
                AuthConfig::default().secret_key
            }),
            algorithm: std::env::var("TOKEN_ALGORITHM")
                .unwrap_or_else(|_| AuthConfig::default().algorithm),
            token_ttl_minutes: std::env::var("TOKEN_TTL_MINUTES")
                .ok()
                .and_then(|m| m.parse().ok())
                .unwrap_or_else(|| AuthConfig::default().token_ttl_minutes),
        };

        if auth.token_ttl_minutes <= 0 {
            return Err(ConfigError::InvalidValue(
                "TOKEN_TTL_MINUTES must be positive".to_string(),
            ));
        }

        let store = StoreConfig {
            questions_path: std::env::var("QUESTIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| StoreConfig::default().questions_path),
        };

        let cors = CorsConfig {
            allowed_origins: std::env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|| CorsConfig::default().allowed_origins),
        };

        Ok(Self {
            server,
            auth,
            store,
            cors,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_server_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, Ipv4Addr::new(0, 0, 0, 0));
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn test_default_auth_config() {
        let config = AuthConfig::default();
        assert_eq!(config.algorithm, "HS256");
        assert_eq!(config.token_ttl_minutes, 30);
    }
}
