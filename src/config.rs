//! Server configuration loaded from environment variables

use anyhow::Context;

/// Top-level configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

/// HTTP server settings
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    /// Allowed CORS origin for the web client, `*` to allow any
    pub cors_origin: String,
}

/// Database settings
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                port: 4000,
                cors_origin: "*".to_string(),
            },
            database: DatabaseConfig {
                url: "sqlite:quire.db".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from the environment, falling back to
    /// defaults for anything unset
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let port = match std::env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("invalid PORT value: {value}"))?,
            Err(_) => defaults.server.port,
        };

        let cors_origin =
            std::env::var("CORS_ORIGIN").unwrap_or(defaults.server.cors_origin);

        let url = std::env::var("DATABASE_URL").unwrap_or(defaults.database.url);

        Ok(Self {
            server: ServerConfig { port, cors_origin },
            database: DatabaseConfig { url },
        })
    }
}
