//! Environment configuration.
//!
//! Required: `DATABASE_URL`, `JWT_SECRET`.
//! Optional: `HOST` (default 0.0.0.0), `PORT` (default 3000),
//! `ALLOWED_ORIGINS` (comma-separated CORS allow-list, default empty),
//! `APP_ENV` (`production` suppresses error detail in 500 bodies).

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    Missing(&'static str),
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub host: IpAddr,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret =
            std::env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;

        let host = match std::env::var("HOST") {
            Ok(v) => v
                .parse()
                .map_err(|_| ConfigError::Invalid("HOST", v))?,
            Err(_) => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };
        let port = match std::env::var("PORT") {
            Ok(v) => v
                .parse()
                .map_err(|_| ConfigError::Invalid("PORT", v))?,
            Err(_) => 3000,
        };

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|v| parse_origins(&v))
            .unwrap_or_default();

        let environment =
            std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());

        Ok(Self {
            database_url,
            jwt_secret,
            host,
            port,
            allowed_origins,
            environment,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
        .collect()
}
