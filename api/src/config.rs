use std::{env, net::SocketAddr};

use crate::error::ApiError;

mod defaults {
    pub const API_PORT: &str = "8080";
    pub const API_HOST: &str = "0.0.0.0";
}

/// Server settings read from the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ApiError> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ApiError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("API_HOST").unwrap_or_else(|| defaults::API_HOST.to_string());

        let port = lookup("API_PORT")
            .unwrap_or_else(|| defaults::API_PORT.to_string())
            .parse::<u16>()
            .map_err(|e| ApiError::Config {
                key: "API_PORT",
                reason: e.to_string(),
            })?;

        Ok(Self { host, port })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ApiError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e: std::net::AddrParseError| ApiError::Config {
                key: "API_HOST",
                reason: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(|_| None).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(|key| match key {
            "API_HOST" => Some("127.0.0.1".to_string()),
            "API_PORT" => Some("3000".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:3000");
    }

    #[test]
    fn test_invalid_port() {
        let err = Config::from_lookup(|key| (key == "API_PORT").then(|| "http".to_string()))
            .unwrap_err();
        assert!(matches!(err, ApiError::Config { key: "API_PORT", .. }));
    }

    #[test]
    fn test_invalid_host() {
        let config = Config::from_lookup(|key| (key == "API_HOST").then(|| "not a host".to_string()))
            .unwrap();
        assert!(config.socket_addr().is_err());
    }
}
