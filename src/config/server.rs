use crate::core::{AppError, Result};
use std::env;

/// Server configuration for the HTTP server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: usize,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| AppError::Configuration("Invalid SERVER_PORT".to_string()))?;

        Ok(Self::new(host, port))
    }

    pub fn new(host: String, port: u16) -> Self {
        Self {
            host,
            port,
            // I/O-bound workload, 2x CPU cores
            workers: num_cpus::get() * 2,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config() {
        let config = ServerConfig::new("127.0.0.1".to_string(), 8080);
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
        assert!(config.workers > 0);
    }
}
