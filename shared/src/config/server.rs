//! Server configuration module

use serde::{Deserialize, Serialize};

use super::{env_or, env_parse, ConfigError};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Worker threads (0 = number of CPU cores)
    #[serde(default)]
    pub workers: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("0.0.0.0"),
            port: 5000,
            workers: 0,
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    /// Create from environment variables; `PORT` is accepted as an alias of `SERVER_PORT`
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let port_key = if std::env::var("SERVER_PORT").is_ok() {
            "SERVER_PORT"
        } else {
            "PORT"
        };

        Ok(Self {
            host: env_or("SERVER_HOST", &defaults.host),
            port: env_parse(port_key, defaults.port)?,
            workers: env_parse("SERVER_WORKERS", defaults.workers)?,
        })
    }

    /// Get the bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CorsConfig {
    /// Allowed origins; empty means any origin
    #[serde(default)]
    pub allowed_origins: Vec<String>,

    /// Preflight cache lifetime in seconds
    #[serde(default = "default_max_age")]
    pub max_age: usize,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age: default_max_age(),
        }
    }
}

impl CorsConfig {
    /// Create from `ALLOWED_ORIGINS` (comma-separated) and `CORS_MAX_AGE`
    pub fn from_env() -> Self {
        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(|origin| origin.trim().to_string())
                    .filter(|origin| !origin.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            allowed_origins,
            max_age: env_parse("CORS_MAX_AGE", default_max_age()).unwrap_or(default_max_age()),
        }
    }

    /// Whether every origin is accepted
    pub fn is_permissive(&self) -> bool {
        self.allowed_origins.is_empty()
    }
}

fn default_max_age() -> usize {
    3600
}
