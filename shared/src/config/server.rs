//! HTTP server configuration module

use serde::{Deserialize, Serialize};

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Echo freshly issued codes in the request-code response body.
    ///
    /// Only meant for local development; codes are otherwise delivered through
    /// the message transport alone.
    pub expose_code_in_response: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: String::from("127.0.0.1"),
            port: 8080,
            expose_code_in_response: false,
        }
    }
}

impl ServerConfig {
    /// Socket address string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
