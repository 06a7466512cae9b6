//! Server Configuration

use crate::protocol::DEFAULT_MAX_PAYLOAD;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub bind: String,

    /// Port number (0 = pick an ephemeral port)
    pub port: u16,

    /// Largest accepted frame payload in bytes
    pub max_payload: usize,

    /// Databases created at startup
    pub databases: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 1729,
            max_payload: DEFAULT_MAX_PAYLOAD,
            databases: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the bind address
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = bind.into();
        self
    }

    /// Set the payload limit
    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload;
        self
    }

    /// Add a database to create at startup
    pub fn with_database(mut self, name: impl Into<String>) -> Self {
        self.databases.push(name.into());
        self
    }

    /// `bind:port` string handed to the listener
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
