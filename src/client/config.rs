//! Client Configuration

use crate::protocol::DEFAULT_MAX_PAYLOAD;
use std::time::Duration;

/// Per-node client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bound on establishing a TCP connection to a node
    pub connect_timeout: Duration,

    /// Bound on a single request/response exchange
    pub request_timeout: Duration,

    /// Largest accepted frame payload in bytes
    pub max_payload: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(30),
            max_payload: DEFAULT_MAX_PAYLOAD,
        }
    }
}

impl ClientConfig {
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_payload(mut self, max_payload: usize) -> Self {
        self.max_payload = max_payload;
        self
    }
}
