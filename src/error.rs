//! Error types
//!
//! A single error enum shared by the node client, the cluster coordinator
//! and the server-side registry.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Connection closed")]
    ConnectionClosed,

    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    #[error("Database name must not be empty")]
    MissingDatabaseName,

    #[error("Database '{0}' already exists")]
    DatabaseAlreadyExists(String),

    #[error("Database '{0}' does not exist")]
    DatabaseNotFound(String),

    /// Every member failed a `contains`/`all` call. Holds the member errors
    /// in the order the members were visited.
    #[error("Attempted connecting to all cluster members, but the following errors occurred: {0:?}")]
    ClusterUnavailable(Vec<String>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid address '{0}'")]
    InvalidAddress(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Reject names that are empty or whitespace only.
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::MissingDatabaseName);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_unavailable_message() {
        let err = Error::ClusterUnavailable(vec![
            "Connection closed".to_string(),
            "Server error: boom".to_string(),
        ]);
        assert_eq!(
            err.to_string(),
            "Attempted connecting to all cluster members, but the following errors occurred: \
             [\"Connection closed\", \"Server error: boom\"]"
        );
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("social").is_ok());
        assert!(matches!(validate_name(""), Err(Error::MissingDatabaseName)));
        assert!(matches!(validate_name("  \t"), Err(Error::MissingDatabaseName)));
    }
}
