//! Client Module
//!
//! Per-node RPC client implementing the database manager contract.

mod config;
mod node;

pub use config::ClientConfig;
pub use node::NodeDatabaseManager;
