//! clusterdb - Cluster-Aware Database Manager
//!
//! A client-side coordinator that presents a set of independent server nodes
//! as one database manager, plus the single-node server it talks to over the
//! DBM binary protocol.

pub mod client;
pub mod cluster;
pub mod database;
pub mod error;
pub mod metrics;
pub mod protocol;
pub mod server;
pub mod storage;

pub use client::{ClientConfig, NodeDatabaseManager};
pub use cluster::{ClusterDatabaseManager, NodeAddress};
pub use database::DatabaseManager;
pub use error::{Error, Result};
pub use metrics::Metrics;
pub use protocol::{Command, DbmCodec, Frame, Response};
pub use server::{Server, ServerConfig};
pub use storage::DatabaseRegistry;
