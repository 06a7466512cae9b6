//! Cluster Module
//!
//! Client-side coordination of database management across cluster members.

mod address;
mod manager;

pub use address::NodeAddress;
pub use manager::{first_success, ClusterDatabaseManager, Member};
