//! Database Manager
//!
//! The capability contract shared by a single node, the in-process registry
//! and the cluster coordinator.

use crate::error::Result;
use async_trait::async_trait;

/// Existence check, creation, deletion and listing of named databases.
///
/// Implementations are interchangeable: a cluster of managers is itself a
/// manager and can stand in wherever a single node is expected.
#[async_trait]
pub trait DatabaseManager: Send + Sync {
    /// Whether a database named `name` exists
    async fn contains(&self, name: &str) -> Result<bool>;

    /// Create the database `name`
    async fn create(&self, name: &str) -> Result<()>;

    /// Delete the database `name`
    async fn delete(&self, name: &str) -> Result<()>;

    /// Names of all databases
    async fn all(&self) -> Result<Vec<String>>;
}

#[async_trait]
impl<M: DatabaseManager + ?Sized> DatabaseManager for std::sync::Arc<M> {
    async fn contains(&self, name: &str) -> Result<bool> {
        (**self).contains(name).await
    }

    async fn create(&self, name: &str) -> Result<()> {
        (**self).create(name).await
    }

    async fn delete(&self, name: &str) -> Result<()> {
        (**self).delete(name).await
    }

    async fn all(&self) -> Result<Vec<String>> {
        (**self).all().await
    }
}
