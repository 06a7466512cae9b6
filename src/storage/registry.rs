//! Database Registry
//!
//! The set of databases hosted by one node.

use async_trait::async_trait;
use dashmap::DashSet;
use std::sync::Arc;

use crate::database::DatabaseManager;
use crate::error::{validate_name, Error, Result};

/// Concurrent set of database names
///
/// Cloning is cheap and clones share the same underlying set, so every
/// connection handler of a server sees the same databases.
#[derive(Debug, Clone, Default)]
pub struct DatabaseRegistry {
    inner: Arc<DashSet<String>>,
}

impl DatabaseRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry pre-populated with `names`
    pub fn with_databases<I, S>(names: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let registry = Self::new();
        for name in names {
            let name = name.as_ref();
            if !registry.contains(name)? {
                registry.create(name)?;
            }
        }
        Ok(registry)
    }

    pub fn contains(&self, name: &str) -> Result<bool> {
        validate_name(name)?;
        Ok(self.inner.contains(name))
    }

    /// Create a database, failing if it already exists
    pub fn create(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        if !self.inner.insert(name.to_string()) {
            return Err(Error::DatabaseAlreadyExists(name.to_string()));
        }
        Ok(())
    }

    /// Delete a database, failing if it does not exist
    pub fn delete(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        self.inner
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::DatabaseNotFound(name.to_string()))
    }

    /// All database names, sorted
    pub fn all(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.iter().map(|n| n.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

#[async_trait]
impl DatabaseManager for DatabaseRegistry {
    async fn contains(&self, name: &str) -> Result<bool> {
        DatabaseRegistry::contains(self, name)
    }

    async fn create(&self, name: &str) -> Result<()> {
        DatabaseRegistry::create(self, name)
    }

    async fn delete(&self, name: &str) -> Result<()> {
        DatabaseRegistry::delete(self, name)
    }

    async fn all(&self) -> Result<Vec<String>> {
        Ok(DatabaseRegistry::all(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let registry = DatabaseRegistry::new();
        assert!(registry.is_empty());

        registry.create("social").unwrap();
        assert!(registry.contains("social").unwrap());
        assert!(!registry.contains("finance").unwrap());

        registry.delete("social").unwrap();
        assert!(!registry.contains("social").unwrap());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_create_existing_fails() {
        let registry = DatabaseRegistry::with_databases(["social"]).unwrap();
        let err = registry.create("social").unwrap_err();
        assert!(matches!(err, Error::DatabaseAlreadyExists(ref n) if n == "social"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_delete_missing_fails() {
        let registry = DatabaseRegistry::new();
        let err = registry.delete("ghost").unwrap_err();
        assert!(matches!(err, Error::DatabaseNotFound(ref n) if n == "ghost"));
    }

    #[test]
    fn test_blank_names_rejected() {
        let registry = DatabaseRegistry::new();
        assert!(matches!(registry.create(" "), Err(Error::MissingDatabaseName)));
        assert!(matches!(registry.contains(""), Err(Error::MissingDatabaseName)));
        assert!(DatabaseRegistry::with_databases([""]).is_err());
    }

    #[test]
    fn test_listing_is_sorted_and_deduplicated() {
        let registry = DatabaseRegistry::with_databases(["zeta", "alpha", "mid", "alpha"]).unwrap();
        assert_eq!(registry.all(), vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_clones_share_state() {
        let registry = DatabaseRegistry::new();
        let other = registry.clone();
        registry.create("shared").unwrap();
        assert!(other.contains("shared").unwrap());
    }

    #[tokio::test]
    async fn test_as_database_manager() {
        let manager: Box<dyn DatabaseManager> = Box::new(DatabaseRegistry::new());
        manager.create("social").await.unwrap();
        assert!(manager.contains("social").await.unwrap());
        assert_eq!(manager.all().await.unwrap(), vec!["social"]);
        assert!(manager.create("social").await.is_err());
    }
}
