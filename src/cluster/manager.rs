//! Cluster Database Manager
//!
//! Presents the members of a cluster as one database manager.
//!
//! Reads (`contains`, `all`) are answered by the first member that responds,
//! in member order. Failed members are skipped, and only when every member
//! fails is the caller given one error listing all of them. Writes (`create`,
//! `delete`) visit every member in order and bring each one to the requested
//! state on its own. The first member error aborts the pass and is returned
//! unchanged. Members already updated keep their new state.

use async_trait::async_trait;
use futures::stream::{self, Stream, StreamExt};
use hashbrown::HashSet;
use std::pin::pin;
use tracing::{debug, info, warn};

use super::address::NodeAddress;
use crate::client::{ClientConfig, NodeDatabaseManager};
use crate::database::DatabaseManager;
use crate::error::{Error, Result};

/// One cluster member and its database manager
pub type Member = (NodeAddress, Box<dyn DatabaseManager>);

/// Database manager coordinating a fixed, ordered set of cluster members
pub struct ClusterDatabaseManager {
    members: Vec<Member>,
}

impl ClusterDatabaseManager {
    /// Build from an ordered, non-empty member list
    pub fn new(members: Vec<Member>) -> Result<Self> {
        if members.is_empty() {
            return Err(Error::Config(
                "cluster must have at least one member".to_string(),
            ));
        }
        Ok(Self { members })
    }

    /// Build with one node client per address, in the order given.
    ///
    /// No connection is opened here; an unreachable member only shows up as
    /// that member's error when it is first visited.
    pub fn connect<I>(addresses: I, config: ClientConfig) -> Result<Self>
    where
        I: IntoIterator<Item = NodeAddress>,
    {
        let mut seen = HashSet::new();
        let mut members: Vec<Member> = Vec::new();
        for address in addresses {
            if !seen.insert(address.clone()) {
                return Err(Error::Config(format!(
                    "duplicate cluster member {}",
                    address
                )));
            }
            let node = NodeDatabaseManager::new(address.clone(), config.clone());
            members.push((address, Box::new(node)));
        }
        Self::new(members)
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Member addresses in visitation order
    pub fn addresses(&self) -> impl Iterator<Item = &NodeAddress> {
        self.members.iter().map(|(address, _)| address)
    }

    /// Lazily query members one after another, in order
    fn ask_each<'a, T, F>(&'a self, op: F) -> impl Stream<Item = (&'a NodeAddress, Result<T>)> + Send + 'a
    where
        T: Send + 'a,
        F: Fn(&'a dyn DatabaseManager) -> futures::future::BoxFuture<'a, Result<T>> + Send + 'a,
    {
        stream::iter(self.members.iter())
            .then(move |(address, member)| {
                let outcome = op(member.as_ref());
                async move { (address, outcome.await) }
            })
    }
}

/// Result of the first member that answered, or every member error in
/// visitation order once all of them failed.
pub async fn first_success<'a, T, S>(outcomes: S) -> Result<T>
where
    S: Stream<Item = (&'a NodeAddress, Result<T>)>,
{
    let mut outcomes = pin!(outcomes);
    let mut errors = Vec::new();

    while let Some((address, outcome)) = outcomes.next().await {
        match outcome {
            Ok(value) => return Ok(value),
            Err(e) => {
                debug!(node = %address, error = %e, "Cluster member failed, trying next");
                errors.push(e.to_string());
            }
        }
    }

    warn!(failed = errors.len(), "No cluster member answered");
    Err(Error::ClusterUnavailable(errors))
}

#[async_trait]
impl DatabaseManager for ClusterDatabaseManager {
    async fn contains(&self, name: &str) -> Result<bool> {
        first_success(self.ask_each(|member| member.contains(name))).await
    }

    async fn create(&self, name: &str) -> Result<()> {
        for (address, member) in &self.members {
            if !member.contains(name).await? {
                info!(node = %address, database = name, "Creating database on cluster member");
                member.create(name).await?;
            }
        }
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        for (address, member) in &self.members {
            if member.contains(name).await? {
                info!(node = %address, database = name, "Deleting database on cluster member");
                member.delete(name).await?;
            }
        }
        Ok(())
    }

    async fn all(&self) -> Result<Vec<String>> {
        first_success(self.ask_each(|member| member.all())).await
    }
}
