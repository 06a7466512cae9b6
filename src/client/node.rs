//! Node Database Manager
//!
//! Database manager backed by a single clusterdb server.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_util::codec::Framed;
use tracing::debug;

use super::config::ClientConfig;
use crate::cluster::NodeAddress;
use crate::database::DatabaseManager;
use crate::error::{validate_name, Error, Result};
use crate::protocol::{Command, DbmCodec, Frame, Response};

type Connection = Framed<TcpStream, DbmCodec>;

/// Client for the database manager of one node
///
/// The connection is opened on first use and reopened after any transport
/// failure. Requests on one node are serialised.
pub struct NodeDatabaseManager {
    address: NodeAddress,
    config: ClientConfig,
    connection: Mutex<Option<Connection>>,
    next_request_id: AtomicU64,
}

impl NodeDatabaseManager {
    pub fn new(address: NodeAddress, config: ClientConfig) -> Self {
        Self {
            address,
            config,
            connection: Mutex::new(None),
            next_request_id: AtomicU64::new(1),
        }
    }

    pub fn address(&self) -> &NodeAddress {
        &self.address
    }

    /// Round-trip a PING
    pub async fn ping(&self) -> Result<()> {
        match self.request(Command::Ping).await? {
            Response::Pong => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    async fn connect(&self) -> Result<Connection> {
        let addr = self.address.to_string();
        let stream = timeout(self.config.connect_timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| Error::Timeout(millis(self.config.connect_timeout)))??;
        stream.set_nodelay(true)?;
        debug!(node = %self.address, "Connected");
        Ok(Framed::new(
            stream,
            DbmCodec::with_max_payload(self.config.max_payload),
        ))
    }

    async fn request(&self, command: Command) -> Result<Response> {
        let mut guard = self.connection.lock().await;
        if guard.is_none() {
            *guard = Some(self.connect().await?);
        }
        let Some(framed) = guard.as_mut() else {
            return Err(Error::ConnectionClosed);
        };

        let request_id = self.next_request_id.fetch_add(1, Ordering::Relaxed);
        let exchanged = timeout(
            self.config.request_timeout,
            exchange(framed, command.to_frame(request_id)),
        )
        .await
        .unwrap_or_else(|_| Err(Error::Timeout(millis(self.config.request_timeout))));

        let reply = exchanged.and_then(|frame| {
            if frame.request_id() != request_id {
                return Err(Error::Protocol(format!(
                    "Response id {} does not match request id {}",
                    frame.request_id(),
                    request_id
                )));
            }
            Response::from_frame(&frame).map_err(|e| Error::Protocol(e.to_string()))
        });

        if let Err(e) = &reply {
            debug!(node = %self.address, error = %e, "Dropping connection");
            *guard = None;
        }
        reply
    }
}

async fn exchange(framed: &mut Connection, frame: Frame) -> Result<Frame> {
    framed.send(frame).await?;
    match framed.next().await {
        Some(Ok(frame)) => Ok(frame),
        Some(Err(e)) => Err(e.into()),
        None => Err(Error::ConnectionClosed),
    }
}

/// Map a response that does not answer the request to an error
fn unexpected(response: Response) -> Error {
    match response {
        Response::Error(msg) => Error::Server(msg),
        other => Error::Protocol(format!("Unexpected response: {:?}", other)),
    }
}

fn millis(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

#[async_trait]
impl DatabaseManager for NodeDatabaseManager {
    async fn contains(&self, name: &str) -> Result<bool> {
        validate_name(name)?;
        let command = Command::Contains {
            name: name.to_string(),
        };
        match self.request(command).await? {
            Response::Bool(exists) => Ok(exists),
            other => Err(unexpected(other)),
        }
    }

    async fn create(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        let command = Command::Create {
            name: name.to_string(),
        };
        match self.request(command).await? {
            Response::Ok => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    async fn delete(&self, name: &str) -> Result<()> {
        validate_name(name)?;
        let command = Command::Delete {
            name: name.to_string(),
        };
        match self.request(command).await? {
            Response::Ok => Ok(()),
            other => Err(unexpected(other)),
        }
    }

    async fn all(&self) -> Result<Vec<String>> {
        match self.request(Command::All).await? {
            Response::Names(names) => Ok(names),
            other => Err(unexpected(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::{Server, ServerConfig};
    use tokio::net::TcpListener;

    async fn spawn_node(databases: &[&str]) -> NodeAddress {
        let mut config = ServerConfig::default().with_bind("127.0.0.1").with_port(0);
        for db in databases {
            config = config.with_database(*db);
        }
        let bound = Server::new(config).unwrap().bind().await.unwrap();
        let addr = NodeAddress::from(bound.local_addr().unwrap());
        tokio::spawn(bound.run());
        addr
    }

    #[tokio::test]
    async fn test_operations_against_server() {
        let node = NodeDatabaseManager::new(spawn_node(&["social"]).await, ClientConfig::default());

        node.ping().await.unwrap();
        assert!(node.contains("social").await.unwrap());
        assert!(!node.contains("finance").await.unwrap());

        node.create("finance").await.unwrap();
        assert_eq!(node.all().await.unwrap(), vec!["finance", "social"]);

        node.delete("social").await.unwrap();
        assert_eq!(node.all().await.unwrap(), vec!["finance"]);
    }

    #[tokio::test]
    async fn test_server_errors_keep_connection_usable() {
        let node = NodeDatabaseManager::new(spawn_node(&["social"]).await, ClientConfig::default());

        let err = node.create("social").await.unwrap_err();
        assert!(matches!(err, Error::Server(ref msg) if msg == "Database 'social' already exists"));

        let err = node.delete("ghost").await.unwrap_err();
        assert!(matches!(err, Error::Server(_)));

        assert!(node.contains("social").await.unwrap());
    }

    #[tokio::test]
    async fn test_blank_name_rejected_locally() {
        // Nothing listens here; a network attempt would fail differently
        let node = NodeDatabaseManager::new(NodeAddress::new("127.0.0.1", 1), ClientConfig::default());
        assert!(matches!(node.create("  ").await, Err(Error::MissingDatabaseName)));
        assert!(matches!(node.contains("").await, Err(Error::MissingDatabaseName)));
    }

    #[tokio::test]
    async fn test_unreachable_node() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = NodeAddress::from(listener.local_addr().unwrap());
        drop(listener);

        let node = NodeDatabaseManager::new(addr, ClientConfig::default());
        assert!(matches!(node.all().await, Err(Error::Io(_))));
    }

    #[tokio::test]
    async fn test_request_timeout() {
        // Accepts but never answers
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = NodeAddress::from(listener.local_addr().unwrap());
        tokio::spawn(async move {
            let (_socket, _) = listener.accept().await.unwrap();
            std::future::pending::<()>().await;
        });

        let config = ClientConfig::default().with_request_timeout(Duration::from_millis(50));
        let node = NodeDatabaseManager::new(addr, config);
        assert!(matches!(node.contains("db").await, Err(Error::Timeout(50))));
    }
}
