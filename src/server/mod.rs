//! Server Module
//!
//! TCP server exposing one node's database registry over the DBM protocol.

mod config;
mod handler;

pub use config::ServerConfig;
pub use handler::Handler;

use crate::error::Result;
use crate::metrics::Metrics;
use crate::protocol::DbmCodec;
use crate::storage::DatabaseRegistry;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::codec::Framed;
use tracing::{error, info};

/// clusterdb node server
pub struct Server {
    config: ServerConfig,
    registry: DatabaseRegistry,
    metrics: Arc<Metrics>,
}

impl Server {
    /// Create a server whose registry holds the configured startup databases
    pub fn new(config: ServerConfig) -> Result<Self> {
        let registry = DatabaseRegistry::with_databases(&config.databases)?;
        Ok(Self::with_registry(config, registry))
    }

    /// Create a server around an existing registry
    pub fn with_registry(config: ServerConfig, registry: DatabaseRegistry) -> Self {
        Self {
            config,
            registry,
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Bind the listener without serving yet
    pub async fn bind(self) -> Result<BoundServer> {
        let listener = TcpListener::bind(self.config.listen_addr()).await?;
        Ok(BoundServer {
            listener,
            server: self,
        })
    }

    /// Bind and serve forever
    pub async fn run(self) -> Result<()> {
        self.bind().await?.run().await
    }

    pub fn registry(&self) -> &DatabaseRegistry {
        &self.registry
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }
}

/// Server with a bound listener
pub struct BoundServer {
    listener: TcpListener,
    server: Server,
}

impl BoundServer {
    /// Address the listener is bound to
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever, one handler task per connection
    pub async fn run(self) -> Result<()> {
        let BoundServer { listener, server } = self;
        info!(
            "clusterdb server listening on {} with {} database(s)",
            listener.local_addr()?,
            server.registry.len()
        );

        loop {
            match listener.accept().await {
                Ok((socket, peer_addr)) => {
                    info!("New connection from {}", peer_addr);

                    let registry = server.registry.clone();
                    let metrics = server.metrics.clone();
                    let codec = DbmCodec::with_max_payload(server.config.max_payload);

                    tokio::spawn(async move {
                        let framed = Framed::new(socket, codec);
                        let handler = Handler::new(registry, metrics.clone());

                        if let Err(e) = handler.run(framed).await {
                            error!("Connection error from {}: {}", peer_addr, e);
                        }

                        info!("Connection closed: {} ({})", peer_addr, metrics.summary());
                    });
                }
                Err(e) => {
                    error!("Accept error: {}", e);
                }
            }
        }
    }
}
