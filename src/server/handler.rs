//! Connection Handler
//!
//! Processes request frames and answers them from the registry.

use crate::metrics::Metrics;
use crate::protocol::{Command, DbmCodec, Response};
use crate::storage::DatabaseRegistry;
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::Framed;
use tracing::{debug, info};

/// Connection handler
pub struct Handler {
    registry: DatabaseRegistry,
    metrics: Arc<Metrics>,
}

impl Handler {
    pub fn new(registry: DatabaseRegistry, metrics: Arc<Metrics>) -> Self {
        Self { registry, metrics }
    }

    /// Serve one connection until the peer hangs up.
    ///
    /// Command failures are answered with an error frame; only transport and
    /// framing errors end the connection.
    pub async fn run<T>(self, mut framed: Framed<T, DbmCodec>) -> std::io::Result<()>
    where
        T: AsyncRead + AsyncWrite + Unpin,
    {
        while let Some(result) = framed.next().await {
            let frame = result?;
            let start = Instant::now();
            let request_id = frame.request_id();
            let cmd_name = frame.opcode().name();

            let response = match Command::from_frame(&frame) {
                Ok(cmd) => self.execute(cmd),
                Err(e) => Response::Error(e.to_string()),
            };
            let ok = !matches!(response, Response::Error(_));

            framed.send(response.to_frame(request_id)).await?;

            let elapsed = start.elapsed();
            self.metrics.record(cmd_name, elapsed, ok);
            debug!(cmd = cmd_name, request_id, ok, latency = ?elapsed, "Command executed");
        }

        Ok(())
    }

    /// Execute a command and return the response
    fn execute(&self, cmd: Command) -> Response {
        let result = match cmd {
            Command::Ping => return Response::Pong,
            Command::Contains { name } => self.registry.contains(&name).map(Response::Bool),
            Command::Create { name } => self.registry.create(&name).map(|_| {
                info!(database = %name, "Database created");
                Response::Ok
            }),
            Command::Delete { name } => self.registry.delete(&name).map(|_| {
                info!(database = %name, "Database deleted");
                Response::Ok
            }),
            Command::All => Ok(Response::Names(self.registry.all())),
        };

        result.unwrap_or_else(|e| Response::Error(e.to_string()))
    }
}
