//! clusterdb Server Binary
//!
//! Serves one cluster member's databases.

use clap::Parser;
use clusterdb::protocol::DEFAULT_MAX_PAYLOAD;
use clusterdb::{Server, ServerConfig};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// clusterdb Server - one member of a database cluster
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Bind address
    #[arg(short, long, default_value = "0.0.0.0")]
    bind: String,

    /// Port number
    #[arg(short, long, default_value_t = 1729)]
    port: u16,

    /// Database to create at startup (repeatable)
    #[arg(short, long = "database")]
    databases: Vec<String>,

    /// Largest accepted frame payload in bytes
    #[arg(long, default_value_t = DEFAULT_MAX_PAYLOAD)]
    max_payload: usize,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("clusterdb=info".parse()?))
        .init();

    let args = Args::parse();

    let mut config = ServerConfig::default()
        .with_bind(&args.bind)
        .with_port(args.port)
        .with_max_payload(args.max_payload);
    for name in args.databases {
        config = config.with_database(name);
    }

    info!("Starting clusterdb server on {}:{}", args.bind, args.port);

    Server::new(config)?.run().await?;

    Ok(())
}
