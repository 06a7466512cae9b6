//! clusterdb CLI Client
//!
//! Interactive command-line client managing databases across a cluster.

use clap::Parser;
use clusterdb::{
    ClientConfig, ClusterDatabaseManager, DatabaseManager, NodeAddress, NodeDatabaseManager,
    Response,
};
use std::io::{self, Write};
use std::time::Duration;
use tracing_subscriber::{fmt, EnvFilter};

/// clusterdb CLI - Interactive Cluster Client
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Cluster member address, host:port (repeatable, visited in order)
    #[arg(short, long = "node", default_value = "127.0.0.1:1729")]
    nodes: Vec<NodeAddress>,

    /// Connect timeout per member in milliseconds
    #[arg(long, default_value_t = 5000)]
    connect_timeout_ms: u64,

    /// Request timeout per member in milliseconds
    #[arg(long, default_value_t = 30000)]
    request_timeout_ms: u64,
}

/// A parsed REPL line
#[derive(Debug)]
enum CliCommand {
    Contains(String),
    Create(String),
    Delete(String),
    List,
    Ping,
    Nodes,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("clusterdb=warn".parse()?))
        .init();

    let args = Args::parse();
    let config = ClientConfig::default()
        .with_connect_timeout(Duration::from_millis(args.connect_timeout_ms))
        .with_request_timeout(Duration::from_millis(args.request_timeout_ms));

    let cluster = ClusterDatabaseManager::connect(args.nodes.iter().cloned(), config.clone())?;
    let probes: Vec<NodeDatabaseManager> = args
        .nodes
        .iter()
        .map(|addr| NodeDatabaseManager::new(addr.clone(), config.clone()))
        .collect();

    println!(
        "clusterdb cluster of {} member(s). Type 'help' for available commands, 'quit' to exit.\n",
        cluster.member_count()
    );

    loop {
        print!("clusterdb> ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("quit") || input.eq_ignore_ascii_case("exit") {
            println!("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("help") {
            print_help();
            continue;
        }

        match parse_command(input) {
            Ok(cmd) => execute(&cluster, &probes, cmd).await,
            Err(e) => eprintln!("Error: {}", e),
        }
    }

    Ok(())
}

async fn execute(cluster: &ClusterDatabaseManager, probes: &[NodeDatabaseManager], cmd: CliCommand) {
    let response = match cmd {
        CliCommand::Contains(name) => cluster.contains(&name).await.map(Response::Bool),
        CliCommand::Create(name) => cluster.create(&name).await.map(|_| Response::Ok),
        CliCommand::Delete(name) => cluster.delete(&name).await.map(|_| Response::Ok),
        CliCommand::List => cluster.all().await.map(Response::Names),
        CliCommand::Ping => {
            for probe in probes {
                match probe.ping().await {
                    Ok(()) => println!("{}: PONG", probe.address()),
                    Err(e) => println!("{}: (error) {}", probe.address(), e),
                }
            }
            return;
        }
        CliCommand::Nodes => {
            for (i, addr) in cluster.addresses().enumerate() {
                println!("{}) {}", i + 1, addr);
            }
            return;
        }
    };

    match response {
        Ok(response) => println!("{}", response),
        Err(e) => println!("{}", Response::Error(e.to_string())),
    }
}

fn parse_command(input: &str) -> anyhow::Result<CliCommand> {
    let parts: Vec<&str> = input.split_whitespace().collect();

    if parts.is_empty() {
        anyhow::bail!("Empty command");
    }

    let cmd = parts[0].to_uppercase();
    let name = || -> anyhow::Result<String> {
        match parts.get(1) {
            Some(name) => Ok(name.to_string()),
            None => anyhow::bail!("{} requires a database name: {} <database>", cmd, cmd),
        }
    };

    match cmd.as_str() {
        "CONTAINS" => Ok(CliCommand::Contains(name()?)),
        "CREATE" => Ok(CliCommand::Create(name()?)),
        "DELETE" => Ok(CliCommand::Delete(name()?)),
        "LIST" => Ok(CliCommand::List),
        "PING" => Ok(CliCommand::Ping),
        "NODES" => Ok(CliCommand::Nodes),
        _ => anyhow::bail!("Unknown command: {}. Type 'help' for available commands.", cmd),
    }
}

fn print_help() {
    println!(
        r#"
Available commands:

  CONTAINS <db>     - Check whether a database exists (first member to answer)
  CREATE <db>       - Create a database on every member missing it
  DELETE <db>       - Delete a database from every member holding it
  LIST              - List databases (first member to answer)
  PING              - Ping every member
  NODES             - Show cluster members in visitation order

  help              - Show this help
  quit / exit       - Exit the CLI

Examples:
  CREATE social
  CONTAINS social
  LIST
  DELETE social
"#
    );
}
