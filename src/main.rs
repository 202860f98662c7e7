//! Kanban MCP Server - Main Entry Point
//!
//! This is the main entry point for the Kanban MCP server application.
//! The actual implementation is in the `kanban_mcp` library.

use anyhow::Result;
use clap::{CommandFactory, Parser};
use kanban_mcp::BoardServerHandler;
use kanban_mcp::store::{FileStore, MemoryStore, StoreGateway};
use mcp_attr::server::serve_stdio;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Kanban MCP Server - multi-list task boards via Model Context Protocol
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the board data directory
    data_dir: Option<String>,

    /// Keep all data in memory instead of on disk (data is lost on exit)
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Check if no arguments were provided (except the program name)
    if std::env::args().len() == 1 {
        // No arguments provided, show help and exit with error code
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!(); // Add a newline after help
        std::process::exit(2);
    }

    // Stdout carries the MCP protocol, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kanban_mcp=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let store: Arc<dyn StoreGateway> = if args.in_memory {
        Arc::new(MemoryStore::new())
    } else if let Some(data_dir) = args.data_dir {
        Arc::new(FileStore::new(data_dir))
    } else {
        let mut cmd = Args::command();
        cmd.print_help().ok();
        println!();
        std::process::exit(2);
    };

    let handler = BoardServerHandler::new(store);
    serve_stdio(handler).await?;
    Ok(())
}
