use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "spendlog")]
#[command(about = "Expense tracking MCP server backed by SQLite")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Database file path (overrides configuration)
    #[arg(long)]
    pub db_path: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve MCP requests over stdio
    Serve,

    /// Run a database integrity check and exit
    Check,
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Serve
    }
}
