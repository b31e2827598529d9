use clap::Parser;
use tracing::info;

use spendlog::app::AppConfig;
use spendlog::cli::{Cli, Commands};
use spendlog::error::Result;
use spendlog::mcp::{CategoryResource, McpServer, StdioTransport};
use spendlog::platform::AppPaths;
use spendlog::storage::{Database, ExpenseRepository};

fn init_logging(debug: bool) {
    let directive = if debug {
        "spendlog=debug"
    } else {
        "spendlog=info"
    };

    // Logs go to stderr; stdout carries the JSON-RPC stream.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(directive.parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    info!("Starting spendlog");

    let paths = AppPaths::new()?;
    paths.ensure_dirs_exist()?;

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path).await?,
        None => AppConfig::load(&paths).await?,
    };

    // Schema initialization happens here, before any operation is reachable.
    let db_path = cli
        .db_path
        .clone()
        .unwrap_or_else(|| config.database_file(&paths));
    let db = Database::open(&db_path).await?;

    match cli.command.unwrap_or_default() {
        Commands::Serve => {
            let categories = CategoryResource::new(config.categories_file(&paths));
            categories.ensure_seed().await?;

            let repository = ExpenseRepository::new(db.pool().clone());
            let server = McpServer::new(
                repository,
                categories,
                config.server.name.clone(),
                config.server.instructions.clone(),
            );

            let mut transport = StdioTransport::new();
            server.run(&mut transport).await?;
        }
        Commands::Check => {
            let is_ok = db.verify_integrity().await?;
            println!(
                "{}: integrity {}",
                db_path.display(),
                if is_ok { "ok" } else { "FAILED" }
            );
            if !is_ok {
                std::process::exit(1);
            }
        }
    }

    db.close().await;
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.debug);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
