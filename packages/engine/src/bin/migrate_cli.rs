//! CLI for running schema migrations against the configured database.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use engine_core::config::Config;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "migrate_cli")]
#[command(about = "Schema migration runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply all pending migrations
    Run,

    /// Show applied migration versions
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let pool = PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Run => {
            sqlx::migrate!("./migrations")
                .run(&pool)
                .await
                .context("Failed to run migrations")?;
            tracing::info!("Migrations applied");
        }
        Commands::Status => {
            let rows: Vec<(i64, String)> = sqlx::query_as(
                "SELECT version, description FROM _sqlx_migrations ORDER BY version",
            )
            .fetch_all(&pool)
            .await
            .context("Failed to read migration state (has `run` been executed?)")?;

            for (version, description) in rows {
                println!("{}\t{}", version, description);
            }
        }
    }

    Ok(())
}
