//! Database migration management commands.

use clap::{Args, Subcommand};

use crate::output;
use sharehub_core::config::AppConfig;
use sharehub_core::error::AppError;
use sharehub_database::ShareStore;
use sharehub_database::repositories::ShareRepository;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
    /// Check database connectivity
    Check,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    let pool = super::create_db_pool(config).await?;

    match &args.command {
        MigrateCommand::Run => {
            println!("Running database migrations...");
            sharehub_database::migration::run_migrations(pool.pool()).await?;
            output::print_success("All migrations applied successfully.");
        }
        MigrateCommand::Check => {
            let store = ShareRepository::new(pool.pool().clone());
            if store.health_check().await? {
                output::print_success("Database is reachable.");
            } else {
                output::print_warning("Database did not respond.");
            }
        }
    }

    pool.close().await;
    Ok(())
}
