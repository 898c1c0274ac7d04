//! CLI command definitions and dispatch.

pub mod migrate;
pub mod share;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use sharehub_core::config::AppConfig;
use sharehub_core::error::AppError;
use sharehub_core::types::UserId;
use sharehub_database::{DatabasePool, ShareRepository};
use sharehub_service::{RequestContext, ShareResolver};
use sharehub_storage::LocalFileSystem;

/// ShareHub: hierarchical file sharing between user namespaces
#[derive(Debug, Parser)]
#[command(name = "sharehub", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Share management and resolution
    Share(share::ShareArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, config).await,
            Commands::Share(args) => share::execute(args, config, self.format).await,
        }
    }
}

/// Helper: create database pool from config
pub async fn create_db_pool(config: &AppConfig) -> Result<DatabasePool, AppError> {
    DatabasePool::connect(&config.database).await
}

/// Helper: build a resolver over the Postgres store and local storage root
pub async fn create_resolver(config: &AppConfig) -> Result<ShareResolver, AppError> {
    let pool = create_db_pool(config).await?;
    let store = ShareRepository::new(pool.into_pool());
    let fs = LocalFileSystem::new(&config.sharing.storage_root).await?;
    Ok(ShareResolver::new(
        Arc::new(store),
        Arc::new(fs),
        config.sharing.clone(),
    ))
}

/// Helper: request context for the acting user
pub fn request_context(user: &str) -> Result<RequestContext, AppError> {
    Ok(RequestContext::new(UserId::new(user)?))
}

/// Helper: parse a list of recipient ids
pub fn parse_users(users: &[String]) -> Result<Vec<UserId>, AppError> {
    users.iter().map(|u| UserId::new(u.as_str())).collect()
}
