//! Schema management for the `shares` table.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use sharehub_core::error::{AppError, ErrorKind};

/// Migrations embedded from the workspace `migrations/` directory.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Apply every pending migration to the share store.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    info!(
        known = MIGRATOR.iter().count(),
        "Applying share store migrations"
    );

    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Share store migration failed: {e}"),
            e,
        )
    })?;

    info!("Share store schema is up to date");
    Ok(())
}
