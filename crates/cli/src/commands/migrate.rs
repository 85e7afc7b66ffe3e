//! Database migration command.
//!
//! Migrations live in `crates/api/migrations/` and are embedded at compile
//! time, so the binary can run them from anywhere.

use super::{CliError, connect, load_config};

/// Run all pending migrations.
pub async fn run() -> Result<(), CliError> {
    let config = load_config()?;
    let pool = connect(&config).await?;

    tracing::info!("Running shop migrations...");
    sqlx::migrate!("../api/migrations").run(&pool).await?;

    tracing::info!("Shop migrations complete!");
    Ok(())
}
