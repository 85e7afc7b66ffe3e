//! CLI command implementations.

pub mod customer;
pub mod migrate;
pub mod seed;

use sqlx::PgPool;
use thiserror::Error;

use corner_shop_api::config::{ConfigError, ShopConfig};
use corner_shop_api::db::{self, RepositoryError};
use corner_shop_api::services::AuthError;
use corner_shop_core::{EmailError, PriceError};

/// The CLI runs one command at a time; a couple of connections is plenty.
const CLI_MAX_CONNECTIONS: u32 = 2;

/// Errors that can occur while running a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Shared shop configuration is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Database connection or query error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Repository operation failed.
    #[error("{0}")]
    Repository(#[from] RepositoryError),

    /// Password validation or hashing failed.
    #[error("{0}")]
    Auth(#[from] AuthError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    /// Invalid price.
    #[error("Invalid price: {0}")]
    Price(#[from] PriceError),
}

/// Load the same configuration the API server uses (including `.env`).
pub fn load_config() -> Result<ShopConfig, CliError> {
    Ok(ShopConfig::from_env()?)
}

/// Connect to the shop database named in `config`.
pub async fn connect(config: &ShopConfig) -> Result<PgPool, CliError> {
    tracing::info!("Connecting to shop database...");
    Ok(db::create_pool(
        &config.database_url,
        config.max_connections.min(CLI_MAX_CONNECTIONS),
    )
    .await?)
}
