//! Corner Shop CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! shop-cli migrate
//!
//! # Load the demo catalogue and demo customer
//! shop-cli seed
//!
//! # Create a customer (password read from SHOP_NEW_CUSTOMER_PASSWORD)
//! SHOP_NEW_CUSTOMER_PASSWORD=... shop-cli customer create \
//!     -e malee@example.com -f Malee -l Srisuk -a "12 Soi Ari, Bangkok"
//! ```
//!
//! All commands connect to `SHOP_DATABASE_URL` (falls back to `DATABASE_URL`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "shop-cli")]
#[command(author, version, about = "Corner Shop CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Insert demo products and a demo customer (skips existing rows)
    Seed,
    /// Manage customers
    Customer {
        #[command(subcommand)]
        action: CustomerAction,
    },
}

#[derive(Subcommand)]
enum CustomerAction {
    /// Create a new customer
    Create {
        /// Login email address
        #[arg(short, long)]
        email: String,

        /// Given name
        #[arg(short, long)]
        first_name: String,

        /// Family name
        #[arg(short, long)]
        last_name: String,

        /// Contact phone number
        #[arg(short, long, default_value = "")]
        phone: String,

        /// Delivery address
        #[arg(short, long, default_value = "")]
        address: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed => commands::seed::run().await?,
        Commands::Customer { action } => match action {
            CustomerAction::Create {
                email,
                first_name,
                last_name,
                phone,
                address,
            } => {
                commands::customer::create(commands::customer::CreateCustomer {
                    email,
                    first_name,
                    last_name,
                    phone,
                    address,
                })
                .await?;
            }
        },
    }
    Ok(())
}
