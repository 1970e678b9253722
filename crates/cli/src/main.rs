//! Bazaar CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! bazaar-cli migrate
//!
//! # Seed the catalog from a YAML file
//! bazaar-cli seed -f crates/cli/data/catalog.yaml
//!
//! # Create a seller account
//! bazaar-cli seller create -u storefront1 -p 'secret-password' -e seller@example.com
//!
//! # Promote an existing buyer to seller
//! bazaar-cli seller promote -u priya
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed` - Seed the catalog with products from YAML
//! - `seller create` / `seller promote` - Manage seller accounts

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bazaar-cli")]
#[command(author, version, about = "Bazaar CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the catalog from a YAML file
    Seed {
        /// Path to the YAML catalog file
        #[arg(short, long, default_value = "crates/cli/data/catalog.yaml")]
        file: String,
    },
    /// Manage seller accounts
    Seller {
        #[command(subcommand)]
        action: SellerAction,
    },
}

#[derive(Subcommand)]
enum SellerAction {
    /// Create a new seller account
    Create {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Password (min 6 characters)
        #[arg(short, long)]
        password: String,

        /// Contact email
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Promote an existing user to the seller role
    Promote {
        /// Username
        #[arg(short, long)]
        username: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file } => commands::seed::catalog(&file).await?,
        Commands::Seller { action } => match action {
            SellerAction::Create {
                username,
                password,
                email,
            } => {
                commands::seller::create(&username, email.as_deref(), &password).await?;
            }
            SellerAction::Promote { username } => {
                commands::seller::promote(&username).await?;
            }
        },
    }
    Ok(())
}
