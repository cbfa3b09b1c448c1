//! yamweb CLI - operator tools for the food-ordering backend.
//!
//! # Usage
//!
//! ```bash
//! # Load food items from a YAML file
//! yamweb-cli seed foods data/foods.yaml
//!
//! # Replace every existing food item with the file's contents
//! yamweb-cli seed foods data/foods.yaml --clear
//!
//! # Show collection sizes
//! yamweb-cli stats
//! ```
//!
//! Reads the same `MONGODB_URI` (or `DB_USER`/`DB_PASSWORD`/`DB_HOST`) and
//! `DB_NAME` variables as the server.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "yamweb-cli")]
#[command(author, version, about = "yamweb operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the database
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Show collection statistics
    Stats,
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Insert food items from a YAML list
    Foods {
        /// Path to the YAML file
        file: String,

        /// Delete all existing food items first
        #[arg(long)]
        clear: bool,
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
        Commands::Seed { target } => match target {
            SeedTarget::Foods { file, clear } => commands::seed::foods(&file, clear).await?,
        },
        Commands::Stats => commands::stats::show().await?,
    }
    Ok(())
}
