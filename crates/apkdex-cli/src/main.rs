//! apkdex - catalog manager for F-Droid style app repositories.

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;

#[derive(Parser)]
#[command(name = "apkdex")]
#[command(author, version, about = "Sync app repository indexes and resolve installable APKs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Update the indexes of all enabled repositories
    Update,
    /// List all apps in the merged catalog
    List,
    /// Search apps by keyword
    Search {
        /// Search terms; an app matches when one of its text fields
        /// contains all of them
        #[arg(required = true)]
        terms: Vec<String>,
    },
    /// Show detailed information about apps
    Show {
        /// Package name(s)
        #[arg(required = true)]
        packages: Vec<String>,
    },
    /// Pick the variant to install for a device
    Suggest {
        /// Package name
        package: String,
        /// Device ABI, repeatable, most preferred first
        #[arg(long = "abi")]
        abis: Vec<String>,
        /// Device API level
        #[arg(long)]
        api_level: Option<i32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Update => cmd::update::run().await,
        Commands::List => cmd::list::run(),
        Commands::Search { terms } => cmd::search::run(&terms),
        Commands::Show { packages } => cmd::show::run(&packages),
        Commands::Suggest {
            package,
            abis,
            api_level,
        } => cmd::suggest::run(&package, abis, api_level),
    }
}
