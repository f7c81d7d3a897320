mod db;
mod query;
mod seed;

#[cfg(test)]
mod tests;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use medfind_core::AppConfig;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "medfind-cli")]
#[command(about = "Pharmacy locator and medicine availability command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance and bulk loading
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// List pharmacies near a position, nearest first
    Nearby {
        /// Requester latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lat: Option<f64>,
        /// Requester longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true)]
        lng: Option<f64>,
    },
    /// Find medicines by name and the pharmacies that list them
    Search {
        /// Case-insensitive substring of the medicine name
        query: String,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check that the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
    /// Replace table contents from local dataset files
    Seed {
        #[command(subcommand)]
        command: SeedCommands,
    },
}

#[derive(Debug, Subcommand)]
enum SeedCommands {
    /// Replace all pharmacies from the JSON dataset
    Pharmacies {
        /// Pharmacy dataset (defaults to `MEDFIND_PHARMACIES_PATH`)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Name-keyed image overrides (defaults to `MEDFIND_IMAGE_OVERRIDES_PATH`)
        #[arg(long)]
        overrides: Option<PathBuf>,
        /// Web root used to check that every image path exists
        #[arg(long)]
        public_dir: Option<PathBuf>,
        /// Validate and print without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
    /// Replace the medicine list and generate stock for every pharmacy
    Stock {
        /// Medicine catalog (defaults to `MEDFIND_CATALOG_PATH`)
        #[arg(long)]
        catalog: Option<PathBuf>,
        /// Seed for quantity and price generation, for repeatable loads
        #[arg(long)]
        seed: Option<u64>,
        /// Print the generated stock without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        println!("medfind-cli ready; run with --help for commands");
        return Ok(());
    };

    let config = medfind_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Db { command } => run_db_command(&config, command).await,
        Commands::Nearby { lat, lng } => {
            let pool = connect(&config).await?;
            query::run_nearby(&pool, &config, lat, lng).await
        }
        Commands::Search { query } => {
            let pool = connect(&config).await?;
            query::run_search(&pool, &query).await
        }
    }
}

async fn run_db_command(config: &AppConfig, command: DbCommands) -> anyhow::Result<()> {
    match command {
        DbCommands::Ping => {
            let pool = connect(config).await?;
            db::run_db_ping(&pool).await
        }
        DbCommands::Migrate => {
            let pool = connect(config).await?;
            db::run_db_migrate(&pool).await
        }
        DbCommands::Seed {
            command:
                SeedCommands::Pharmacies {
                    file,
                    overrides,
                    public_dir,
                    dry_run,
                },
        } => {
            let paths = seed::PharmacySeedPaths {
                file: file.unwrap_or_else(|| config.pharmacies_path.clone()),
                overrides: overrides.unwrap_or_else(|| config.image_overrides_path.clone()),
                public_dir,
            };
            if dry_run {
                seed::run_seed_pharmacies(None, &paths).await
            } else {
                let pool = connect(config).await?;
                seed::run_seed_pharmacies(Some(&pool), &paths).await
            }
        }
        DbCommands::Seed {
            command:
                SeedCommands::Stock {
                    catalog,
                    seed,
                    dry_run,
                },
        } => {
            let pool = connect(config).await?;
            let catalog = catalog.unwrap_or_else(|| config.catalog_path.clone());
            seed::run_seed_stock(&pool, &catalog, seed, dry_run).await
        }
    }
}

async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = medfind_db::PoolConfig::from_app_config(config);
    let pool = medfind_db::connect_pool(&config.database_url, pool_config).await?;
    Ok(pool)
}
