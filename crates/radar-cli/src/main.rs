mod seed;

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use radar_core::{AppConfig, LocationQuery, SearchMode, SearchService};
use radar_db::PgRecordStore;
use radar_summarizer::ChatSummarizer;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "radar-cli")]
#[command(about = "Restroom Radar command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Search for restrooms near a point and print the groups as JSON
    Search {
        /// Latitude of the starting point
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude of the starting point (e.g., -72.528)
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        /// Search radius in miles (defaults to DEFAULT_RADIUS_MILES)
        #[arg(long)]
        radius: Option<f64>,
        /// Use generated summaries and building grouping
        #[arg(long)]
        enriched: bool,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Apply pending migrations
    Migrate,
    /// Check that the database answers
    Ping,
    /// Replace the restrooms table with the contents of a geocoded CSV
    Seed {
        /// Path to the geocoded dataset
        #[arg(long)]
        file: PathBuf,
        /// Parse and report without writing to the database
        #[arg(long)]
        dry_run: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("radar-cli ready; run with --help for commands");
        return Ok(());
    };

    let config = radar_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Db { command } => run_db(&config, command).await,
        Commands::Search {
            lat,
            lon,
            radius,
            enriched,
        } => {
            let mode = if enriched {
                SearchMode::Enriched
            } else {
                SearchMode::Fast
            };
            run_search(&config, lat, lon, radius, mode).await
        }
    }
}

async fn connect(config: &AppConfig) -> anyhow::Result<sqlx::PgPool> {
    let pool_config = radar_db::PoolConfig::from_app_config(config);
    radar_db::connect_pool(&config.database_url, pool_config)
        .await
        .context("failed to connect to DATABASE_URL")
}

async fn run_db(config: &AppConfig, command: DbCommands) -> anyhow::Result<()> {
    match command {
        DbCommands::Migrate => {
            let pool = connect(config).await?;
            let applied = radar_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        DbCommands::Ping => {
            let pool = connect(config).await?;
            radar_db::health_check(&pool).await?;
            let total = radar_db::count_restrooms(&pool).await?;
            println!("database ok ({total} restrooms)");
        }
        DbCommands::Seed { file, dry_run } => {
            let restrooms = seed::load_seed_file(&file)?;
            let outside = restrooms.iter().filter(|r| !r.within_campus_bbox).count();
            tracing::info!(
                path = %file.display(),
                rows = restrooms.len(),
                outside_campus = outside,
                "parsed seed file"
            );

            if dry_run {
                println!(
                    "dry-run: would insert {} restrooms ({outside} outside campus)",
                    restrooms.len()
                );
                return Ok(());
            }

            let pool = radar_db::connect_and_migrate(config).await?;
            let inserted = radar_db::replace_all_restrooms(&pool, &restrooms).await?;
            println!("inserted {inserted} restrooms");
        }
    }
    Ok(())
}

async fn run_search(
    config: &AppConfig,
    lat: f64,
    lon: f64,
    radius: Option<f64>,
    mode: SearchMode,
) -> anyhow::Result<()> {
    let query = LocationQuery::with_default_radius(lat, lon, radius, config.default_radius_miles)?;

    let summarizer = match (mode, config.openai_api_key.as_deref()) {
        (SearchMode::Enriched, Some(key)) => Some(ChatSummarizer::with_base_url(
            key,
            &config.summarizer_model,
            config.summarizer_timeout_secs,
            &config.summarizer_base_url,
        )?),
        (SearchMode::Enriched, None) => {
            tracing::warn!("OPENAI_API_KEY not set; using local summaries");
            None
        }
        (SearchMode::Fast, _) => None,
    };

    let pool = connect(config).await?;
    let service = SearchService::with_generator(PgRecordStore::new(pool), summarizer);
    let groups = service.search(&query, mode).await?;

    println!("{}", serde_json::to_string_pretty(&groups)?);
    Ok(())
}
