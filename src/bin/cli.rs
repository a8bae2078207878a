//! Lottery results sync CLI
//!
//! Local execution entry point.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Datelike;
use clap::{Parser, Subcommand};
use lotto_sync::{
    error::{AppError, Result},
    models::Config,
    pipeline::{self, SyncOptions},
    services::{DrawCalendar, DrawStats, ResultScraper},
    storage::{LocalStorage, TableStore},
    utils::{
        date::{format_date, parse_draw_date, today_at_offset},
        http::HttpFetcher,
    },
};

/// lotto-sync - Thai lottery results sync
#[derive(Parser, Debug)]
#[command(
    name = "lotto-sync",
    version,
    about = "Scrape, reconcile and store Thai lottery draw results"
)]
struct Cli {
    /// Path to storage directory containing config and the results table
    #[arg(short, long, default_value = "storage")]
    storage_dir: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape this year's draws, merge with history and replace the table
    Sync {
        /// Year to scrape (default: current year)
        #[arg(long)]
        year: Option<i32>,

        /// Build and compare the table without writing it
        #[arg(long)]
        dry_run: bool,

        /// Write even if the row count dropped sharply
        #[arg(long)]
        force: bool,
    },

    /// List the draw dates already due in a year
    Dates {
        #[arg(long)]
        year: Option<i32>,
    },

    /// Fetch a single draw
    Fetch {
        /// Draw date, YYYY-MM-DD
        date: String,
    },

    /// Number frequencies over the stored table
    Stats {
        /// How many numbers to list
        #[arg(long, default_value_t = 5)]
        top: usize,

        /// Break results down by weekday
        #[arg(long)]
        weekday: bool,
    },

    /// Validate configuration files
    Validate,

    /// Show current snapshot info
    Info,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("lotto-sync starting...");

    // Load configurations
    let config_path = cli.storage_dir.join("config.toml");
    let config = Config::load_or_default(&config_path);

    log::info!("Loaded configuration from {}", cli.storage_dir.display());

    let storage = LocalStorage::new(&cli.storage_dir);
    let today = today_at_offset(config.crawler.utc_offset_hours);

    match cli.command {
        Command::Sync {
            year,
            dry_run,
            force,
        } => {
            config.validate()?;
            let fetcher = Arc::new(HttpFetcher::from_config(&config.crawler)?);
            let options = SyncOptions {
                year: year.unwrap_or(today.year()),
                today,
                dry_run,
                force,
            };

            let summary = pipeline::run_sync(&config, fetcher, &storage, options).await?;

            log::info!(
                "Scraped {}/{} draws, {} historical, {} rows total",
                summary.scraped,
                summary.requested,
                summary.historical,
                summary.rows
            );
            if !summary.missing.is_empty() {
                let missing: Vec<String> =
                    summary.missing.iter().map(|d| format_date(*d)).collect();
                log::warn!("Not found: {}", missing.join(", "));
            }
            if let Some(written) = summary.written {
                log::info!("Table saved to {}", written.location);
            }
        }

        Command::Dates { year } => {
            let year = year.unwrap_or(today.year());
            let dates = DrawCalendar::new(config.calendar.clone()).draw_dates(year, today);
            log::info!("{} draw dates due in {}", dates.len(), year);
            for date in dates {
                println!("{}", format_date(date));
            }
        }

        Command::Fetch { date } => {
            let date = parse_draw_date(&date)
                .ok_or_else(|| AppError::validation(format!("Invalid date: {date}")))?;
            let fetcher = Arc::new(HttpFetcher::from_config(&config.crawler)?);
            let scraper = ResultScraper::new(&config, fetcher)?;

            match scraper.fetch_draw(date).await {
                Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
                None => {
                    log::error!("No complete result for {}", format_date(date));
                    return Err(AppError::validation("Draw not available"));
                }
            }
        }

        Command::Stats { top, weekday } => {
            let Some(table) = storage.load_table().await? else {
                log::error!("No table found. Run 'sync' first.");
                return Err(AppError::config("Results table not found"));
            };
            let stats = DrawStats::new(&table);

            let ranked = stats.frequency_top(top);
            println!("Top {} last-two-digit numbers over {} draws:", top, table.len());
            for f in &ranked {
                println!("  {}  x{:<4} {:.2}%", f.number, f.count, f.probability);
            }

            println!("Draws since last seen:");
            for o in stats.overdue(&ranked) {
                println!("  {}  {}", o.number, o.draws_ago);
            }

            if weekday {
                for day in stats.by_weekday(top) {
                    println!("{} ({} draws):", day.weekday, day.draws);
                    for f in &day.top {
                        println!("  {}  x{:<4} {:.2}%", f.number, f.count, f.probability);
                    }
                }
            }
        }

        Command::Validate => {
            log::info!("Validating configuration...");

            if let Err(e) = config.validate() {
                log::error!("Config validation failed: {}", e);
                return Err(e);
            }
            log::info!("✓ Config OK (crawler, source, calendar and storage settings)");

            log::info!("All validations passed!");
        }

        Command::Info => {
            log::info!("Storage directory: {}", cli.storage_dir.display());

            match storage.snapshot_info().await? {
                Some(info) => {
                    log::info!("Rows: {}", info.rows);
                    log::info!("Last updated: {}", info.updated_at);
                    log::info!("SHA-256: {}", info.sha256);
                }
                None => log::info!("No snapshot found yet."),
            }
        }
    }

    log::info!("Done!");

    Ok(())
}
