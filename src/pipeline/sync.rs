// src/pipeline/sync.rs

//! Full sync: calendar → scrape → historical → reconcile → guarded replace.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};

use crate::error::Result;
use crate::models::{Config, DrawTable};
use crate::pipeline::circuit_breaker::{CircuitBreaker, CircuitBreakerConfig};
use crate::pipeline::diff::{TableDiff, calculate_diff};
use crate::pipeline::reconcile::reconcile_table;
use crate::services::{DrawCalendar, HistoricalLoader, ResultScraper};
use crate::storage::{TableStore, WriteMetadata};
use crate::utils::http::PageFetcher;
use crate::utils::retry::RetryPolicy;

/// Per-run switches.
#[derive(Debug, Clone, Copy)]
pub struct SyncOptions {
    /// Calendar year whose draws are scraped
    pub year: i32,
    /// Draw dates after this day are not requested
    pub today: NaiveDate,
    /// Build and compare the table but do not write it
    pub dry_run: bool,
    /// Write even if the row count dropped sharply
    pub force: bool,
}

/// What one run did.
#[derive(Debug)]
pub struct SyncSummary {
    pub requested: usize,
    pub scraped: usize,
    pub missing: Vec<NaiveDate>,
    pub historical: usize,
    pub rows: usize,
    pub diff: TableDiff,
    /// `None` on a dry run
    pub written: Option<WriteMetadata>,
}

/// Run one sync against `store`.
pub async fn run_sync(
    config: &Config,
    fetcher: Arc<dyn PageFetcher>,
    store: &dyn TableStore,
    options: SyncOptions,
) -> Result<SyncSummary> {
    let start_time = Utc::now();
    log::info!("Sync starting for {} (today {})", options.year, options.today);

    // Step 1: target dates
    let dates = DrawCalendar::new(config.calendar.clone()).draw_dates(options.year, options.today);
    log::info!("Step 1/4: {} draw dates due in {}", dates.len(), options.year);

    // Step 2: live results
    log::info!("Step 2/4: Scraping results...");
    let scraper = ResultScraper::new(config, Arc::clone(&fetcher))?;
    let outcome = scraper.fetch_dates(&dates).await;
    log::info!(
        "Scraped {}/{} draws ({} missing)",
        outcome.records.len(),
        outcome.requested,
        outcome.missing.len()
    );

    // Step 3: baseline
    log::info!("Step 3/4: Loading historical data...");
    let loader = HistoricalLoader::new(
        config.historical.clone(),
        fetcher,
        RetryPolicy::from_config(&config.crawler),
    );
    let historical = loader.load().await;
    let historical_count = historical.len();
    let scraped_count = outcome.records.len();

    // Step 4: reconcile and replace
    log::info!("Step 4/4: Reconciling and writing...");
    let table = reconcile_table(historical, outcome.records, &config.output.placeholder);

    let previous = store.load_table().await?.unwrap_or_else(DrawTable::empty);
    CircuitBreaker::with_config(CircuitBreakerConfig::from(&config.storage)).validate(
        table.len(),
        previous.len(),
        options.force,
    )?;

    let diff = calculate_diff(&previous, &table);
    if diff.has_changes() {
        log::info!(
            "{} changes: +{} added, ~{} updated, -{} removed",
            diff.change_count(),
            diff.added.len(),
            diff.updated.len(),
            diff.removed.len()
        );
    } else {
        log::info!("No changes against the stored table");
    }
    for date in &diff.updated {
        log::debug!("  updated {}", date);
    }

    let written = if options.dry_run {
        log::info!("Dry run: {} rows not written", table.len());
        None
    } else {
        Some(store.replace_table(&table).await?)
    };

    let elapsed = Utc::now() - start_time;
    log::info!(
        "Sync complete: {} rows in {}.{:03}s",
        table.len(),
        elapsed.num_seconds(),
        elapsed.num_milliseconds() % 1000
    );

    Ok(SyncSummary {
        requested: outcome.requested,
        scraped: scraped_count,
        missing: outcome.missing,
        historical: historical_count,
        rows: table.len(),
        diff,
        written,
    })
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::error::AppError;
    use crate::services::parse::fixtures::result_page;
    use crate::storage::LocalStorage;
    use crate::utils::http::testing::ScriptedFetcher;

    const HISTORICAL_URL: &str = "https://example.com/lotto.csv";
    const URL_0102: &str = "https://news.sanook.com/lotto/check/02012567/";
    const URL_0117: &str = "https://news.sanook.com/lotto/check/17012567/";

    const BASELINE: &str = "\
date,prize_1st,prize_2digits,prize_pre_3digit,prize_sub_3digits
2023-12-30,111111,11,\"[100, 200]\",\"[300, 400]\"
2024-01-02,222222,22,,
";

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_config() -> Config {
        let mut config = Config::default();
        config.crawler.max_attempts = 1;
        config.crawler.retry_delay_min_ms = 0;
        config.crawler.retry_delay_max_ms = 0;
        config.crawler.request_delay_min_ms = 0;
        config.crawler.request_delay_max_ms = 0;
        config.historical.url = HISTORICAL_URL.to_string();
        config
    }

    fn options(dry_run: bool) -> SyncOptions {
        SyncOptions {
            year: 2024,
            today: ymd(2024, 1, 20),
            dry_run,
            force: false,
        }
    }

    fn full_fetcher() -> Arc<ScriptedFetcher> {
        Arc::new(
            ScriptedFetcher::new()
                .reply(URL_0102, &result_page("654321", "07"))
                .reply(URL_0117, &result_page("123456", "45"))
                .reply(HISTORICAL_URL, BASELINE),
        )
    }

    #[tokio::test]
    async fn test_sync_merges_and_writes() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStorage::new(tmp.path());

        let summary = run_sync(&test_config(), full_fetcher(), &store, options(false))
            .await
            .unwrap();

        assert_eq!(summary.requested, 2);
        assert_eq!(summary.scraped, 2);
        assert_eq!(summary.historical, 2);
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.diff.added.len(), 3);
        assert_eq!(summary.diff.change_count(), 3);
        assert!(summary.written.is_some());

        let table = store.load_table().await.unwrap().unwrap();
        assert_eq!(
            table.column("date"),
            vec!["2024-01-17", "2024-01-02", "2023-12-30"]
        );
        // Scraped draw replaces the baseline row for the same date
        assert_eq!(table.column("first_prize")[1], "654321");
        assert_eq!(table.column("prize_suf_3digit")[2], "300, 400");
    }

    #[tokio::test]
    async fn test_rerun_with_same_data_has_no_changes() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStorage::new(tmp.path());

        run_sync(&test_config(), full_fetcher(), &store, options(false))
            .await
            .unwrap();
        let summary = run_sync(&test_config(), full_fetcher(), &store, options(false))
            .await
            .unwrap();

        assert!(!summary.diff.has_changes());
        assert_eq!(summary.rows, 3);
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStorage::new(tmp.path());

        let summary = run_sync(&test_config(), full_fetcher(), &store, options(true))
            .await
            .unwrap();

        assert_eq!(summary.rows, 3);
        assert!(summary.written.is_none());
        assert!(store.load_table().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_missing_draw_keeps_baseline() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStorage::new(tmp.path());
        let fetcher = Arc::new(
            ScriptedFetcher::new()
                .reply(URL_0117, &result_page("123456", "45"))
                .reply(HISTORICAL_URL, BASELINE),
        );

        let summary = run_sync(&test_config(), fetcher, &store, options(false))
            .await
            .unwrap();

        assert_eq!(summary.missing, vec![ymd(2024, 1, 2)]);
        let table = store.load_table().await.unwrap().unwrap();
        assert_eq!(table.column("first_prize")[1], "222222");
    }

    #[tokio::test]
    async fn test_nothing_available_refuses_to_write() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStorage::new(tmp.path());

        let result = run_sync(
            &test_config(),
            Arc::new(ScriptedFetcher::new()),
            &store,
            options(false),
        )
        .await;

        assert!(matches!(result, Err(AppError::EmptyDataset)));
        assert!(store.load_table().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_sharp_drop_needs_force() {
        let tmp = TempDir::new().unwrap();
        let store = LocalStorage::new(tmp.path());

        let mut big = DrawTable::empty();
        big.rows = (1..=20)
            .map(|d| {
                vec![
                    format!("2020-01-{d:02}"),
                    "000000".into(),
                    "00".into(),
                    "-".into(),
                    "-".into(),
                ]
            })
            .collect();
        store.replace_table(&big).await.unwrap();

        let result = run_sync(&test_config(), full_fetcher(), &store, options(false)).await;
        assert!(matches!(result, Err(AppError::CircuitBreakerTriggered { .. })));
        assert_eq!(store.load_table().await.unwrap().unwrap().len(), 20);

        let forced = SyncOptions {
            force: true,
            ..options(false)
        };
        let summary = run_sync(&test_config(), full_fetcher(), &store, forced)
            .await
            .unwrap();
        assert_eq!(summary.diff.removed.len(), 20);
        assert_eq!(store.load_table().await.unwrap().unwrap().len(), 3);
    }
}
