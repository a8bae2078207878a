// src/services/results.rs

//! Draw result scraper service.
//!
//! Fetches one result page per draw date, one date at a time, with a
//! randomized pause between dates.

use std::sync::Arc;

use chrono::NaiveDate;

use crate::error::Result;
use crate::models::{Config, DrawRecord};
use crate::services::parse::ResultPageParser;
use crate::utils::date::buddhist_date_code;
use crate::utils::http::PageFetcher;
use crate::utils::join_segment;
use crate::utils::retry::{Jitter, RetryPolicy};

/// Summary of a batch run.
#[derive(Debug, Default)]
pub struct ScrapeOutcome {
    pub records: Vec<DrawRecord>,
    pub requested: usize,
    pub missing: Vec<NaiveDate>,
}

/// Service for scraping draw results from the live source.
pub struct ResultScraper {
    fetcher: Arc<dyn PageFetcher>,
    parser: ResultPageParser,
    base_url: String,
    retry: RetryPolicy,
    request_delay: Jitter,
}

impl ResultScraper {
    /// Create a scraper with the given configuration and transport.
    pub fn new(config: &Config, fetcher: Arc<dyn PageFetcher>) -> Result<Self> {
        Ok(Self {
            fetcher,
            parser: ResultPageParser::new(&config.source)?,
            base_url: config.source.base_url.clone(),
            retry: RetryPolicy::from_config(&config.crawler),
            request_delay: Jitter::new(
                config.crawler.request_delay_min_ms,
                config.crawler.request_delay_max_ms,
            ),
        })
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Replace the pause between consecutive dates.
    pub fn with_request_delay(mut self, delay: Jitter) -> Self {
        self.request_delay = delay;
        self
    }

    /// Result page URL for a draw date.
    pub fn draw_url(&self, date: NaiveDate) -> Result<String> {
        Ok(join_segment(&self.base_url, &buddhist_date_code(date))?)
    }

    /// Fetch one draw. `None` means the draw could not be obtained complete
    /// within the retry budget.
    pub async fn fetch_draw(&self, date: NaiveDate) -> Option<DrawRecord> {
        let url = match self.draw_url(date) {
            Ok(url) => url,
            Err(e) => {
                log::warn!("Cannot build result URL for {}: {}", date, e);
                return None;
            }
        };

        let context = format!("draw {date}");
        match self
            .retry
            .run(&context, |_| self.attempt(&url, date))
            .await
        {
            Ok(record) => Some(record),
            Err(e) => {
                log::warn!("No result for {}: {}", date, e);
                None
            }
        }
    }

    /// One fetch-parse-validate round. Every failure counts as a failed attempt.
    async fn attempt(&self, url: &str, date: NaiveDate) -> Result<DrawRecord> {
        let html = self.fetcher.fetch_text(url).await?;
        let raw = self.parser.parse(&html, date);
        DrawRecord::try_from(raw)
    }

    /// Fetch every date in order, pausing between dates.
    pub async fn fetch_dates(&self, dates: &[NaiveDate]) -> ScrapeOutcome {
        let mut outcome = ScrapeOutcome {
            requested: dates.len(),
            ..ScrapeOutcome::default()
        };

        for (i, &date) in dates.iter().enumerate() {
            log::info!(
                "[{}/{}] Fetching {}",
                i + 1,
                dates.len(),
                date.format("%d/%m/%Y")
            );

            match self.fetch_draw(date).await {
                Some(record) => {
                    log::info!(
                        "    {} -> {} | {}",
                        record.date_string(),
                        record.first_prize,
                        record.last_two_digits
                    );
                    outcome.records.push(record);
                }
                None => {
                    log::warn!("    {} -> not found", date);
                    outcome.missing.push(date);
                }
            }

            if i + 1 < dates.len() {
                self.request_delay.pause().await;
            }
        }

        outcome
    }
}
