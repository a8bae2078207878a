//! Historical baseline loader.
//!
//! Reads the published CSV of past draws and maps its columns onto the
//! canonical record fields. Any failure yields an empty baseline.

use std::sync::{Arc, LazyLock};

use regex::Regex;

use crate::error::{AppError, Result};
use crate::models::{DrawRecord, HistoricalConfig, RawDraw};
use crate::utils::date::parse_draw_date;
use crate::utils::http::PageFetcher;
use crate::utils::retry::RetryPolicy;

/// Canonical field a source column feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Date,
    FirstPrize,
    LastTwoDigits,
    PrizePre3Digit,
    PrizeSuf3Digit,
}

/// Source column name to canonical field.
const RENAME_TABLE: [(&str, Field); 5] = [
    ("date", Field::Date),
    ("prize_1st", Field::FirstPrize),
    ("prize_2digits", Field::LastTwoDigits),
    ("prize_pre_3digit", Field::PrizePre3Digit),
    ("prize_sub_3digits", Field::PrizeSuf3Digit),
];

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("static regex is valid"));

/// Loads the historical dataset.
pub struct HistoricalLoader {
    fetcher: Arc<dyn PageFetcher>,
    config: HistoricalConfig,
    retry: RetryPolicy,
}

impl HistoricalLoader {
    pub fn new(
        config: HistoricalConfig,
        fetcher: Arc<dyn PageFetcher>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            fetcher,
            config,
            retry,
        }
    }

    /// Fetch and parse the baseline. Never fails; problems give an empty set.
    pub async fn load(&self) -> Vec<DrawRecord> {
        if !self.config.enabled {
            log::info!("Historical source disabled");
            return Vec::new();
        }

        log::info!("Loading historical data from {}", self.config.url);
        let url = self.config.url.as_str();
        let body = match self
            .retry
            .run("historical data", |_| self.fetcher.fetch_text(url))
            .await
        {
            Ok(body) => body,
            Err(e) => {
                log::warn!("Historical source unavailable: {}", e);
                return Vec::new();
            }
        };

        match parse_historical_csv(&body) {
            Ok(records) => {
                log::info!("Loaded {} historical draws", records.len());
                records
            }
            Err(e) => {
                log::warn!("Historical data unreadable: {}", e);
                Vec::new()
            }
        }
    }
}

/// Parse the baseline CSV. Unknown columns are ignored; rows with a bad date
/// or missing required prizes are dropped.
pub fn parse_historical_csv(content: &str) -> Result<Vec<DrawRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let columns: Vec<Option<Field>> = reader
        .headers()?
        .iter()
        .map(|name| {
            let name = name.trim_start_matches('\u{feff}');
            RENAME_TABLE
                .iter()
                .find(|(source, _)| source.eq_ignore_ascii_case(name))
                .map(|(_, field)| *field)
        })
        .collect();

    if !columns.contains(&Some(Field::Date)) {
        return Err(AppError::parse("historical csv", "no date column"));
    }

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for row in reader.records() {
        let row = row?;
        let mut raw = RawDraw::default();

        for (cell, field) in row.iter().zip(&columns) {
            match field {
                Some(Field::Date) => raw.date = parse_draw_date(cell),
                Some(Field::FirstPrize) => raw.first_prize = non_empty(cell),
                Some(Field::LastTwoDigits) => raw.last_two_digits = non_empty(cell),
                Some(Field::PrizePre3Digit) => raw.prize_pre_3digit = digit_runs(cell),
                Some(Field::PrizeSuf3Digit) => raw.prize_suf_3digit = digit_runs(cell),
                None => {}
            }
        }

        match DrawRecord::try_from(raw) {
            Ok(record) => records.push(record),
            Err(e) => {
                dropped += 1;
                log::debug!("Dropping historical row {:?}: {}", row.position(), e);
            }
        }
    }

    if dropped > 0 {
        log::warn!("Dropped {} unusable historical rows", dropped);
    }
    Ok(records)
}

fn non_empty(cell: &str) -> Option<String> {
    let cell = cell.trim();
    (!cell.is_empty()).then(|| cell.to_string())
}

/// Every run of digits in a cell, so list-like renderings all parse.
fn digit_runs(cell: &str) -> Vec<String> {
    DIGIT_RUN
        .find_iter(cell)
        .map(|m| m.as_str().to_string())
        .collect()
}
