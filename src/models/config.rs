//! Application configuration structures.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// HTTP, retry and pacing settings
    #[serde(default)]
    pub crawler: CrawlerConfig,

    /// Live results page location and extraction rules
    #[serde(default)]
    pub source: SourceConfig,

    /// Historical baseline file
    #[serde(default)]
    pub historical: HistoricalConfig,

    /// Draw calendar rules
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Output table rendering
    #[serde(default)]
    pub output: OutputConfig,

    /// Store write guard
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        let crawler = &self.crawler;
        if crawler.user_agent.trim().is_empty() {
            return Err(AppError::validation("crawler.user_agent is empty"));
        }
        if crawler.timeout_secs == 0 {
            return Err(AppError::validation("crawler.timeout_secs must be > 0"));
        }
        if crawler.max_attempts == 0 {
            return Err(AppError::validation("crawler.max_attempts must be > 0"));
        }
        if crawler.retry_delay_min_ms > crawler.retry_delay_max_ms {
            return Err(AppError::validation(
                "crawler.retry_delay_min_ms must not exceed retry_delay_max_ms",
            ));
        }
        if crawler.request_delay_min_ms > crawler.request_delay_max_ms {
            return Err(AppError::validation(
                "crawler.request_delay_min_ms must not exceed request_delay_max_ms",
            ));
        }
        if !(-12..=14).contains(&crawler.utc_offset_hours) {
            return Err(AppError::validation(
                "crawler.utc_offset_hours must be within -12..=14",
            ));
        }

        url::Url::parse(&self.source.base_url)?;
        if self.historical.enabled {
            url::Url::parse(&self.historical.url)?;
        }

        self.calendar.validate()?;
        Ok(())
    }
}

/// HTTP client, retry and pacing settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlerConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Per-attempt request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Attempts per request, first try included
    #[serde(default = "defaults::max_attempts")]
    pub max_attempts: u32,

    /// Backoff window between attempts, scaled by the attempt number
    #[serde(default = "defaults::delay_min")]
    pub retry_delay_min_ms: u64,
    #[serde(default = "defaults::delay_max")]
    pub retry_delay_max_ms: u64,

    /// Politeness window between consecutive draw dates
    #[serde(default = "defaults::delay_min")]
    pub request_delay_min_ms: u64,
    #[serde(default = "defaults::delay_max")]
    pub request_delay_max_ms: u64,

    /// Offset used to decide what "today" is
    #[serde(default = "defaults::utc_offset")]
    pub utc_offset_hours: i32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            max_attempts: defaults::max_attempts(),
            retry_delay_min_ms: defaults::delay_min(),
            retry_delay_max_ms: defaults::delay_max(),
            request_delay_min_ms: defaults::delay_min(),
            request_delay_max_ms: defaults::delay_max(),
            utc_offset_hours: defaults::utc_offset(),
        }
    }
}

/// Where the per-draw result pages live and how to read them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Prefix the `ddmmyyyy` Buddhist-era code is appended to
    #[serde(default = "defaults::source_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub selectors: PageSelectors,

    #[serde(default)]
    pub labels: RewardLabels,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::source_base_url(),
            selectors: PageSelectors::default(),
            labels: RewardLabels::default(),
        }
    }
}

/// CSS selectors for the result page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSelectors {
    /// Element holding the first prize directly
    #[serde(default = "defaults::first_prize_selector")]
    pub first_prize: String,

    /// One labeled reward section
    #[serde(default = "defaults::column_selector")]
    pub column: String,

    /// Label inside a reward section
    #[serde(default = "defaults::label_selector")]
    pub label: String,

    /// Numbers inside a reward section
    #[serde(default = "defaults::number_selector")]
    pub number: String,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            first_prize: defaults::first_prize_selector(),
            column: defaults::column_selector(),
            label: defaults::label_selector(),
            number: defaults::number_selector(),
        }
    }
}

/// Label substrings identifying each reward section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardLabels {
    #[serde(default = "defaults::label_first_prize")]
    pub first_prize: String,
    #[serde(default = "defaults::label_last_two")]
    pub last_two_digits: String,
    #[serde(default = "defaults::label_front_three")]
    pub front_three_digits: String,
    #[serde(default = "defaults::label_back_three")]
    pub back_three_digits: String,
}

impl Default for RewardLabels {
    fn default() -> Self {
        Self {
            first_prize: defaults::label_first_prize(),
            last_two_digits: defaults::label_last_two(),
            front_three_digits: defaults::label_front_three(),
            back_three_digits: defaults::label_back_three(),
        }
    }
}

/// Historical baseline settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoricalConfig {
    #[serde(default = "defaults::enabled")]
    pub enabled: bool,

    /// Raw CSV location
    #[serde(default = "defaults::historical_url")]
    pub url: String,
}

impl Default for HistoricalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: defaults::historical_url(),
        }
    }
}

/// A base draw day moved to another day in one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayShift {
    pub month: u32,
    pub from: u32,
    pub to: u32,
}

/// An additional draw day in one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraDay {
    pub month: u32,
    pub day: u32,
}

/// Draw calendar rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Days drawn in every month
    #[serde(default = "defaults::base_days")]
    pub base_days: Vec<u32>,

    /// Holiday shifts replacing a base day
    #[serde(default = "defaults::shifts")]
    pub shifts: Vec<DayShift>,

    /// Special draws added on top of the base days
    #[serde(default = "defaults::extras")]
    pub extras: Vec<ExtraDay>,
}

impl CalendarConfig {
    fn validate(&self) -> Result<()> {
        let bad_day = |d: u32| !(1..=31).contains(&d);
        let bad_month = |m: u32| !(1..=12).contains(&m);

        if self.base_days.is_empty() {
            return Err(AppError::validation("calendar.base_days is empty"));
        }
        if self.base_days.iter().any(|&d| bad_day(d)) {
            return Err(AppError::validation("calendar.base_days must be within 1..=31"));
        }
        for shift in &self.shifts {
            if bad_month(shift.month) || bad_day(shift.from) || bad_day(shift.to) {
                return Err(AppError::validation(format!(
                    "calendar shift out of range: {shift:?}"
                )));
            }
        }
        for extra in &self.extras {
            if bad_month(extra.month) || bad_day(extra.day) {
                return Err(AppError::validation(format!(
                    "calendar extra out of range: {extra:?}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            base_days: defaults::base_days(),
            shifts: defaults::shifts(),
            extras: defaults::extras(),
        }
    }
}

/// Output table rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Marker written in place of absent values
    #[serde(default = "defaults::placeholder")]
    pub placeholder: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            placeholder: defaults::placeholder(),
        }
    }
}

/// Guard applied before the stored table is replaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "defaults::enabled")]
    pub circuit_breaker: bool,

    /// Maximum allowed row-count drop, in percent
    #[serde(default = "defaults::max_drop_percent")]
    pub max_drop_percent: u8,

    /// Previous row count below which the drop check is skipped
    #[serde(default = "defaults::min_baseline")]
    pub min_baseline: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            circuit_breaker: true,
            max_drop_percent: defaults::max_drop_percent(),
            min_baseline: defaults::min_baseline(),
        }
    }
}

mod defaults {
    use super::{DayShift, ExtraDay};

    // Crawler defaults
    pub fn user_agent() -> String {
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".into()
    }
    pub fn timeout() -> u64 {
        15
    }
    pub fn max_attempts() -> u32 {
        3
    }
    pub fn delay_min() -> u64 {
        2000
    }
    pub fn delay_max() -> u64 {
        4000
    }
    pub fn utc_offset() -> i32 {
        7
    }
    pub fn enabled() -> bool {
        true
    }

    // Source defaults
    pub fn source_base_url() -> String {
        "https://news.sanook.com/lotto/check/".into()
    }
    pub fn first_prize_selector() -> String {
        "strong.lotto__number--first".into()
    }
    pub fn column_selector() -> String {
        "div.lottocheck__column".into()
    }
    pub fn label_selector() -> String {
        "span.default-font--reward".into()
    }
    pub fn number_selector() -> String {
        "strong.lotto__number".into()
    }
    pub fn label_first_prize() -> String {
        "รางวัลที่ 1".into()
    }
    pub fn label_last_two() -> String {
        "เลขท้าย 2 ตัว".into()
    }
    pub fn label_front_three() -> String {
        "เลขหน้า 3 ตัว".into()
    }
    pub fn label_back_three() -> String {
        "เลขท้าย 3 ตัว".into()
    }

    // Historical defaults
    pub fn historical_url() -> String {
        "https://raw.githubusercontent.com/heart/Data-Set-Thai-Lotto/master/lotto.csv".into()
    }

    // Calendar defaults
    pub fn base_days() -> Vec<u32> {
        vec![1, 16]
    }
    pub fn shifts() -> Vec<DayShift> {
        vec![
            // New Year
            DayShift {
                month: 1,
                from: 1,
                to: 2,
            },
            // Teachers' Day
            DayShift {
                month: 1,
                from: 16,
                to: 17,
            },
            // Labour Day
            DayShift {
                month: 5,
                from: 1,
                to: 2,
            },
        ]
    }
    pub fn extras() -> Vec<ExtraDay> {
        // Year-end special draw; not confirmed to be held every year.
        vec![ExtraDay { month: 12, day: 30 }]
    }

    // Output defaults
    pub fn placeholder() -> String {
        "-".into()
    }

    // Storage defaults
    pub fn max_drop_percent() -> u8 {
        20
    }
    pub fn min_baseline() -> usize {
        10
    }
}
