//! Service layer for the sync application.
//!
//! This module contains the business logic for:
//! - Draw date generation (`DrawCalendar`)
//! - Result page scraping (`ResultScraper`, `ResultPageParser`)
//! - Historical baseline loading (`HistoricalLoader`)
//! - Frequency statistics (`DrawStats`)

mod calendar;
mod historical;
pub(crate) mod parse;
mod results;
mod stats;

pub use calendar::DrawCalendar;
pub use historical::{HistoricalLoader, parse_historical_csv};
pub use parse::ResultPageParser;
pub use results::{ResultScraper, ScrapeOutcome};
pub use stats::{DrawStats, NumberFrequency, Overdue, WeekdayStats};
