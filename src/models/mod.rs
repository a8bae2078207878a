// src/models/mod.rs

//! Domain models for the sync application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod draw;
mod table;

// Re-export all public types
pub use config::{
    CalendarConfig, Config, CrawlerConfig, DayShift, ExtraDay, HistoricalConfig, OutputConfig,
    PageSelectors, RewardLabels, SourceConfig, StorageConfig,
};
pub use draw::{DrawRecord, RawDraw, normalize_last_two};
pub use table::{COLUMNS, DrawTable, SET_SEPARATOR};
