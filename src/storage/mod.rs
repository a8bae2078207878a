//! Storage abstractions for the persisted results table.
//!
//! The store holds exactly one table. Every sync replaces it whole; there is
//! no partial update.
//!
//! ## Directory Structure (local backend)
//!
//! ```text
//! storage/
//! ├── config.toml           # Configuration
//! ├── draws.csv             # The results table, header on row 1
//! └── current.json          # Snapshot pointer: time, row count, checksum
//! ```

pub mod local;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::DrawTable;

// Re-export for convenience
pub use local::LocalStorage;

/// Pointer describing the table currently stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnapshotInfo {
    /// ISO 8601 timestamp of the last replace
    pub updated_at: DateTime<Utc>,
    /// Data rows, header excluded
    pub rows: usize,
    /// Hex SHA-256 of the serialized table
    pub sha256: String,
}

/// Metadata about a storage write operation.
#[derive(Debug, Clone)]
pub struct WriteMetadata {
    pub rows: usize,
    pub location: String,
    pub snapshot: SnapshotInfo,
}

/// Backend holding the results table.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Clear the stored table and write `table` in its place.
    async fn replace_table(&self, table: &DrawTable) -> Result<WriteMetadata>;

    /// Read the stored table, `None` if nothing was written yet.
    async fn load_table(&self) -> Result<Option<DrawTable>>;

    /// Describe the stored table, `None` if nothing was written yet.
    async fn snapshot_info(&self) -> Result<Option<SnapshotInfo>>;
}
