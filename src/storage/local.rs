//! Local filesystem storage implementation.
//!
//! Writes the table as CSV with an atomic temp-file rename, then updates the
//! snapshot pointer.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};
use tokio::io::AsyncWriteExt;

use crate::error::{AppError, Result};
use crate::models::DrawTable;
use crate::storage::{SnapshotInfo, TableStore, WriteMetadata};

const TABLE_KEY: &str = "draws.csv";
const POINTER_KEY: &str = "current.json";

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Get the full path for a relative key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(key)
    }

    /// Ensure parent directory exists.
    async fn ensure_dir(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }

    /// Write bytes atomically (write to temp, then rename).
    async fn write_bytes(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.path(key);
        self.ensure_dir(&path).await?;

        let tmp = path.with_extension("tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(bytes).await?;
        file.flush().await?;
        drop(file);

        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }

    /// Write JSON data.
    async fn write_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value)?;
        self.write_bytes(key, &bytes).await
    }

    /// Read bytes, returning None if file doesn't exist.
    async fn read_bytes(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path(key);
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    /// Read JSON data.
    async fn read_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.read_bytes(key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }
}

/// Serialize a table as CSV, header first.
pub fn table_to_csv(table: &DrawTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in table.to_values() {
        writer.write_record(&row)?;
    }
    writer.into_inner().map_err(|e| {
        AppError::Io(std::io::Error::new(e.error().kind(), e.error().to_string()))
    })
}

/// Parse CSV written by [`table_to_csv`].
pub fn table_from_csv(bytes: &[u8]) -> Result<DrawTable> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);
    let header = reader.headers()?.iter().map(str::to_string).collect();
    let rows = reader
        .records()
        .map(|r| r.map(|rec| rec.iter().map(str::to_string).collect()))
        .collect::<std::result::Result<Vec<Vec<String>>, csv::Error>>()?;
    Ok(DrawTable { header, rows })
}

#[async_trait]
impl TableStore for LocalStorage {
    async fn replace_table(&self, table: &DrawTable) -> Result<WriteMetadata> {
        let bytes = table_to_csv(table)?;
        let snapshot = SnapshotInfo {
            updated_at: Utc::now(),
            rows: table.len(),
            sha256: hex::encode(Sha256::digest(&bytes)),
        };

        self.write_bytes(TABLE_KEY, &bytes).await?;
        self.write_json(POINTER_KEY, &snapshot).await?;
        log::info!(
            "Wrote {} rows to {}",
            snapshot.rows,
            self.path(TABLE_KEY).display()
        );

        Ok(WriteMetadata {
            rows: snapshot.rows,
            location: self.path(TABLE_KEY).display().to_string(),
            snapshot,
        })
    }

    async fn load_table(&self) -> Result<Option<DrawTable>> {
        match self.read_bytes(TABLE_KEY).await? {
            Some(bytes) => Ok(Some(table_from_csv(&bytes)?)),
            None => {
                log::warn!("No {} found", TABLE_KEY);
                Ok(None)
            }
        }
    }

    async fn snapshot_info(&self) -> Result<Option<SnapshotInfo>> {
        self.read_json(POINTER_KEY).await
    }
}
