//! Diff calculation between the stored table and the one about to replace it.
//!
//! Rows are keyed by their date cell. A row counts as updated when any other
//! cell differs.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::models::DrawTable;

/// Dates added, updated and removed.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct TableDiff {
    pub added: Vec<String>,
    pub updated: Vec<String>,
    pub removed: Vec<String>,
}

impl TableDiff {
    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty() || !self.updated.is_empty() || !self.removed.is_empty()
    }

    /// Get the total number of changes.
    pub fn change_count(&self) -> usize {
        self.added.len() + self.updated.len() + self.removed.len()
    }
}

fn rows_by_date(table: &DrawTable) -> BTreeMap<&str, &[String]> {
    let Some(date_idx) = table.column_index("date") else {
        return BTreeMap::new();
    };
    table
        .rows
        .iter()
        .filter_map(|row| row.get(date_idx).map(|d| (d.as_str(), row.as_slice())))
        .collect()
}

/// Calculate the diff between previous and current tables. Dates are listed
/// in ascending order.
pub fn calculate_diff(previous: &DrawTable, current: &DrawTable) -> TableDiff {
    let prev = rows_by_date(previous);
    let curr = rows_by_date(current);

    let prev_dates: BTreeSet<&str> = prev.keys().copied().collect();
    let curr_dates: BTreeSet<&str> = curr.keys().copied().collect();

    let added = curr_dates
        .difference(&prev_dates)
        .map(|d| d.to_string())
        .collect();
    let removed = prev_dates
        .difference(&curr_dates)
        .map(|d| d.to_string())
        .collect();
    let updated = curr_dates
        .intersection(&prev_dates)
        .filter(|d| prev[*d] != curr[*d])
        .map(|d| d.to_string())
        .collect();

    TableDiff {
        added,
        updated,
        removed,
    }
}
