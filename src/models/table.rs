//! Row/column form of a dataset, as handed to the store.

use serde::{Deserialize, Serialize};

use crate::models::DrawRecord;

/// Output columns, in order.
pub const COLUMNS: [&str; 5] = [
    "date",
    "first_prize",
    "last_two_digits",
    "prize_pre_3digit",
    "prize_suf_3digit",
];

/// Separator used when rendering a set of prize numbers into one cell.
pub const SET_SEPARATOR: &str = ", ";

/// Header row plus data rows, all text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DrawTable {
    /// Table with the canonical header and no rows.
    pub fn empty() -> Self {
        Self {
            header: COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    /// Render records in the order given.
    pub fn from_records(records: &[DrawRecord], placeholder: &str) -> Self {
        let mut table = Self::empty();
        table.rows = records
            .iter()
            .map(|record| {
                vec![
                    record.date_string(),
                    or_placeholder(record.first_prize.clone(), placeholder),
                    or_placeholder(record.last_two_digits.clone(), placeholder),
                    or_placeholder(record.prize_pre_3digit.join(SET_SEPARATOR), placeholder),
                    or_placeholder(record.prize_suf_3digit.join(SET_SEPARATOR), placeholder),
                ]
            })
            .collect();
        table
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    /// All cells of a named column; short rows yield empty cells.
    pub fn column(&self, name: &str) -> Vec<&str> {
        match self.column_index(name) {
            Some(idx) => self
                .rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
                .collect(),
            None => Vec::new(),
        }
    }

    /// Header row followed by data rows.
    pub fn to_values(&self) -> Vec<Vec<String>> {
        std::iter::once(self.header.clone())
            .chain(self.rows.iter().cloned())
            .collect()
    }
}

fn or_placeholder(value: String, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn record(day: u32, pre: &[&str]) -> DrawRecord {
        DrawRecord {
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            first_prize: "000111".into(),
            last_two_digits: "09".into(),
            prize_pre_3digit: pre.iter().map(|s| s.to_string()).collect(),
            prize_suf_3digit: vec![],
        }
    }

    #[test]
    fn test_from_records_renders_cells() {
        let table = DrawTable::from_records(&[record(16, &["045", "367"]), record(1, &[])], "-");

        assert_eq!(table.header, COLUMNS);
        assert_eq!(
            table.rows[0],
            vec!["2024-03-16", "000111", "09", "045, 367", "-"]
        );
        assert_eq!(table.rows[1][3], "-");
    }

    #[test]
    fn test_to_values_puts_header_first() {
        let table = DrawTable::from_records(&[record(1, &[])], "");
        let values = table.to_values();
        assert_eq!(values.len(), 2);
        assert_eq!(values[0][0], "date");
    }

    #[test]
    fn test_column_lookup() {
        let table = DrawTable::from_records(&[record(16, &[]), record(1, &[])], "-");
        assert_eq!(table.column("last_two_digits"), vec!["09", "09"]);
        assert!(table.column("missing").is_empty());
    }
}
