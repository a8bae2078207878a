//! Merge of historical and freshly scraped draws.
//!
//! Records are keyed by date. On a collision the record that comes later in
//! `historical ++ new` wins, so scraped data always replaces the baseline.
//! Output is ordered most recent first.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::models::{DrawRecord, DrawTable};

/// Combine both datasets into one, newest first, one record per date.
pub fn reconcile(historical: Vec<DrawRecord>, new: Vec<DrawRecord>) -> Vec<DrawRecord> {
    if new.is_empty() {
        log::info!("No new draws; using historical data only");
    }

    let mut by_date: BTreeMap<NaiveDate, DrawRecord> = BTreeMap::new();
    for record in historical.into_iter().chain(new) {
        by_date.insert(record.date, record);
    }

    by_date.into_values().rev().collect()
}

/// Reconcile and render in one step.
pub fn reconcile_table(
    historical: Vec<DrawRecord>,
    new: Vec<DrawRecord>,
    placeholder: &str,
) -> DrawTable {
    DrawTable::from_records(&reconcile(historical, new), placeholder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::date::parse_draw_date;

    fn draw(date: &str, last_two: &str) -> DrawRecord {
        DrawRecord {
            date: parse_draw_date(date).unwrap(),
            first_prize: "123456".into(),
            last_two_digits: last_two.into(),
            prize_pre_3digit: vec![],
            prize_suf_3digit: vec![],
        }
    }

    fn summary(records: &[DrawRecord]) -> Vec<(String, String)> {
        records
            .iter()
            .map(|r| (r.date_string(), r.last_two_digits.clone()))
            .collect()
    }

    #[test]
    fn test_new_wins_and_sorts_descending() {
        let historical = vec![draw("2024-01-01", "23")];
        let new = vec![draw("2024-01-01", "99"), draw("2024-01-16", "45")];

        let merged = reconcile(historical, new);

        assert_eq!(
            summary(&merged),
            vec![
                ("2024-01-16".to_string(), "45".to_string()),
                ("2024-01-01".to_string(), "99".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_new_keeps_historical() {
        let historical = vec![draw("2023-12-16", "10"), draw("2023-12-30", "11")];
        let merged = reconcile(historical, vec![]);
        assert_eq!(
            summary(&merged),
            vec![
                ("2023-12-30".to_string(), "11".to_string()),
                ("2023-12-16".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_historical() {
        let merged = reconcile(vec![], vec![draw("2025-01-02", "01")]);
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn test_later_duplicate_within_one_side_wins() {
        let historical = vec![draw("2020-06-16", "01"), draw("2020-06-16", "02")];
        let merged = reconcile(historical, vec![]);
        assert_eq!(summary(&merged), vec![("2020-06-16".to_string(), "02".to_string())]);
    }

    #[test]
    fn test_self_reconcile_is_idempotent() {
        let data = vec![
            draw("2024-02-01", "11"),
            draw("2024-01-17", "22"),
            draw("2024-02-16", "33"),
            draw("2024-01-17", "44"),
        ];

        let once = reconcile(data.clone(), vec![]);
        let twice = reconcile(data.clone(), data);

        assert_eq!(once, twice);
        assert_eq!(twice.len(), 3);
        assert!(twice.windows(2).all(|w| w[0].date > w[1].date));
    }

    #[test]
    fn test_table_renders_dates_and_placeholders() {
        let table = reconcile_table(vec![draw("2024-01-01", "23")], vec![], "-");
        assert_eq!(table.rows, vec![vec!["2024-01-01", "123456", "23", "-", "-"]]);
    }
}
