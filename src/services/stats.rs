//! Frequency statistics over the stored results table.
//!
//! Counts only; nothing here predicts anything.

use std::collections::HashMap;

use chrono::{Datelike, Weekday};

use crate::models::{DrawTable, normalize_last_two};
use crate::utils::date::parse_draw_date;

/// How often one two-digit number was drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct NumberFrequency {
    pub number: String,
    pub count: usize,
    /// Share of draws, in percent
    pub probability: f64,
}

/// How long a number has been absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overdue {
    pub number: String,
    /// Draws since it last appeared; 0 means the most recent draw
    pub draws_ago: usize,
}

/// Top numbers drawn on one weekday.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekdayStats {
    pub weekday: Weekday,
    pub draws: usize,
    pub top: Vec<NumberFrequency>,
}

/// Statistics over the `last_two_digits` column of a table ordered newest
/// first.
pub struct DrawStats<'a> {
    table: &'a DrawTable,
}

impl<'a> DrawStats<'a> {
    pub fn new(table: &'a DrawTable) -> Self {
        Self { table }
    }

    /// Normalized last-two-digit values, newest first; unusable cells skipped.
    fn numbers(&self) -> Vec<String> {
        self.table
            .column("last_two_digits")
            .into_iter()
            .filter_map(normalize_last_two)
            .collect()
    }

    /// The `n` most frequent numbers, ties broken by number ascending.
    pub fn frequency_top(&self, n: usize) -> Vec<NumberFrequency> {
        rank(&self.numbers(), n)
    }

    /// For each given number, draws since its latest appearance, longest
    /// absent first. Numbers never drawn are left out.
    pub fn overdue(&self, top: &[NumberFrequency]) -> Vec<Overdue> {
        let numbers = self.numbers();
        let mut overdue: Vec<Overdue> = top
            .iter()
            .filter_map(|f| {
                numbers
                    .iter()
                    .position(|n| *n == f.number)
                    .map(|draws_ago| Overdue {
                        number: f.number.clone(),
                        draws_ago,
                    })
            })
            .collect();
        overdue.sort_by(|a, b| b.draws_ago.cmp(&a.draws_ago));
        overdue
    }

    /// Top `n` numbers per weekday, Monday first. Weekdays without draws are
    /// left out; rows with unreadable dates are ignored.
    pub fn by_weekday(&self, n: usize) -> Vec<WeekdayStats> {
        let dates = self.table.column("date");
        let numbers = self.table.column("last_two_digits");

        let mut grouped: HashMap<Weekday, Vec<String>> = HashMap::new();
        for (date, number) in dates.into_iter().zip(numbers) {
            let (Some(date), Some(number)) = (parse_draw_date(date), normalize_last_two(number))
            else {
                continue;
            };
            grouped.entry(date.weekday()).or_default().push(number);
        }

        let mut stats: Vec<WeekdayStats> = grouped
            .into_iter()
            .map(|(weekday, numbers)| WeekdayStats {
                weekday,
                draws: numbers.len(),
                top: rank(&numbers, n),
            })
            .collect();
        stats.sort_by_key(|s| s.weekday.num_days_from_monday());
        stats
    }
}

fn rank(numbers: &[String], n: usize) -> Vec<NumberFrequency> {
    let total = numbers.len();
    if total == 0 {
        return Vec::new();
    }

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for number in numbers {
        *counts.entry(number.as_str()).or_default() += 1;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    ranked
        .into_iter()
        .take(n)
        .map(|(number, count)| NumberFrequency {
            number: number.to_string(),
            count,
            probability: count as f64 / total as f64 * 100.0,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[(&str, &str)]) -> DrawTable {
        let mut table = DrawTable::empty();
        table.rows = rows
            .iter()
            .map(|(date, two)| {
                vec![
                    date.to_string(),
                    "000000".to_string(),
                    two.to_string(),
                    "-".to_string(),
                    "-".to_string(),
                ]
            })
            .collect();
        table
    }

    // Newest first, as stored.
    fn sample() -> DrawTable {
        table(&[
            ("2024-03-16", "7"),  // Saturday
            ("2024-03-01", "45"), // Friday
            ("2024-02-16", "07"), // Friday
            ("2024-02-01", "45"), // Thursday
            ("2024-01-17", "45"), // Wednesday
            ("2024-01-02", "12"), // Tuesday
            ("-", "99"),
        ])
    }

    #[test]
    fn test_frequency_top() {
        let table = sample();
        let stats = DrawStats::new(&table);
        let top = stats.frequency_top(2);

        assert_eq!(top.len(), 2);
        assert_eq!(top[0].number, "45");
        assert_eq!(top[0].count, 3);
        assert!((top[0].probability - 3.0 / 7.0 * 100.0).abs() < 1e-9);
        assert_eq!(top[1].number, "07");
        assert_eq!(top[1].count, 2);
    }

    #[test]
    fn test_ties_broken_by_number() {
        let table = sample();
        let stats = DrawStats::new(&table);
        let top = stats.frequency_top(4);
        assert_eq!(top[2].number, "12");
        assert_eq!(top[3].number, "99");
    }

    #[test]
    fn test_overdue_orders_longest_absent_first() {
        let table = sample();
        let stats = DrawStats::new(&table);
        let top = stats.frequency_top(3);
        let overdue = stats.overdue(&top);

        assert_eq!(
            overdue,
            vec![
                Overdue {
                    number: "12".into(),
                    draws_ago: 5,
                },
                Overdue {
                    number: "45".into(),
                    draws_ago: 1,
                },
                Overdue {
                    number: "07".into(),
                    draws_ago: 0,
                },
            ]
        );
    }

    #[test]
    fn test_by_weekday() {
        let table = sample();
        let stats = DrawStats::new(&table);
        let days = stats.by_weekday(1);

        let weekdays: Vec<Weekday> = days.iter().map(|d| d.weekday).collect();
        assert_eq!(
            weekdays,
            vec![Weekday::Tue, Weekday::Wed, Weekday::Thu, Weekday::Fri, Weekday::Sat]
        );

        let friday = &days[3];
        assert_eq!(friday.draws, 2);
        assert_eq!(friday.top[0].number, "07");
        assert!((friday.top[0].probability - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_table() {
        let empty = DrawTable::empty();
        let stats = DrawStats::new(&empty);
        assert!(stats.frequency_top(5).is_empty());
        assert!(stats.by_weekday(5).is_empty());
    }
}
