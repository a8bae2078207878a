//! Draw calendar.
//!
//! Draws happen on the 1st and 16th of each month, except where a holiday
//! moves a draw to another day or a special draw is added. Only dates on or
//! before the reference day are produced.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::CalendarConfig;

/// Computes expected draw dates from calendar rules.
#[derive(Debug, Clone, Default)]
pub struct DrawCalendar {
    rules: CalendarConfig,
}

impl DrawCalendar {
    pub fn new(rules: CalendarConfig) -> Self {
        Self { rules }
    }

    /// Candidate draw days of one month, before date validation.
    fn month_days(&self, month: u32) -> Vec<u32> {
        let mut days: Vec<u32> = self
            .rules
            .base_days
            .iter()
            .map(|&day| {
                self.rules
                    .shifts
                    .iter()
                    .find(|s| s.month == month && s.from == day)
                    .map_or(day, |s| s.to)
            })
            .collect();

        days.extend(
            self.rules
                .extras
                .iter()
                .filter(|e| e.month == month)
                .map(|e| e.day),
        );
        days
    }

    /// Draw dates of `year` that are not after `today`, ascending.
    pub fn draw_dates(&self, year: i32, today: NaiveDate) -> Vec<NaiveDate> {
        let dates: BTreeSet<NaiveDate> = (1..=12)
            .flat_map(|month| {
                self.month_days(month)
                    .into_iter()
                    .filter_map(move |day| NaiveDate::from_ymd_opt(year, month, day))
            })
            .filter(|date| *date <= today)
            .collect();

        dates.into_iter().collect()
    }
}
