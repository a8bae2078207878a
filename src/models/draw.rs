//! Draw result data structures.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::utils::date::format_date;

/// A draw result as read from a source, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDraw {
    pub date: Option<NaiveDate>,
    pub first_prize: Option<String>,
    pub last_two_digits: Option<String>,
    pub prize_pre_3digit: Vec<String>,
    pub prize_suf_3digit: Vec<String>,
}

impl RawDraw {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..Self::default()
        }
    }
}

/// One validated lottery draw.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DrawRecord {
    /// Draw date, unique within a dataset
    pub date: NaiveDate,

    /// Grand-prize number, leading zeros kept
    pub first_prize: String,

    /// Two-digit suffix prize, zero padded
    pub last_two_digits: String,

    /// Front three-digit prizes
    #[serde(default)]
    pub prize_pre_3digit: Vec<String>,

    /// Back three-digit prizes
    #[serde(default)]
    pub prize_suf_3digit: Vec<String>,
}

impl DrawRecord {
    /// Date in canonical `YYYY-MM-DD` form.
    pub fn date_string(&self) -> String {
        format_date(self.date)
    }
}

impl TryFrom<RawDraw> for DrawRecord {
    type Error = AppError;

    /// A draw is usable only with both a first prize and last two digits.
    fn try_from(raw: RawDraw) -> Result<Self> {
        let date = raw
            .date
            .ok_or_else(|| AppError::incomplete("unknown date", "date"))?;

        let first_prize = raw
            .first_prize
            .as_deref()
            .and_then(normalize_first_prize)
            .ok_or_else(|| AppError::incomplete(date, "first_prize"))?;

        let last_two_digits = raw
            .last_two_digits
            .as_deref()
            .and_then(normalize_last_two)
            .ok_or_else(|| AppError::incomplete(date, "last_two_digits"))?;

        Ok(Self {
            date,
            first_prize,
            last_two_digits,
            prize_pre_3digit: normalize_set(raw.prize_pre_3digit),
            prize_suf_3digit: normalize_set(raw.prize_suf_3digit),
        })
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn normalize_first_prize(raw: &str) -> Option<String> {
    let value = raw.trim();
    is_digits(value).then(|| value.to_string())
}

/// Zero-pad a one-digit value; reject anything that is not one or two digits.
pub fn normalize_last_two(raw: &str) -> Option<String> {
    let value = raw.trim();
    if !is_digits(value) || value.len() > 2 {
        return None;
    }
    Some(format!("{value:0>2}"))
}

/// Trim, drop empties and duplicates, keep first-seen order.
fn normalize_set(values: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.trim().to_string();
        if !value.is_empty() && !out.contains(&value) {
            out.push(value);
        }
    }
    out
}
