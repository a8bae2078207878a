//! Calendar helpers shared by the sources and the reconciler.

use chrono::{Datelike, FixedOffset, NaiveDate, Offset, Utc};

/// Offset between the Buddhist era and the Gregorian calendar.
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

/// Years at or above this are taken to be Buddhist-era years.
const BUDDHIST_YEAR_FLOOR: i32 = 2400;

/// Smallest year accepted; `%Y` also matches one to three digit years.
const MIN_YEAR: i32 = 1000;

/// Canonical textual date format of the output table.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const INPUT_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];

/// Gregorian year to Buddhist-era year.
pub fn buddhist_year(year: i32) -> i32 {
    year + BUDDHIST_ERA_OFFSET
}

/// Encode a date as `ddmmyyyy` with a Buddhist-era year.
pub fn buddhist_date_code(date: NaiveDate) -> String {
    format!(
        "{:02}{:02}{}",
        date.day(),
        date.month(),
        buddhist_year(date.year())
    )
}

/// Parse a date cell from any source.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `DD/MM/YYYY` and `DD-MM-YYYY`, with an
/// optional trailing time part. Buddhist-era years are converted. Returns
/// `None` for anything else.
pub fn parse_draw_date(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    let date_part = trimmed
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(trimmed);
    if date_part.is_empty() {
        return None;
    }

    let parsed = INPUT_FORMATS
        .iter()
        .find_map(|fmt| {
            NaiveDate::parse_from_str(date_part, fmt)
                .ok()
                .filter(|date| date.year() >= MIN_YEAR)
        })?;

    if parsed.year() >= BUDDHIST_YEAR_FLOOR {
        NaiveDate::from_ymd_opt(
            parsed.year() - BUDDHIST_ERA_OFFSET,
            parsed.month(),
            parsed.day(),
        )
    } else {
        Some(parsed)
    }
}

/// Render a date in the canonical `YYYY-MM-DD` form.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Today's date at the given UTC offset. Out-of-range offsets fall back to UTC.
pub fn today_at_offset(offset_hours: i32) -> NaiveDate {
    let offset = offset_hours
        .checked_mul(3600)
        .and_then(FixedOffset::east_opt)
        .unwrap_or_else(|| Utc.fix());
    Utc::now().with_timezone(&offset).date_naive()
}
