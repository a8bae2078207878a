//! Result page parsing.
//!
//! Two passes over the document. The first reads the first prize from its
//! dedicated element. The second walks every labeled reward column and picks
//! numbers by label text; it fills the first prize only when the first pass
//! found nothing.

use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};

use crate::error::{AppError, Result};
use crate::models::{RawDraw, RewardLabels, SourceConfig};

/// Compiled selectors and labels for one result page layout.
#[derive(Debug, Clone)]
pub struct ResultPageParser {
    first_prize: Selector,
    column: Selector,
    label: Selector,
    number: Selector,
    labels: RewardLabels,
}

impl ResultPageParser {
    pub fn new(source: &SourceConfig) -> Result<Self> {
        let selectors = &source.selectors;
        Ok(Self {
            first_prize: parse_selector(&selectors.first_prize)?,
            column: parse_selector(&selectors.column)?,
            label: parse_selector(&selectors.label)?,
            number: parse_selector(&selectors.number)?,
            labels: source.labels.clone(),
        })
    }

    /// Extract whatever prize fields the page carries for `date`.
    pub fn parse(&self, html: &str, date: NaiveDate) -> RawDraw {
        let document = Html::parse_document(html);
        let mut draw = RawDraw::new(date);

        draw.first_prize = document
            .select(&self.first_prize)
            .map(element_text)
            .find(|text| !text.is_empty());

        for column in document.select(&self.column) {
            self.scan_column(column, &mut draw);
        }

        draw
    }

    fn scan_column(&self, column: ElementRef<'_>, draw: &mut RawDraw) {
        let Some(label) = column.select(&self.label).next().map(element_text) else {
            return;
        };

        let numbers: Vec<String> = column
            .select(&self.number)
            .map(element_text)
            .filter(|n| !n.is_empty())
            .collect();
        if numbers.is_empty() {
            return;
        }

        let labels = &self.labels;
        if label.contains(&labels.first_prize) {
            if draw.first_prize.is_none() {
                draw.first_prize = numbers.into_iter().next();
            }
        } else if label.contains(&labels.last_two_digits) {
            draw.last_two_digits = numbers.into_iter().next();
        } else if label.contains(&labels.front_three_digits) {
            draw.prize_pre_3digit = numbers;
        } else if label.contains(&labels.back_three_digits) {
            draw.prize_suf_3digit = numbers;
        }
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}


#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 17).unwrap()
    }

    fn parser() -> ResultPageParser {
        ResultPageParser::new(&SourceConfig::default()).unwrap()
    }

    #[test]
    fn test_parse_full_page() {
        let draw = parser().parse(&fixtures::result_page("807779", "23"), date());

        assert_eq!(draw.date, Some(date()));
        assert_eq!(draw.first_prize.as_deref(), Some("807779"));
        assert_eq!(draw.last_two_digits.as_deref(), Some("23"));
        assert_eq!(draw.prize_pre_3digit, vec!["045", "367"]);
        assert_eq!(draw.prize_suf_3digit, vec!["102", "950"]);
    }

    #[test]
    fn test_column_scan_fills_missing_first_prize() {
        let html = r#"
            <div class="lottocheck__column">
              <span class="default-font--reward">รางวัลที่ 1</span>
              <strong class="lotto__number">000123</strong>
            </div>"#;
        let draw = parser().parse(html, date());
        assert_eq!(draw.first_prize.as_deref(), Some("000123"));
    }

    #[test]
    fn test_direct_lookup_wins_over_column_scan() {
        let html = r#"
            <strong class="lotto__number--first">111111</strong>
            <div class="lottocheck__column">
              <span class="default-font--reward">รางวัลที่ 1</span>
              <strong class="lotto__number">222222</strong>
            </div>"#;
        let draw = parser().parse(html, date());
        assert_eq!(draw.first_prize.as_deref(), Some("111111"));
    }

    #[test]
    fn test_unlabeled_and_empty_columns_skipped() {
        let html = r#"
            <div class="lottocheck__column">
              <strong class="lotto__number">99</strong>
            </div>
            <div class="lottocheck__column">
              <span class="default-font--reward">เลขท้าย 2 ตัว</span>
            </div>"#;
        let draw = parser().parse(html, date());
        assert_eq!(draw.last_two_digits, None);
        assert_eq!(draw.first_prize, None);
    }

    #[test]
    fn test_page_without_results() {
        let draw = parser().parse("<html><body>ยังไม่ออก</body></html>", date());
        assert_eq!(draw.first_prize, None);
        assert_eq!(draw.last_two_digits, None);
    }

    #[test]
    fn test_invalid_selector_rejected() {
        let mut source = SourceConfig::default();
        source.selectors.column = "[[invalid".to_string();
        assert!(ResultPageParser::new(&source).is_err());
    }
}
