//! # Share Summaries
//!
//! Plain-text summaries of a calculation for the copy and share buttons, plus
//! the URL-encoded deep links built from them. Clipboard access, printing and
//! PDF capture belong to the host; this module only produces the text.
//!
//! ```rust
//! use calc_core::history::CalculationHistoryEntry;
//! use calc_core::share::{whatsapp_url, ShareSummary};
//!
//! let entry = CalculationHistoryEntry::new("5 + 3", "8");
//! let summary = ShareSummary::from_entry(&entry);
//! assert!(summary.text().starts_with("5 + 3 = 8"));
//! assert!(whatsapp_url(summary.text()).starts_with("https://wa.me/?text=5%20%2B%203"));
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::format::format_result;
use crate::history::CalculationHistoryEntry;

const WHATSAPP_BASE: &str = "https://wa.me/?text=";

/// Text handed to the clipboard or a share target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareSummary {
    text: String,
}

impl ShareSummary {
    pub fn new(expression: &str, result: &str, timestamp: DateTime<Utc>) -> Self {
        ShareSummary {
            text: format!(
                "{} = {}\nCalculated on {}",
                expression,
                result,
                timestamp.format("%Y-%m-%d %H:%M UTC")
            ),
        }
    }

    pub fn from_entry(entry: &CalculationHistoryEntry) -> Self {
        ShareSummary::new(&entry.expression, &entry.result, entry.timestamp)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

/// One-line conversion summary, e.g. `1 mi = 1.61 km`
pub fn conversion_summary(value: f64, from: &str, result: f64, to: &str) -> String {
    format!("{} {} = {} {}", format_result(value), from, format_result(result), to)
}

pub fn whatsapp_url(text: &str) -> String {
    format!("{}{}", WHATSAPP_BASE, urlencoding::encode(text))
}

pub fn mailto_url(subject: &str, body: &str) -> String {
    format!(
        "mailto:?subject={}&body={}",
        urlencoding::encode(subject),
        urlencoding::encode(body)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_summary_text() {
        let at = Utc.with_ymd_and_hms(2025, 3, 14, 9, 26, 0).unwrap();
        let summary = ShareSummary::new("2 × 3", "6", at);
        assert_eq!(summary.text(), "2 × 3 = 6\nCalculated on 2025-03-14 09:26 UTC");
    }

    #[test]
    fn test_conversion_summary() {
        assert_eq!(conversion_summary(1.0, "mi", 1.609344, "km"), "1 mi = 1.61 km");
        assert_eq!(conversion_summary(0.0, "°C", 32.0, "°F"), "0 °C = 32 °F");
    }

    #[test]
    fn test_links_are_encoded() {
        let url = whatsapp_url("5 ÷ 0 = Undefined\nok?");
        assert!(!url.contains(' '));
        assert!(!url.contains('\n'));
        assert!(url.contains("%0A"));

        let mail = mailto_url("My result", "a&b");
        assert_eq!(mail, "mailto:?subject=My%20result&body=a%26b");
    }
}
