//! Timestamp parsing and the calendar fields derived from it.

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
// Slash dates are month first.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

/// Calendar fields derived once from a record's timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CalendarFields {
    pub timestamp: NaiveDateTime,
    pub month: u32,
    pub year: i32,
    pub hour: u32,
}

impl CalendarFields {
    pub fn from_timestamp(timestamp: NaiveDateTime) -> Self {
        CalendarFields {
            timestamp,
            month: timestamp.month(),
            year: timestamp.year(),
            hour: timestamp.hour(),
        }
    }

    pub fn date_label(&self) -> String {
        self.timestamp.format("%Y-%m-%d").to_string()
    }
}

/// Parses the date column of the dataset.
///
/// Accepts full timestamps, plain dates, and year-month values such as
/// `2018-01` (read as the first day of the month at midnight).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();

    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts);
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return date.and_hms_opt(0, 0, 0);
        }
    }

    NaiveDate::parse_from_str(&format!("{raw}-01"), "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}
