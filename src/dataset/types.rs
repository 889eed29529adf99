//! Data types for the punctuality dataset.

use serde::{Deserialize, Serialize};

use super::calendar::CalendarFields;

/// A single row deserialized from the semicolon-separated dataset.
///
/// Columns not listed here are ignored.
#[derive(Debug, Deserialize)]
pub(crate) struct RawTripRow {
    pub(crate) departure_station: String,
    pub(crate) arrival_station: String,
    pub(crate) avg_dep_delay: f64,
    pub(crate) avg_arr_delay: f64,
    #[serde(default)]
    pub(crate) arrival_delay_comments: Option<String>,
    #[serde(default)]
    pub(crate) date: Option<String>,
}

/// One observed route aggregate: average delays for a departure/arrival pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TripRecord {
    pub departure_station: String,
    pub arrival_station: String,
    pub avg_dep_delay: f64,
    pub avg_arr_delay: f64,
    /// Newline-delimited list of delay reasons, as published.
    pub delay_comments: Option<String>,
    pub calendar: Option<CalendarFields>,
}

impl TripRecord {
    pub fn month(&self) -> Option<u32> {
        self.calendar.map(|c| c.month)
    }

    pub fn year(&self) -> Option<i32> {
        self.calendar.map(|c| c.year)
    }

    pub fn hour(&self) -> Option<u32> {
        self.calendar.map(|c| c.hour)
    }
}

/// The full dataset, immutable once loaded.
#[derive(Debug, Default)]
pub struct TripTable {
    records: Vec<TripRecord>,
    has_dates: bool,
}

impl TripTable {
    pub fn new(records: Vec<TripRecord>, has_dates: bool) -> Self {
        TripTable { records, has_dates }
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether the source file carried a date column, i.e. whether
    /// month/year/hour are available for filtering.
    pub fn has_dates(&self) -> bool {
        self.has_dates
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TripRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a TripTable {
    type Item = &'a TripRecord;
    type IntoIter = std::slice::Iter<'a, TripRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
