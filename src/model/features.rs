//! Feature vector assembly for the delay simulator.

use serde::Serialize;
use tracing::debug;

use crate::analyzers::ranking::busiest_arrivals;
use crate::analyzers::utility::DelayAccumulator;
use crate::dataset::TripTable;
use crate::error::{Result, TardisError};

/// Separator between departure and arrival in the route feature. The model
/// was trained on this exact encoding.
pub const ROUTE_SEPARATOR: &str = " ➜ ";
pub const MAJOR_STATION_COUNT: usize = 10;
/// Ratio used when the route has no history for the requested month.
pub const FALLBACK_DELAY_RATIO: f64 = 0.2;
pub const RATIO_SMOOTHING: f64 = 0.1;
pub const DEFAULT_PCT_DELAY_EXTERNAL: f64 = 0.1;

/// Names of the numeric features, in model column order.
pub const NUMERIC_FEATURES: [&str; 11] = [
    "avg_dep_delay",
    "total_delay_points",
    "trains_delayed_15min",
    "trains_delayed_30min",
    "trains_delayed_60min",
    "month",
    "quarter",
    "is_major_arrival",
    "pct_delay_external",
    "delay_ratio",
    "cancelled_trains",
];

/// A simulator query: which trip, in which month, with how much delay at
/// departure.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub departure: String,
    pub arrival: String,
    pub month: u32,
    pub initial_delay: f64,
}

impl PredictionRequest {
    /// # Errors
    ///
    /// Returns [`TardisError::InvalidRequest`] for a blank station, a month
    /// outside 1..=12, or a negative or non-finite delay.
    pub fn new(departure: &str, arrival: &str, month: u32, initial_delay: f64) -> Result<Self> {
        if departure.trim().is_empty() || arrival.trim().is_empty() {
            return Err(TardisError::InvalidRequest(
                "departure and arrival stations are required".into(),
            ));
        }
        if !(1..=12).contains(&month) {
            return Err(TardisError::InvalidRequest(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        if !initial_delay.is_finite() || initial_delay < 0.0 {
            return Err(TardisError::InvalidRequest(format!(
                "initial delay must be a non-negative number of minutes, got {initial_delay}"
            )));
        }

        Ok(PredictionRequest {
            departure: departure.trim().to_string(),
            arrival: arrival.trim().to_string(),
            month,
            initial_delay,
        })
    }
}

/// Single-row model input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureVector {
    pub route: String,
    pub avg_dep_delay: f64,
    pub total_delay_points: u32,
    pub trains_delayed_15min: u32,
    pub trains_delayed_30min: u32,
    pub trains_delayed_60min: u32,
    pub month: u32,
    pub quarter: u32,
    pub is_major_arrival: u8,
    pub pct_delay_external: f64,
    pub delay_ratio: f64,
    pub cancelled_trains: u32,
}

impl FeatureVector {
    /// Numeric features paired with their names, in [`NUMERIC_FEATURES`] order.
    pub fn numeric(&self) -> [(&'static str, f64); 11] {
        let values = [
            self.avg_dep_delay,
            self.total_delay_points as f64,
            self.trains_delayed_15min as f64,
            self.trains_delayed_30min as f64,
            self.trains_delayed_60min as f64,
            self.month as f64,
            self.quarter as f64,
            self.is_major_arrival as f64,
            self.pct_delay_external,
            self.delay_ratio,
            self.cancelled_trains as f64,
        ];
        let mut out = [("", 0.0); 11];
        for (slot, pair) in out.iter_mut().zip(NUMERIC_FEATURES.into_iter().zip(values)) {
            *slot = pair;
        }
        out
    }
}

pub fn route_label(departure: &str, arrival: &str) -> String {
    format!("{departure}{ROUTE_SEPARATOR}{arrival}")
}

/// Calendar quarter (1–4) of a month (1–12).
pub fn quarter_of(month: u32) -> u32 {
    (month.saturating_sub(1)) / 3 + 1
}

/// Mean of `avg_arr_delay / (avg_dep_delay + 0.1)` over the rows of the
/// route in `month`, or [`FALLBACK_DELAY_RATIO`] when there are none.
pub fn historical_delay_ratio(
    table: &TripTable,
    departure: &str,
    arrival: &str,
    month: u32,
) -> f64 {
    route_month_ratio(table, departure, arrival, month).unwrap_or(FALLBACK_DELAY_RATIO)
}

fn route_month_ratio(
    table: &TripTable,
    departure: &str,
    arrival: &str,
    month: u32,
) -> Option<f64> {
    let acc: DelayAccumulator = table
        .iter()
        .filter(|r| r.departure_station == departure && r.arrival_station == arrival)
        .filter(|r| r.month() == Some(month))
        .map(|r| r.avg_arr_delay / (r.avg_dep_delay + RATIO_SMOOTHING))
        .collect();

    acc.mean()
}

/// Builds the model input for `request` from the full, unfiltered table.
///
/// Unknown stations simply have no history and get the fallback ratio.
#[tracing::instrument(skip(table))]
pub fn build_features(request: &PredictionRequest, table: &TripTable) -> FeatureVector {
    let major = busiest_arrivals(table, MAJOR_STATION_COUNT);
    let is_major_arrival = u8::from(major.iter().any(|s| *s == request.arrival));

    let delay_ratio = route_month_ratio(table, &request.departure, &request.arrival, request.month)
        .unwrap_or_else(|| {
            debug!(fallback = FALLBACK_DELAY_RATIO, "No history for route and month");
            FALLBACK_DELAY_RATIO
        });

    FeatureVector {
        route: route_label(&request.departure, &request.arrival),
        avg_dep_delay: request.initial_delay,
        total_delay_points: 0,
        trains_delayed_15min: 0,
        trains_delayed_30min: 0,
        trains_delayed_60min: 0,
        month: request.month,
        quarter: quarter_of(request.month),
        is_major_arrival,
        pct_delay_external: DEFAULT_PCT_DELAY_EXTERNAL,
        delay_ratio,
        cancelled_trains: 0,
    }
}
