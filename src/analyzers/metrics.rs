//! Arrival-delay statistics over a filtered subset.

use serde::Serialize;

use super::utility::{DelayAccumulator, pct};
use crate::dataset::TripRecord;
use crate::error::{Result, TardisError};

/// A trip counts as punctual when its average arrival delay is at most this.
pub const PUNCTUALITY_THRESHOLD_MIN: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DelayMetrics {
    pub rows: usize,
    pub mean: f64,
    pub stddev: f64,
    /// Percentage (0–100) of rows with `avg_arr_delay <= 5`.
    pub punctuality_rate: f64,
}

/// Overall situation on the selection, judged from its mean arrival delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrafficCondition {
    Good,
    Average,
    Poor,
}

impl TrafficCondition {
    pub fn from_mean_delay(mean: f64) -> Self {
        if mean < 5.0 {
            TrafficCondition::Good
        } else if mean < 15.0 {
            TrafficCondition::Average
        } else {
            TrafficCondition::Poor
        }
    }

    pub fn recommendation(&self) -> Option<&'static str> {
        match self {
            TrafficCondition::Poor => Some("Prefer alternative transport today"),
            _ => None,
        }
    }
}

/// Computes mean, sample standard deviation and punctuality rate of
/// `avg_arr_delay` over `rows`.
///
/// # Errors
///
/// Returns [`TardisError::EmptyResult`] when `rows` is empty.
pub fn compute_delay_metrics<'a, I>(rows: I) -> Result<DelayMetrics>
where
    I: IntoIterator<Item = &'a TripRecord>,
{
    let mut acc = DelayAccumulator::default();
    let mut punctual = 0usize;

    for row in rows {
        acc.push(row.avg_arr_delay);
        if row.avg_arr_delay <= PUNCTUALITY_THRESHOLD_MIN {
            punctual += 1;
        }
    }

    match (acc.mean(), acc.stddev()) {
        (Some(mean), Some(stddev)) => Ok(DelayMetrics {
            rows: acc.count(),
            mean,
            stddev,
            punctuality_rate: pct(punctual, acc.count()),
        }),
        _ => Err(TardisError::EmptyResult("the selected stations".into())),
    }
}
