//! Turns a raw model output into a user-facing delay estimate.

use serde::Serialize;

use super::Predictor;
use super::features::FeatureVector;
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DelayLevel {
    Low,
    Moderate,
    Severe,
}

impl DelayLevel {
    pub fn from_minutes(minutes: f64) -> Self {
        if minutes < 5.0 {
            DelayLevel::Low
        } else if minutes < 15.0 {
            DelayLevel::Moderate
        } else {
            DelayLevel::Severe
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            DelayLevel::Low => "Minimal delay expected",
            DelayLevel::Moderate => "Moderate delay expected",
            DelayLevel::Severe => "Significant delay expected",
        }
    }

    pub fn advice(&self) -> &'static [&'static str] {
        match self {
            DelayLevel::Low => &[
                "Your trip should run normally",
                "A 5-10 minute margin is enough",
                "Have a good trip!",
            ],
            DelayLevel::Moderate => &[
                "Plan a 15-20 minute margin",
                "Follow real-time information during your trip",
                "Identify alternative connections at the station",
            ],
            DelayLevel::Severe => &[
                "Plan at least 30 extra minutes",
                "Avoid important appointments right after arrival",
                "Check alternative transport before leaving",
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Estimated arrival delay in minutes, never negative.
    pub minutes: f64,
    pub level: DelayLevel,
    pub features: FeatureVector,
}

/// Runs the predictor and clamps its output at zero.
pub fn estimate(predictor: &dyn Predictor, features: FeatureVector) -> Result<Prediction> {
    let minutes = predictor.predict(&features)?.max(0.0);
    Ok(Prediction {
        minutes,
        level: DelayLevel::from_minutes(minutes),
        features,
    })
}
