//! Delay prediction: feature assembly and the pre-trained model.
//!
//! [`Predictor`] is the seam for the trained artifact.
//! [`LinearModel`] implements it from a JSON file of coefficients.

pub mod features;
pub mod linear;
pub mod outlook;

pub use features::{FeatureVector, PredictionRequest, build_features};
pub use linear::LinearModel;
pub use outlook::{DelayLevel, Prediction, estimate};

use crate::error::Result;

/// A trained model producing an arrival delay (minutes) for one feature row.
pub trait Predictor: Send + Sync {
    fn predict(&self, features: &FeatureVector) -> Result<f64>;
}
