//! Linear regression artifact stored as JSON.
//!
//! ```json
//! {
//!   "intercept": 1.8,
//!   "coefficients": { "avg_dep_delay": 0.9, "delay_ratio": 2.1, ... },
//!   "route_effects": { "PARIS LYON ➜ MARSEILLE ST CHARLES": 1.4 },
//!   "default_route_effect": 0.0
//! }
//! ```
//!
//! `coefficients` must name every numeric feature exactly once.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::Predictor;
use super::features::{FeatureVector, NUMERIC_FEATURES};
use crate::error::{Result, TardisError};

#[derive(Debug, Clone, Deserialize)]
pub struct LinearModel {
    intercept: f64,
    coefficients: HashMap<String, f64>,
    #[serde(default)]
    route_effects: HashMap<String, f64>,
    #[serde(default)]
    default_route_effect: f64,
}

impl LinearModel {
    /// Reads and validates the artifact at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`TardisError::Load`] when the file is missing, is not valid
    /// JSON, or its coefficients do not match the feature schema.
    #[tracing::instrument(fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| TardisError::load(path, e))?;
        let model = Self::from_json(&content).map_err(|e| match e {
            TardisError::Load { reason, .. } => TardisError::load(path, reason),
            other => other,
        })?;

        info!(routes = model.route_effects.len(), "Model loaded");
        Ok(model)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let model: LinearModel =
            serde_json::from_str(content).map_err(|e| TardisError::load("<model>", e))?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<()> {
        let expected: BTreeSet<&str> = NUMERIC_FEATURES.into_iter().collect();
        let actual: BTreeSet<&str> = self.coefficients.keys().map(String::as_str).collect();

        let missing: Vec<&str> = expected.difference(&actual).copied().collect();
        let unknown: Vec<&str> = actual.difference(&expected).copied().collect();

        if !missing.is_empty() || !unknown.is_empty() {
            return Err(TardisError::load(
                "<model>",
                format!(
                    "feature schema mismatch (missing: [{}], unknown: [{}])",
                    missing.join(", "),
                    unknown.join(", ")
                ),
            ));
        }

        let all_finite = std::iter::once(self.intercept)
            .chain(std::iter::once(self.default_route_effect))
            .chain(self.coefficients.values().copied())
            .chain(self.route_effects.values().copied())
            .all(f64::is_finite);
        if !all_finite {
            return Err(TardisError::load("<model>", "non-finite parameter"));
        }

        Ok(())
    }
}

impl Predictor for LinearModel {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        let route_effect = self
            .route_effects
            .get(&features.route)
            .copied()
            .unwrap_or(self.default_route_effect);

        let mut total = self.intercept + route_effect;
        for (name, value) in features.numeric() {
            if !value.is_finite() {
                return Err(TardisError::Prediction(format!("feature {name} is not finite")));
            }
            let coef = self.coefficients.get(name).ok_or_else(|| {
                TardisError::Prediction(format!("model has no coefficient for {name}"))
            })?;
            total += coef * value;
        }

        if !total.is_finite() {
            return Err(TardisError::Prediction("model output is not finite".into()));
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model_json(extra_coef: &str) -> String {
        format!(
            r#"{{
                "intercept": 1.0,
                "coefficients": {{
                    "avg_dep_delay": 0.5,
                    "total_delay_points": 0.0,
                    "trains_delayed_15min": 0.0,
                    "trains_delayed_30min": 0.0,
                    "trains_delayed_60min": 0.0,
                    "month": 0.1,
                    "quarter": 0.0,
                    "is_major_arrival": -1.0,
                    "pct_delay_external": 2.0,
                    "delay_ratio": 3.0{extra_coef}
                }},
                "route_effects": {{ "A ➜ B": 4.0 }}
            }}"#
        )
    }

    fn features(route: &str) -> FeatureVector {
        FeatureVector {
            route: route.into(),
            avg_dep_delay: 10.0,
            total_delay_points: 0,
            trains_delayed_15min: 0,
            trains_delayed_30min: 0,
            trains_delayed_60min: 0,
            month: 5,
            quarter: 2,
            is_major_arrival: 1,
            pct_delay_external: 0.1,
            delay_ratio: 0.2,
            cancelled_trains: 0,
        }
    }

    #[test]
    fn test_predict_known_route() {
        let model = LinearModel::from_json(&model_json(r#", "cancelled_trains": 0.0"#)).unwrap();
        // 1 + 4 + 5 + 0.5 - 1 + 0.2 + 0.6
        let y = model.predict(&features("A ➜ B")).unwrap();
        assert!((y - 10.3).abs() < 1e-9);
    }

    #[test]
    fn test_predict_unknown_route_uses_default() {
        let model = LinearModel::from_json(&model_json(r#", "cancelled_trains": 0.0"#)).unwrap();
        let y = model.predict(&features("C ➜ D")).unwrap();
        assert!((y - 6.3).abs() < 1e-9);
    }

    #[test]
    fn test_missing_coefficient_is_load_error() {
        let err = LinearModel::from_json(&model_json("")).unwrap_err();
        assert!(matches!(err, TardisError::Load { .. }));
        assert!(err.to_string().contains("cancelled_trains"));
    }

    #[test]
    fn test_unknown_coefficient_is_load_error() {
        let err = LinearModel::from_json(&model_json(
            r#", "cancelled_trains": 0.0, "hour": 1.0"#,
        ))
        .unwrap_err();
        assert!(err.to_string().contains("unknown: [hour]"));
    }

    #[test]
    fn test_corrupt_json() {
        assert!(LinearModel::from_json("{ not json").is_err());
    }

    #[test]
    fn test_non_finite_feature_fails_loudly() {
        let model = LinearModel::from_json(&model_json(r#", "cancelled_trains": 0.0"#)).unwrap();
        let mut fv = features("A ➜ B");
        fv.delay_ratio = f64::INFINITY;
        assert!(matches!(model.predict(&fv), Err(TardisError::Prediction(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let err = LinearModel::load(Path::new("/nope/model.json")).unwrap_err();
        assert!(err.to_string().contains("/nope/model.json"));
    }
}
