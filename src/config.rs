//! Runtime configuration resolved from the environment.
//!
//! `main` loads `.env` through `dotenvy` before calling [`Config::from_env`],
//! and command-line flags take precedence over anything set here.

use std::path::PathBuf;

pub const DEFAULT_DATASET_PATH: &str = "cleaned_dataset.csv";
pub const DEFAULT_MODEL_PATH: &str = "tardis_best_model.json";
pub const DEFAULT_LOG_FILE_PATH: &str = "logs/tardis.log";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub dataset_path: PathBuf,
    pub model_path: PathBuf,
    pub log_file_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            log_file_path: PathBuf::from(DEFAULT_LOG_FILE_PATH),
        }
    }
}

impl Config {
    /// Reads `TARDIS_DATASET`, `TARDIS_MODEL` and `LOG_FILE_PATH`, falling
    /// back to the defaults for anything unset or empty.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(default))
        };

        Config {
            dataset_path: var("TARDIS_DATASET", DEFAULT_DATASET_PATH),
            model_path: var("TARDIS_MODEL", DEFAULT_MODEL_PATH),
            log_file_path: var("LOG_FILE_PATH", DEFAULT_LOG_FILE_PATH),
        }
    }

    /// Applies command-line overrides on top of the environment.
    pub fn with_overrides(mut self, dataset: Option<PathBuf>, model: Option<PathBuf>) -> Self {
        if let Some(dataset) = dataset {
            self.dataset_path = dataset;
        }
        if let Some(model) = model {
            self.model_path = model;
        }
        self
    }
}
