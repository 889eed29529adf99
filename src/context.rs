//! Loaded artifacts shared by every view.
//!
//! [`ArtifactCache`] loads each dataset and model file at most once per
//! process. [`AppContext`] is built from it at startup and handed to the
//! views by reference, so no view ever touches the filesystem.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::config::Config;
use crate::dataset::{TripTable, load_table};
use crate::error::{Result, TardisError};
use crate::model::{LinearModel, Predictor};

type Slots<T> = Mutex<HashMap<PathBuf, Arc<T>>>;

/// Process-wide cache-or-load for the two static artifacts, keyed by path.
///
/// Failed loads are not cached and may be retried. Load counters record how
/// many times a file was actually read.
#[derive(Default)]
pub struct ArtifactCache {
    tables: Slots<TripTable>,
    models: Slots<LinearModel>,
    table_loads: AtomicUsize,
    model_loads: AtomicUsize,
}

impl ArtifactCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self, path: &Path) -> Result<Arc<TripTable>> {
        cached_or_load(&self.tables, &self.table_loads, path, "Dataset", load_table)
    }

    pub fn model(&self, path: &Path) -> Result<Arc<LinearModel>> {
        cached_or_load(&self.models, &self.model_loads, path, "Model", LinearModel::load)
    }

    pub fn table_loads(&self) -> usize {
        self.table_loads.load(Ordering::Relaxed)
    }

    pub fn model_loads(&self) -> usize {
        self.model_loads.load(Ordering::Relaxed)
    }
}

// The lock is held across the load so concurrent callers read a file once.
fn cached_or_load<T>(
    slots: &Slots<T>,
    loads: &AtomicUsize,
    path: &Path,
    kind: &str,
    load: impl FnOnce(&Path) -> Result<T>,
) -> Result<Arc<T>> {
    let mut slots = slots.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(hit) = slots.get(path) {
        debug!(path = %path.display(), kind, "Cache hit");
        return Ok(Arc::clone(hit));
    }

    let loaded = Arc::new(load(path)?);
    loads.fetch_add(1, Ordering::Relaxed);
    slots.insert(path.to_path_buf(), Arc::clone(&loaded));
    Ok(loaded)
}

/// Read-only handles to the dataset and, when the view needs it, the model.
#[derive(Clone)]
pub struct AppContext {
    table: Arc<TripTable>,
    model: Option<Arc<dyn Predictor>>,
}

impl AppContext {
    pub fn new(table: Arc<TripTable>, model: Option<Arc<dyn Predictor>>) -> Self {
        AppContext { table, model }
    }

    /// Loads the dataset, and the model when `with_model` is set, through `cache`.
    pub fn open(cache: &ArtifactCache, config: &Config, with_model: bool) -> Result<Self> {
        let table = cache.table(&config.dataset_path)?;
        let model = if with_model {
            let model: Arc<dyn Predictor> = cache.model(&config.model_path)?;
            Some(model)
        } else {
            None
        };
        Ok(AppContext { table, model })
    }

    pub fn table(&self) -> &TripTable {
        &self.table
    }

    pub fn predictor(&self) -> Result<&dyn Predictor> {
        self.model.as_deref().ok_or(TardisError::ModelUnavailable)
    }
}
