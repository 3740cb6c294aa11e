//! Application state for the SOS API.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use sos_catalog::Catalog;

use crate::config::{DatasetConfig, SosConfig};

/// A configured dataset and its opened catalog.
#[derive(Clone)]
pub struct Dataset {
    pub config: DatasetConfig,
    pub catalog: Arc<dyn Catalog>,
}

/// Shared application state.
pub struct AppState {
    datasets: HashMap<String, Dataset>,
    default_dataset: Option<String>,
}

impl AppState {
    /// Load and open every dataset registered in `config_dir`.
    ///
    /// A dataset that fails to open fails startup.
    pub fn load(config_dir: impl AsRef<Path>) -> Result<Self> {
        let config = SosConfig::load_from_dir(config_dir)?;
        let default_dataset = config.default_dataset().map(|d| d.id.clone());

        let mut datasets = Vec::with_capacity(config.datasets.len());
        for dataset in config.datasets {
            let catalog = dataset.open()?;
            tracing::info!(
                dataset = %dataset.id,
                feature_type = ?catalog.feature_type(),
                stations = catalog.stations().len(),
                "Opened dataset"
            );
            datasets.push(Dataset {
                config: dataset,
                catalog,
            });
        }

        Ok(Self::new(datasets, default_dataset))
    }

    pub fn new(datasets: Vec<Dataset>, default_dataset: Option<String>) -> Self {
        Self {
            datasets: datasets
                .into_iter()
                .map(|d| (d.config.id.clone(), d))
                .collect(),
            default_dataset,
        }
    }

    pub fn dataset(&self, id: &str) -> Option<&Dataset> {
        self.datasets.get(id)
    }

    pub fn default_dataset(&self) -> Option<&Dataset> {
        self.default_dataset
            .as_deref()
            .and_then(|id| self.dataset(id))
    }

    pub fn dataset_count(&self) -> usize {
        self.datasets.len()
    }
}
