//! Dataset registry loading.
//!
//! Every YAML file directly under the configuration directory registers one
//! dataset:
//!
//! ```yaml
//! id: buoys
//! title: Coastal buoys
//! source: datasets/station_timeseries.yaml
//! default: true
//! ```
//!
//! `source` is resolved against the configuration directory. Dataset
//! descriptions (`.yaml`, `.yml`, `.json`) load into memory; `.nc` files need
//! the `netcdf` feature.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use sos_catalog::{Catalog, MemoryCatalog};

/// Naming authority used when a NetCDF dataset configures none.
pub const DEFAULT_NAMING_AUTHORITY: &str = "ncsos";

/// All configured datasets.
#[derive(Debug, Clone, Default)]
pub struct SosConfig {
    /// Sorted by id.
    pub datasets: Vec<DatasetConfig>,
}

impl SosConfig {
    /// Load configuration from a directory of YAML files.
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();

        if !dir.exists() {
            tracing::warn!(
                "SOS config directory {} does not exist, serving no datasets",
                dir.display()
            );
            return Ok(Self::default());
        }

        let mut datasets: Vec<DatasetConfig> = Vec::new();
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?
        {
            let file_path = entry?.path();
            let is_yaml = file_path
                .extension()
                .is_some_and(|ext| ext == "yaml" || ext == "yml");
            if !file_path.is_file() || !is_yaml {
                continue;
            }

            let content = std::fs::read_to_string(&file_path)
                .with_context(|| format!("Failed to read: {:?}", file_path))?;
            let mut config: DatasetConfig = serde_yaml::from_str(&content)
                .with_context(|| format!("Failed to parse: {:?}", file_path))?;
            config.source = dir.join(&config.source);

            if datasets.iter().any(|d| d.id == config.id) {
                bail!("Duplicate dataset id {} in {:?}", config.id, file_path);
            }
            tracing::info!(dataset = %config.id, source = ?config.source, "Registered dataset");
            datasets.push(config);
        }

        datasets.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(Self { datasets })
    }

    /// The dataset marked `default`, else the first by id.
    pub fn default_dataset(&self) -> Option<&DatasetConfig> {
        self.datasets
            .iter()
            .find(|d| d.default)
            .or_else(|| self.datasets.first())
    }
}

/// One served dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Path segment under `/sos/`.
    pub id: String,

    #[serde(default)]
    pub title: String,

    /// Dataset description or NetCDF file.
    pub source: PathBuf,

    /// Authority used in station URNs of NetCDF datasets.
    #[serde(default)]
    pub naming_authority: Option<String>,

    /// Serve this dataset at `/sos` when no dataset is named.
    #[serde(default)]
    pub default: bool,
}

impl DatasetConfig {
    /// Open the dataset's catalog.
    pub fn open(&self) -> Result<Arc<dyn Catalog>> {
        let extension = self
            .source
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        match extension {
            "yaml" | "yml" | "json" => {
                let catalog = MemoryCatalog::load(&self.source)
                    .with_context(|| format!("Failed to load dataset {}", self.id))?;
                Ok(Arc::new(catalog))
            }
            "nc" => self.open_netcdf(),
            other => bail!(
                "Dataset {} has an unsupported source type: {:?}",
                self.id,
                other
            ),
        }
    }

    #[cfg(feature = "netcdf")]
    fn open_netcdf(&self) -> Result<Arc<dyn Catalog>> {
        let authority = self
            .naming_authority
            .as_deref()
            .unwrap_or(DEFAULT_NAMING_AUTHORITY);
        let catalog = sos_catalog::NetCdfCatalog::open(&self.source, authority)
            .with_context(|| format!("Failed to open dataset {}", self.id))?;
        Ok(Arc::new(catalog))
    }

    #[cfg(not(feature = "netcdf"))]
    fn open_netcdf(&self) -> Result<Arc<dyn Catalog>> {
        bail!(
            "Dataset {} is a NetCDF file but the service was built without the netcdf feature",
            self.id
        )
    }
}
