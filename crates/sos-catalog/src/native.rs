//! Native NetCDF catalog using the netcdf library.
//!
//! Metadata (variables, axes, entities) is read once when the catalog is
//! opened. Values are read on demand by reopening the file, so the catalog
//! holds no library handle and can be shared across threads.

use std::path::{Path, PathBuf};
use std::sync::Once;

use tracing::{debug, warn};

use crate::error::{CatalogError, CatalogResult};
use crate::types::{
    AttrValue, Attribute, AxisType, CoordinateAxis, Dimension, FeatureType, Station, Variable,
};
use crate::urn::UrnScheme;
use crate::Catalog;

/// `cf_role` values that mark the variable naming the dataset's entities.
const ENTITY_ROLES: &[&str] = &["timeseries_id", "profile_id", "trajectory_id"];

/// Silence HDF5's automatic error printing to stderr.
///
/// Safe to call multiple times; only the first call does anything.
pub fn silence_hdf5_errors() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        // SAFETY: H5Eset_auto2 is thread-safe and we're passing null pointers
        // to disable error output, which is a documented valid use.
        unsafe {
            hdf5_metno_sys::h5e::H5Eset_auto2(
                hdf5_metno_sys::h5e::H5E_DEFAULT,
                None,
                std::ptr::null_mut(),
            );
        }
    });
}

/// Catalog over a CF-convention NetCDF file.
#[derive(Debug, Clone)]
pub struct NetCdfCatalog {
    path: PathBuf,
    feature_type: Option<FeatureType>,
    urn: UrnScheme,
    entity_dimension: Option<String>,
    stations: Vec<Station>,
    variables: Vec<Variable>,
    axes: Vec<CoordinateAxis>,
}

impl NetCdfCatalog {
    pub fn open(path: impl AsRef<Path>, naming_authority: &str) -> CatalogResult<Self> {
        silence_hdf5_errors();

        let path = path.as_ref().to_path_buf();
        let file = open_file(&path)?;

        let variables: Vec<Variable> = file.variables().map(|v| convert_variable(&v)).collect();

        let mut axes: Vec<CoordinateAxis> = Vec::new();
        for var in &variables {
            if let Some(axis_type) = var.axis_type() {
                if !axes.iter().any(|a| a.axis_type == axis_type) {
                    axes.push(CoordinateAxis::from_variable(axis_type, var));
                }
            }
        }

        let feature_type = global_text(&file, "featureType")
            .or_else(|| global_text(&file, "cdm_data_type"))
            .and_then(|s| FeatureType::from_cf(&s))
            .or_else(|| infer_grid(&axes));

        let entity_var = variables.iter().find(|v| {
            v.attribute("cf_role")
                .and_then(AttrValue::as_str)
                .is_some_and(|role| ENTITY_ROLES.contains(&role))
        });
        let entity_dimension = entity_var
            .and_then(|v| v.dimensions.first())
            .map(|d| d.name.clone());

        let mut stations = match (entity_var, &entity_dimension) {
            (Some(var), Some(dim)) => read_entity_names(&file, &var.name, dim, &variables),
            _ => Vec::new(),
        };
        if let Some(dim) = &entity_dimension {
            locate_entities(&file, dim, &axes, &mut stations);
        }

        debug!(
            path = %path.display(),
            variables = variables.len(),
            stations = stations.len(),
            feature_type = ?feature_type,
            "Opened NetCDF catalog"
        );

        Ok(Self {
            path,
            feature_type,
            urn: UrnScheme::new(naming_authority),
            entity_dimension,
            stations,
            variables,
            axes,
        })
    }
}

impl Catalog for NetCdfCatalog {
    fn variables(&self) -> &[Variable] {
        &self.variables
    }

    fn coordinate_axis(&self, axis_type: AxisType) -> Option<&CoordinateAxis> {
        self.axes.iter().find(|a| a.axis_type == axis_type)
    }

    fn feature_type(&self) -> Option<FeatureType> {
        self.feature_type
    }

    fn stations(&self) -> &[Station] {
        &self.stations
    }

    fn entity_dimension(&self) -> Option<&str> {
        self.entity_dimension.as_deref()
    }

    fn urn_scheme(&self) -> &UrnScheme {
        &self.urn
    }

    fn read_values(&self, name: &str) -> CatalogResult<Vec<f64>> {
        let file = open_file(&self.path)?;
        let var = file
            .variable(name)
            .ok_or_else(|| CatalogError::MissingVariable(name.to_string()))?;
        var.get_values::<f64, _>(..)
            .map_err(|e| CatalogError::NetCdf(format!("Failed to read {}: {}", name, e)))
    }
}

// =============================================================================
// Internal helpers
// =============================================================================

fn open_file(path: &Path) -> CatalogResult<netcdf::File> {
    netcdf::open(path)
        .map_err(|e| CatalogError::NetCdf(format!("Failed to open {}: {}", path.display(), e)))
}

fn convert_variable(var: &netcdf::Variable) -> Variable {
    let dimensions = var
        .dimensions()
        .iter()
        .map(|d| Dimension::new(d.name(), d.len()))
        .collect();

    let attributes = var
        .attributes()
        .filter_map(|attr| {
            let value = convert_value(attr.value().ok()?)?;
            Some(Attribute {
                name: attr.name().to_string(),
                value,
            })
        })
        .collect();

    Variable {
        name: var.name(),
        dimensions,
        attributes,
    }
}

fn convert_value(value: netcdf::AttributeValue) -> Option<AttrValue> {
    match value {
        netcdf::AttributeValue::Str(s) => Some(AttrValue::Text(s)),
        other => f64::try_from(other).ok().map(AttrValue::Number),
    }
}

fn global_text(file: &netcdf::File, name: &str) -> Option<String> {
    match file.attribute(name)?.value().ok()? {
        netcdf::AttributeValue::Str(s) => Some(s),
        _ => None,
    }
}

/// Files without a feature type attribute are treated as grids when latitude
/// and longitude are independent 1-D axes.
fn infer_grid(axes: &[CoordinateAxis]) -> Option<FeatureType> {
    let lat = axes.iter().find(|a| a.axis_type == AxisType::Lat)?;
    let lon = axes.iter().find(|a| a.axis_type == AxisType::Lon)?;
    (lat.rank() == 1 && lon.rank() == 1 && lat.dimensions != lon.dimensions)
        .then_some(FeatureType::Grid)
}

fn read_entity_names(
    file: &netcdf::File,
    var_name: &str,
    dim: &str,
    variables: &[Variable],
) -> Vec<Station> {
    let count = variables
        .iter()
        .find(|v| v.name == var_name)
        .and_then(|v| v.dimensions.first())
        .map(|d| d.len)
        .unwrap_or(0);

    let Some(var) = file.variable(var_name) else {
        return Vec::new();
    };

    (0..count)
        .map(|i| {
            let name = var
                .get_string(i)
                .map(|s| s.trim_end_matches('\0').trim().to_string())
                .unwrap_or_else(|e| {
                    warn!("Could not read entity name {} of {}: {}", i, var_name, e);
                    format!("{}_{}", dim, i)
                });
            Station::new(name)
        })
        .collect()
}

/// Fill in fixed positions for entities whose lat/lon are indexed by the
/// entity dimension alone.
fn locate_entities(
    file: &netcdf::File,
    dim: &str,
    axes: &[CoordinateAxis],
    stations: &mut [Station],
) {
    let read_axis = |axis_type: AxisType| -> Option<Vec<f64>> {
        let axis = axes.iter().find(|a| a.axis_type == axis_type)?;
        if axis.dimensions != [dim] {
            return None;
        }
        file.variable(&axis.name)?.get_values::<f64, _>(..).ok()
    };

    if let (Some(lats), Some(lons)) = (read_axis(AxisType::Lat), read_axis(AxisType::Lon)) {
        for (i, station) in stations.iter_mut().enumerate() {
            station.latitude = lats.get(i).copied();
            station.longitude = lons.get(i).copied();
        }
    }
}
