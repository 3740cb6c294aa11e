//! Read-only catalog access over scientific array datasets.
//!
//! The [`Catalog`] trait is the seam between GetObservation handling and the
//! storage that holds the data. It answers the questions request resolution
//! needs ("does variable X exist", "which axis is time", "which stations are
//! there") and reads variable values for extraction.
//!
//! Two implementations ship with this crate:
//! - [`MemoryCatalog`]: an in-memory dataset, loadable from JSON or YAML
//!   descriptions. Used by tests and for small static datasets.
//! - `NetCdfCatalog` (feature `netcdf`): reads CF-convention NetCDF files
//!   through the native netcdf library.

pub mod error;
pub mod memory;
#[cfg(feature = "netcdf")]
pub mod native;
pub mod types;
pub mod urn;

pub use error::{CatalogError, CatalogResult};
pub use memory::{CatalogDescription, MemoryCatalog};
#[cfg(feature = "netcdf")]
pub use native::NetCdfCatalog;
pub use types::{
    is_missing_time, AttrValue, Attribute, AxisType, CoordinateAxis, Dimension, FeatureType,
    Station, TimeCoordinate, Variable,
};
pub use urn::UrnScheme;

use sos_common::TimeUnit;

/// Read-only facade over one dataset.
///
/// Implementations must be safe to share between concurrently running
/// requests; nothing in this trait mutates the dataset.
pub trait Catalog: Send + Sync {
    /// All variables of the dataset, in declaration order.
    fn variables(&self) -> &[Variable];

    /// Coordinate axis of the given semantic type, if the dataset has one.
    fn coordinate_axis(&self, axis_type: AxisType) -> Option<&CoordinateAxis>;

    /// Feature classification of the dataset; `None` when unsupported.
    fn feature_type(&self) -> Option<FeatureType>;

    /// Entities (stations, trajectories, profiles, sections) in index order.
    fn stations(&self) -> &[Station];

    /// Name of the dimension that indexes [`Catalog::stations`], if any.
    fn entity_dimension(&self) -> Option<&str>;

    fn urn_scheme(&self) -> &UrnScheme;

    /// Read all values of a variable as a flat row-major array.
    fn read_values(&self, name: &str) -> CatalogResult<Vec<f64>>;

    fn find_variable(&self, name: &str) -> Option<&Variable> {
        self.variables().iter().find(|v| v.name == name)
    }

    fn station_urn(&self, name: &str) -> String {
        self.urn_scheme().station_urn(name)
    }

    fn network_all_urn(&self) -> String {
        self.urn_scheme().network_all()
    }

    /// Data variables exposed as sensors on every station.
    ///
    /// Coordinate axes and dimensionless variables are not sensors.
    fn sensor_names(&self) -> Vec<&str> {
        self.variables()
            .iter()
            .filter(|v| !v.dimensions.is_empty() && v.axis_type().is_none())
            .filter(|v| v.attribute("cf_role").is_none())
            .filter(|v| Some(v.name.as_str()) != self.entity_dimension())
            .map(|v| v.name.as_str())
            .collect()
    }

    /// Sensor URNs of the station with the given URN.
    fn sensor_urns(&self, station_urn: &str) -> Vec<String> {
        self.sensor_names()
            .into_iter()
            .map(|s| self.urn_scheme().sensor_urn(station_urn, s))
            .collect()
    }

    /// Values and units of the time coordinate.
    fn time_coordinate(&self) -> CatalogResult<TimeCoordinate> {
        let axis = self
            .coordinate_axis(AxisType::Time)
            .ok_or_else(|| CatalogError::MissingAxis(AxisType::Time.to_string()))?;
        let var = self
            .find_variable(&axis.name)
            .ok_or_else(|| CatalogError::MissingVariable(axis.name.clone()))?;
        let units = var.units().ok_or_else(|| {
            CatalogError::InvalidFormat(format!("time variable {} has no units", var.name))
        })?;
        let unit = TimeUnit::parse(units)
            .map_err(|e| CatalogError::InvalidFormat(e.to_string()))?;
        let values = self.read_values(&var.name)?;

        Ok(TimeCoordinate {
            values,
            unit,
            fill_value: var.fill_number(),
        })
    }
}
