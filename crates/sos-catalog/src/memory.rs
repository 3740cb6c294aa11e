//! In-memory catalog, loadable from JSON or YAML dataset descriptions.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};
use crate::types::{AxisType, CoordinateAxis, FeatureType, Station, Variable};
use crate::urn::UrnScheme;
use crate::Catalog;

/// Serialized form of a [`MemoryCatalog`].
///
/// ```yaml
/// feature_type: timeSeries
/// naming_authority: edu.example
/// entity_dimension: station
/// stations:
///   - { name: buoy1, latitude: 41.5, longitude: -70.6 }
/// variables:
///   - name: time
///     dimensions: [{ name: time, len: 2 }]
///     attributes:
///       - { name: units, value: "hours since 2020-01-01" }
///     values: [0, 1]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDescription {
    /// CF feature type name; unknown names yield an unsupported dataset.
    #[serde(default)]
    pub feature_type: Option<String>,
    #[serde(default)]
    pub naming_authority: Option<String>,
    #[serde(default)]
    pub entity_dimension: Option<String>,
    #[serde(default)]
    pub stations: Vec<Station>,
    #[serde(default)]
    pub variables: Vec<VariableDescription>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VariableDescription {
    #[serde(flatten)]
    pub variable: Variable,
    #[serde(default)]
    pub values: Vec<f64>,
}

/// A dataset held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    feature_type: Option<FeatureType>,
    urn: UrnScheme,
    entity_dimension: Option<String>,
    stations: Vec<Station>,
    variables: Vec<Variable>,
    values: HashMap<String, Vec<f64>>,
    axes: Vec<CoordinateAxis>,
}

impl MemoryCatalog {
    pub fn new(feature_type: Option<FeatureType>, naming_authority: &str) -> Self {
        Self {
            feature_type,
            urn: UrnScheme::new(naming_authority),
            ..Default::default()
        }
    }

    pub fn with_entity_dimension(mut self, name: impl Into<String>) -> Self {
        self.entity_dimension = Some(name.into());
        self
    }

    pub fn with_station(mut self, station: Station) -> Self {
        self.stations.push(station);
        self
    }

    /// Add a variable with its values.
    ///
    /// Variables recognisable as coordinate axes are registered as the axis
    /// of their type unless one was registered already.
    pub fn with_variable(mut self, variable: Variable, values: Vec<f64>) -> Self {
        if let Some(axis_type) = variable.axis_type() {
            if self.coordinate_axis(axis_type).is_none() {
                self.axes
                    .push(CoordinateAxis::from_variable(axis_type, &variable));
            }
        }
        self.values.insert(variable.name.clone(), values);
        self.variables.push(variable);
        self
    }

    /// Register `axis`, replacing any axis of the same type.
    pub fn with_axis(mut self, axis: CoordinateAxis) -> Self {
        self.axes.retain(|a| a.axis_type != axis.axis_type);
        self.axes.push(axis);
        self
    }

    pub fn from_description(desc: CatalogDescription) -> Self {
        let authority = desc.naming_authority.as_deref().unwrap_or("ncsos");
        let feature_type = desc.feature_type.as_deref().and_then(FeatureType::from_cf);

        let mut catalog = Self::new(feature_type, authority);
        catalog.entity_dimension = desc.entity_dimension;
        catalog.stations = desc.stations;
        for v in desc.variables {
            catalog = catalog.with_variable(v.variable, v.values);
        }
        catalog
    }

    pub fn from_json_str(s: &str) -> CatalogResult<Self> {
        let desc: CatalogDescription = serde_json::from_str(s)?;
        Ok(Self::from_description(desc))
    }

    pub fn from_yaml_str(s: &str) -> CatalogResult<Self> {
        let desc: CatalogDescription = serde_yaml::from_str(s)?;
        Ok(Self::from_description(desc))
    }

    /// Load a description file; the extension picks the format.
    pub fn load(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_str(&content),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&content),
            _ => Err(CatalogError::InvalidFormat(format!(
                "unsupported dataset description: {}",
                path.display()
            ))),
        }
    }
}

impl Catalog for MemoryCatalog {
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
        let var = self
            .find_variable(name)
            .ok_or_else(|| CatalogError::MissingVariable(name.to_string()))?;
        let values = self
            .values
            .get(name)
            .ok_or_else(|| CatalogError::MissingVariable(name.to_string()))?;

        let expected: usize = var.shape().iter().product();
        if values.len() != expected {
            return Err(CatalogError::InvalidFormat(format!(
                "variable {} holds {} values, shape expects {}",
                name,
                values.len(),
                expected
            )));
        }

        Ok(values.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Attribute, Dimension, FILL_VALUE, UNITS};

    fn time_var() -> Variable {
        Variable::new("time", vec![Dimension::new("time", 3)])
            .with_attribute(Attribute::text(UNITS, "hours since 2020-01-01 00:00:00"))
            .with_attribute(Attribute::text("axis", "T"))
    }

    #[test]
    fn test_axes_are_derived_from_variables() {
        let catalog = MemoryCatalog::new(Some(FeatureType::Station), "test")
            .with_variable(time_var(), vec![0.0, 1.0, 2.0]);

        let axis = catalog.coordinate_axis(AxisType::Time).unwrap();
        assert_eq!(axis.name, "time");
        assert_eq!(axis.dimensions, vec!["time".to_string()]);
        assert!(catalog.coordinate_axis(AxisType::Height).is_none());
    }

    #[test]
    fn test_time_coordinate() {
        let catalog = MemoryCatalog::new(Some(FeatureType::Station), "test")
            .with_variable(time_var(), vec![0.0, 1.0, 2.0]);

        let time = catalog.time_coordinate().unwrap();
        assert_eq!(time.first(), Some(0.0));
        assert_eq!(time.last(), Some(2.0));
        assert_eq!(time.unit.try_to_iso8601(2.0).as_deref(), Some("2020-01-01T02:00:00Z"));
        assert_eq!(time.fill_value, None);
    }

    #[test]
    fn test_time_coordinate_carries_fill_value() {
        let var = time_var().with_attribute(Attribute::number(FILL_VALUE, -999.0));
        let catalog = MemoryCatalog::new(Some(FeatureType::Station), "test")
            .with_variable(var, vec![0.0, 1.0, -999.0]);

        let time = catalog.time_coordinate().unwrap();
        assert_eq!(time.fill_value, Some(-999.0));
        assert_eq!(time.last(), Some(1.0));
    }

    #[test]
    fn test_time_coordinate_missing_axis() {
        let catalog = MemoryCatalog::new(Some(FeatureType::Station), "test");
        assert!(matches!(
            catalog.time_coordinate(),
            Err(CatalogError::MissingAxis(_))
        ));
    }

    #[test]
    fn test_read_values_checks_shape() {
        let catalog = MemoryCatalog::new(None, "test").with_variable(time_var(), vec![0.0]);
        assert!(matches!(
            catalog.read_values("time"),
            Err(CatalogError::InvalidFormat(_))
        ));
        assert!(matches!(
            catalog.read_values("nope"),
            Err(CatalogError::MissingVariable(_))
        ));
    }

    #[test]
    fn test_sensor_names_exclude_axes() {
        let catalog = MemoryCatalog::new(Some(FeatureType::Station), "test")
            .with_variable(time_var(), vec![0.0, 1.0, 2.0])
            .with_variable(
                Variable::new("temp", vec![Dimension::new("time", 3)]),
                vec![1.0, 2.0, 3.0],
            );
        assert_eq!(catalog.sensor_names(), vec!["temp"]);
    }

    #[test]
    fn test_unknown_feature_type_is_unsupported() {
        let desc = CatalogDescription {
            feature_type: Some("point".to_string()),
            ..Default::default()
        };
        assert!(MemoryCatalog::from_description(desc).feature_type().is_none());
    }
}
