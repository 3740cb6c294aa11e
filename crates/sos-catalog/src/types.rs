//! Catalog entity types: variables, attributes, coordinate axes and stations.

use std::fmt;

use serde::{Deserialize, Serialize};
use sos_common::TimeUnit;

/// Attribute carrying the CF standard name of a variable.
pub const STANDARD_NAME: &str = "standard_name";
/// Attribute carrying the fill value of a variable.
pub const FILL_VALUE: &str = "_FillValue";
/// Attribute carrying the physical units of a variable.
pub const UNITS: &str = "units";

/// Vocabulary prefix used to build observed-property URLs from standard names.
pub const CF_PARAMETER_VOCABULARY: &str = "http://mmisw.org/ont/cf/parameter/";

/// Semantic type of a coordinate axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisType {
    Height,
    Lat,
    Lon,
    Time,
}

impl fmt::Display for AxisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AxisType::Height => "height",
            AxisType::Lat => "latitude",
            AxisType::Lon => "longitude",
            AxisType::Time => "time",
        };
        f.write_str(name)
    }
}

/// Geophysical shape of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FeatureType {
    Grid,
    Trajectory,
    /// Fixed-station time series.
    Station,
    /// Time series of vertical profiles at fixed stations.
    StationProfile,
    Profile,
    /// Trajectory of profiles.
    Section,
}

impl FeatureType {
    /// Classify a CF `featureType` (or legacy `cdm_data_type`) attribute value.
    ///
    /// Returns `None` for shapes GetObservation cannot serve (e.g. `point`).
    pub fn from_cf(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "grid" => Some(FeatureType::Grid),
            "trajectory" => Some(FeatureType::Trajectory),
            "timeseries" | "station" => Some(FeatureType::Station),
            "timeseriesprofile" | "station_profile" => Some(FeatureType::StationProfile),
            "profile" => Some(FeatureType::Profile),
            "trajectoryprofile" | "section" => Some(FeatureType::Section),
            _ => None,
        }
    }
}

/// Attribute value, numeric or text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Number(f64),
    Text(String),
}

impl AttrValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            AttrValue::Number(_) => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number(v) => Some(*v),
            AttrValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Number(v) => write!(f, "{}", v),
            AttrValue::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: AttrValue,
}

impl Attribute {
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: AttrValue::Text(value.into()),
        }
    }

    pub fn number(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value: AttrValue::Number(value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimension {
    pub name: String,
    pub len: usize,
}

impl Dimension {
    pub fn new(name: impl Into<String>, len: usize) -> Self {
        Self {
            name: name.into(),
            len,
        }
    }
}

/// A dataset variable: name, shape and attributes. Values are read through
/// [`crate::Catalog::read_values`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub name: String,
    #[serde(default)]
    pub dimensions: Vec<Dimension>,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl Variable {
    pub fn new(name: impl Into<String>, dimensions: Vec<Dimension>) -> Self {
        Self {
            name: name.into(),
            dimensions,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Look up an attribute; names compare case-insensitively.
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| &a.value)
    }

    pub fn standard_name(&self) -> Option<&str> {
        self.attribute(STANDARD_NAME).and_then(AttrValue::as_str)
    }

    pub fn units(&self) -> Option<&str> {
        self.attribute(UNITS).and_then(AttrValue::as_str)
    }

    pub fn fill_value(&self) -> Option<&AttrValue> {
        self.attribute(FILL_VALUE)
    }

    /// Numeric `_FillValue`, for comparing against read values.
    pub fn fill_number(&self) -> Option<f64> {
        self.fill_value().and_then(AttrValue::as_f64)
    }

    /// Name without any group path.
    pub fn short_name(&self) -> &str {
        short_name(&self.name)
    }

    pub fn shape(&self) -> Vec<usize> {
        self.dimensions.iter().map(|d| d.len).collect()
    }

    /// Observed-property URL derived from the standard name, if present.
    pub fn observed_property_url(&self) -> Option<String> {
        self.standard_name()
            .map(|s| format!("{}{}", CF_PARAMETER_VOCABULARY, s))
    }

    /// Infer which coordinate axis, if any, this variable describes.
    ///
    /// Checks `_CoordinateAxisType`, then `axis`, then `standard_name`, then
    /// the `units` conventions for latitude/longitude.
    pub fn axis_type(&self) -> Option<AxisType> {
        if let Some(kind) = self.attribute("_CoordinateAxisType").and_then(AttrValue::as_str) {
            match kind.to_ascii_lowercase().as_str() {
                "lat" => return Some(AxisType::Lat),
                "lon" => return Some(AxisType::Lon),
                "time" => return Some(AxisType::Time),
                "height" | "pressure" | "geoz" => return Some(AxisType::Height),
                _ => {}
            }
        }

        if let Some(axis) = self.attribute("axis").and_then(AttrValue::as_str) {
            match axis.to_ascii_uppercase().as_str() {
                "Y" => return Some(AxisType::Lat),
                "X" => return Some(AxisType::Lon),
                "T" => return Some(AxisType::Time),
                "Z" => return Some(AxisType::Height),
                _ => {}
            }
        }

        match self.standard_name() {
            Some("latitude") => return Some(AxisType::Lat),
            Some("longitude") => return Some(AxisType::Lon),
            Some("time") => return Some(AxisType::Time),
            Some("height") | Some("altitude") | Some("depth") => return Some(AxisType::Height),
            _ => {}
        }

        match self.units() {
            Some("degrees_north") | Some("degree_north") => Some(AxisType::Lat),
            Some("degrees_east") | Some("degree_east") => Some(AxisType::Lon),
            _ => None,
        }
    }
}

/// A coordinate axis of the dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinateAxis {
    pub axis_type: AxisType,
    /// Full variable name of the axis.
    pub name: String,
    /// Names of the dimensions the axis spans.
    #[serde(default)]
    pub dimensions: Vec<String>,
}

impl CoordinateAxis {
    pub fn from_variable(axis_type: AxisType, var: &Variable) -> Self {
        Self {
            axis_type,
            name: var.name.clone(),
            dimensions: var.dimensions.iter().map(|d| d.name.clone()).collect(),
        }
    }

    pub fn short_name(&self) -> &str {
        short_name(&self.name)
    }

    pub fn rank(&self) -> usize {
        self.dimensions.len()
    }
}

/// A monitored entity: station, trajectory, profile or section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub name: String,
    /// Fixed position, for entities that have one.
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
}

impl Station {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            latitude: None,
            longitude: None,
        }
    }

    pub fn at(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude: Some(latitude),
            longitude: Some(longitude),
        }
    }
}

/// Values and units of the dataset's time coordinate.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeCoordinate {
    pub values: Vec<f64>,
    pub unit: TimeUnit,
    /// `_FillValue` of the time variable.
    pub fill_value: Option<f64>,
}

impl TimeCoordinate {
    /// Non-finite values and the fill value stand for a missing time step.
    pub fn is_missing(&self, value: f64) -> bool {
        is_missing_time(value, self.fill_value)
    }

    /// First time step that is not missing.
    pub fn first(&self) -> Option<f64> {
        self.values.iter().copied().find(|v| !self.is_missing(*v))
    }

    /// Last time step that is not missing.
    pub fn last(&self) -> Option<f64> {
        self.values.iter().rev().copied().find(|v| !self.is_missing(*v))
    }
}

/// Whether a raw time value is a gap rather than a real instant.
pub fn is_missing_time(value: f64, fill_value: Option<f64>) -> bool {
    !value.is_finite() || fill_value == Some(value)
}

fn short_name(name: &str) -> &str {
    name.rsplit('/').next().unwrap_or(name)
}
