//! Value access shared by the extractors.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use chrono::{DateTime, Utc};
use sos_catalog::{is_missing_time, AxisType, Catalog, CatalogError, CoordinateAxis};
use sos_common::{parse_iso8601, SosError, SosResult, TimeUnit};

/// Index position along named dimensions. Dimensions not listed read
/// index 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor(Vec<(String, usize)>);

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the index along `dim`, replacing any earlier index.
    pub fn at(mut self, dim: &str, index: usize) -> Self {
        self.0.retain(|(d, _)| d != dim);
        self.0.push((dim.to_string(), index));
        self
    }

    /// Like [`Cursor::at`], skipped when the dimension is unknown.
    pub fn at_opt(self, dim: Option<&str>, index: usize) -> Self {
        match dim {
            Some(d) => self.at(d, index),
            None => self,
        }
    }

    pub fn get(&self, dim: &str) -> usize {
        self.0
            .iter()
            .find(|(d, _)| d == dim)
            .map(|(_, i)| *i)
            .unwrap_or(0)
    }
}

/// Dataset reads for one request, cached per variable.
pub struct Source<'a> {
    catalog: &'a dyn Catalog,
    time_axis: CoordinateAxis,
    time_unit: TimeUnit,
    time_fill: Option<f64>,
    window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    cache: RefCell<HashMap<String, Rc<Vec<f64>>>>,
}

impl<'a> Source<'a> {
    /// Fails when the dataset has no usable time axis or an interval
    /// endpoint is not an ISO-8601 time.
    pub fn new(catalog: &'a dyn Catalog, interval: Option<&(String, String)>) -> SosResult<Self> {
        let window = interval
            .map(|(start, end)| Ok::<_, SosError>((parse_event_time(start)?, parse_event_time(end)?)))
            .transpose()?;

        let time_axis = catalog
            .coordinate_axis(AxisType::Time)
            .ok_or_else(|| CatalogError::MissingAxis(AxisType::Time.to_string()))?
            .clone();
        let time_var = catalog
            .find_variable(&time_axis.name)
            .ok_or_else(|| CatalogError::MissingVariable(time_axis.name.clone()))?;
        let units = time_var.units().ok_or_else(|| {
            CatalogError::InvalidFormat(format!("time variable {} has no units", time_axis.name))
        })?;
        let time_fill = time_var.fill_number();
        let time_unit =
            TimeUnit::parse(units).map_err(|e| CatalogError::InvalidFormat(e.to_string()))?;

        Ok(Self {
            catalog,
            time_axis,
            time_unit,
            time_fill,
            window,
            cache: RefCell::new(HashMap::new()),
        })
    }

    pub fn catalog(&self) -> &'a dyn Catalog {
        self.catalog
    }

    pub fn entity_dimension(&self) -> Option<&'a str> {
        self.catalog.entity_dimension()
    }

    /// The dimension time steps run along.
    pub fn time_dimension(&self) -> Option<&str> {
        self.time_axis.dimensions.last().map(String::as_str)
    }

    /// The dimension vertical levels run along.
    pub fn height_dimension(&self) -> Option<&'a str> {
        self.catalog
            .coordinate_axis(AxisType::Height)
            .and_then(|a| a.dimensions.last())
            .map(String::as_str)
    }

    pub fn axis_name(&self, axis_type: AxisType) -> Option<&'a str> {
        self.catalog
            .coordinate_axis(axis_type)
            .map(|a| a.name.as_str())
    }

    /// Length of a dimension, 1 when the dataset does not declare it.
    pub fn dimension_len(&self, dim: Option<&str>) -> usize {
        let Some(dim) = dim else {
            return 1;
        };
        self.catalog
            .variables()
            .iter()
            .flat_map(|v| v.dimensions.iter())
            .find(|d| d.name == dim)
            .map(|d| d.len)
            .unwrap_or(1)
    }

    pub fn values(&self, name: &str) -> SosResult<Rc<Vec<f64>>> {
        if let Some(values) = self.cache.borrow().get(name) {
            return Ok(Rc::clone(values));
        }
        let values = Rc::new(self.catalog.read_values(name)?);
        self.cache
            .borrow_mut()
            .insert(name.to_string(), Rc::clone(&values));
        Ok(values)
    }

    /// The value of `name` at the cursor position.
    pub fn value(&self, name: &str, cursor: &Cursor) -> SosResult<f64> {
        let var = self
            .catalog
            .find_variable(name)
            .ok_or_else(|| CatalogError::MissingVariable(name.to_string()))?;
        let values = self.values(name)?;

        let mut offset = 0;
        for dim in &var.dimensions {
            let index = cursor.get(&dim.name).min(dim.len.saturating_sub(1));
            offset = offset * dim.len + index;
        }
        Ok(values.get(offset).copied().unwrap_or(f64::NAN))
    }

    /// Values of several variables at one position.
    pub fn row(&self, names: &[String], cursor: &Cursor) -> SosResult<Vec<f64>> {
        names.iter().map(|n| self.value(n, cursor)).collect()
    }

    /// Time at the cursor; `None` for missing steps (fill, NaN or out of
    /// range), which extractors skip.
    pub fn time_at(&self, cursor: &Cursor) -> SosResult<Option<DateTime<Utc>>> {
        let raw = self.value(&self.time_axis.name, cursor)?;
        if is_missing_time(raw, self.time_fill) {
            return Ok(None);
        }
        Ok(self.time_unit.try_to_datetime(raw))
    }

    pub fn in_window(&self, time: &DateTime<Utc>) -> bool {
        match &self.window {
            Some((start, end)) => start <= time && time <= end,
            None => true,
        }
    }

    /// Latitude/longitude read from the coordinate axes at the cursor.
    pub fn position_at(&self, cursor: &Cursor) -> SosResult<Option<(f64, f64)>> {
        let (Some(lat), Some(lon)) = (self.axis_name(AxisType::Lat), self.axis_name(AxisType::Lon))
        else {
            return Ok(None);
        };
        let lat = self.value(lat, cursor)?;
        let lon = self.value(lon, cursor)?;
        Ok((!lat.is_nan() && !lon.is_nan()).then_some((lat, lon)))
    }

    /// Fixed position of a station, falling back to the coordinate axes
    /// indexed by the entity dimension.
    pub fn station_position(&self, station: usize) -> SosResult<Option<(f64, f64)>> {
        if let Some(s) = self.catalog.stations().get(station) {
            if let (Some(lat), Some(lon)) = (s.latitude, s.longitude) {
                return Ok(Some((lat, lon)));
            }
        }
        self.position_at(&Cursor::new().at_opt(self.entity_dimension(), station))
    }
}

fn parse_event_time(value: &str) -> SosResult<DateTime<Utc>> {
    parse_iso8601(value)
        .map_err(|_| SosError::invalid("eventTime", format!("Invalid eventTime: {}", value)))
}
