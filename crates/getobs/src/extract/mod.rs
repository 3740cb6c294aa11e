//! Feature extraction.
//!
//! Each dataset shape has its own extractor behind [`FeatureExtractor`].
//! [`dispatch`] picks one from the dataset's feature type and builds it for
//! a single request.

mod grid;
mod profile;
mod profile_series;
mod section;
mod source;
mod timeseries;
mod trajectory;

pub use grid::{parse_lat_lon, GridExtractor};
pub use profile::ProfileExtractor;
pub use profile_series::ProfileSeriesExtractor;
pub use section::SectionExtractor;
pub use source::{Cursor, Source};
pub use timeseries::FixedStationExtractor;
pub use trajectory::TrajectoryExtractor;

use chrono::{DateTime, Utc};
use sos_catalog::{AxisType, Catalog, FeatureType};
use sos_common::{format_iso8601, LatLonBounds, SosError, SosResult};
use sos_protocol::observation::{FIELD_SEPARATOR, RECORD_SEPARATOR};
use tracing::{debug, warn};

use crate::context::RequestContext;

/// Message reported for datasets of an unsupported shape.
pub const UNSUPPORTED_FEATURE_TYPE: &str = "Could not recognize the dataset's feature type";

/// One record of an entity: a time, where it was taken, and the field values.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub time: DateTime<Utc>,
    pub position: Option<(f64, f64)>,
    /// One value per [`FeatureExtractor::fields`] entry.
    pub values: Vec<f64>,
}

impl Observation {
    /// `time,value1,value2,...`
    pub fn to_record(&self) -> String {
        let mut record = format_iso8601(&self.time);
        for v in &self.values {
            record.push(FIELD_SEPARATOR);
            record.push_str(&v.to_string());
        }
        record
    }
}

/// Data retrieval for one dataset shape.
pub trait FeatureExtractor {
    /// Entity names, in output order.
    fn entities(&self) -> &[String];

    /// URN reported as the procedure of an entity.
    fn procedure(&self, entity: usize) -> String;

    /// Names of the record fields after the leading time.
    fn fields(&self) -> &[String];

    /// Observations of an entity that fall inside the requested time window.
    fn observations(&self, entity: usize) -> SosResult<Vec<Observation>>;

    /// Envelope of an entity whose observations are already read.
    ///
    /// Defaults to the envelope of the observation positions. Entities with
    /// a fixed position report it even when the window holds no records.
    fn envelope(
        &self,
        _entity: usize,
        observations: &[Observation],
    ) -> SosResult<Option<LatLonBounds>> {
        Ok(LatLonBounds::from_points(
            observations.iter().filter_map(|o| o.position),
        ))
    }

    fn bounds(&self, entity: usize) -> SosResult<Option<LatLonBounds>> {
        let observations = self.observations(entity)?;
        self.envelope(entity, &observations)
    }

    /// Earliest and latest observation time.
    fn time_bounds(&self, entity: usize) -> SosResult<Option<(String, String)>> {
        Ok(observation_time_bounds(&self.observations(entity)?))
    }

    /// The entity's records joined by the record separator.
    fn data_block(&self, entity: usize) -> SosResult<String> {
        Ok(join_records(&self.observations(entity)?))
    }
}

/// Earliest and latest time of a set of observations, as ISO 8601.
pub fn observation_time_bounds(observations: &[Observation]) -> Option<(String, String)> {
    let start = observations.iter().map(|o| o.time).min();
    let end = observations.iter().map(|o| o.time).max();
    start
        .zip(end)
        .map(|(s, e)| (format_iso8601(&s), format_iso8601(&e)))
}

/// Records of the observations joined by the record separator.
pub fn join_records(observations: &[Observation]) -> String {
    let records: Vec<String> = observations.iter().map(Observation::to_record).collect();
    records.join(&RECORD_SEPARATOR.to_string())
}

/// Station indices targeted by the procedures.
///
/// Station URNs map to their station, sensor URNs to the station carrying the
/// sensor, and the network-all URN to every station. Duplicates are dropped.
pub fn entity_indices(catalog: &dyn Catalog, procedures: &[String]) -> Vec<usize> {
    let mut indices: Vec<usize> = Vec::new();
    let mut push = |i: usize| {
        if !indices.contains(&i) {
            indices.push(i);
        }
    };

    for procedure in procedures {
        if catalog.urn_scheme().is_network_all(procedure) {
            (0..catalog.stations().len()).for_each(&mut push);
            continue;
        }

        let owner = catalog.stations().iter().position(|s| {
            let station_urn = catalog.station_urn(&s.name);
            station_urn == *procedure || catalog.sensor_urns(&station_urn).contains(procedure)
        });
        match owner {
            Some(i) => push(i),
            None => warn!(procedure = %procedure, "Procedure maps to no station"),
        }
    }
    indices
}

/// Build the extractor for the dataset's feature type.
pub fn dispatch<'a>(
    catalog: &'a dyn Catalog,
    ctx: &RequestContext,
) -> SosResult<Box<dyn FeatureExtractor + 'a>> {
    let feature_type = catalog
        .feature_type()
        .ok_or_else(|| SosError::UnsupportedFeatureType(UNSUPPORTED_FEATURE_TYPE.to_string()))?;

    let source = || Source::new(catalog, ctx.time.interval.as_ref());
    let stations = || entity_indices(catalog, &ctx.procedures);
    let variables = || ctx.variables.clone();

    let extractor: Box<dyn FeatureExtractor + 'a> = match feature_type {
        FeatureType::Grid => {
            let (lats, lons) = parse_lat_lon(&ctx.lat_lon)?;
            Box::new(GridExtractor::new(source()?, &lats, &lons, variables())?)
        }
        FeatureType::Trajectory => {
            Box::new(TrajectoryExtractor::new(source()?, stations(), variables()))
        }
        FeatureType::Station => {
            Box::new(FixedStationExtractor::new(source()?, stations(), variables()))
        }
        FeatureType::StationProfile => Box::new(ProfileSeriesExtractor::new(
            source()?,
            stations(),
            variables(),
            ctx.time.first_requested,
            ctx.time.last_requested,
        )),
        FeatureType::Profile => Box::new(ProfileExtractor::new(source()?, stations(), variables())),
        FeatureType::Section => Box::new(SectionExtractor::new(source()?, stations(), variables())),
    };

    debug!(
        feature_type = ?feature_type,
        entities = extractor.entities().len(),
        fields = ?extractor.fields(),
        "Dispatched extractor"
    );
    Ok(extractor)
}

/// Entity names of the given stations.
fn station_names(catalog: &dyn Catalog, stations: &[usize]) -> Vec<String> {
    stations
        .iter()
        .filter_map(|&i| catalog.stations().get(i))
        .map(|s| s.name.clone())
        .collect()
}

/// Position columns followed by the variables not already among them.
fn with_position_fields(source: &Source<'_>, variables: Vec<String>) -> Vec<String> {
    let mut fields: Vec<String> = [AxisType::Lat, AxisType::Lon]
        .into_iter()
        .filter_map(|a| source.axis_name(a))
        .map(str::to_string)
        .collect();
    for v in variables {
        if !fields.iter().any(|f| f.eq_ignore_ascii_case(&v)) {
            fields.push(v);
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use test_utils::catalogs::{station_catalog, AUTHORITY};

    #[test]
    fn test_record_format() {
        let obs = Observation {
            time: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            position: None,
            values: vec![10.5, -999.0],
        };
        assert_eq!(obs.to_record(), "2020-01-01T00:00:00Z,10.5,-999");
    }

    #[test]
    fn test_entity_indices() {
        let catalog = station_catalog();
        let station = |n: &str| format!("urn:ioos:station:{}:{}", AUTHORITY, n);
        let sensor = format!("urn:ioos:sensor:{}:buoy2:temp", AUTHORITY);
        let all = format!("urn:ioos:network:{}:all", AUTHORITY);

        assert_eq!(entity_indices(&catalog, &[sensor.clone()]), vec![1]);
        assert_eq!(
            entity_indices(&catalog, &[station("buoy2"), sensor, station("buoy1")]),
            vec![1, 0]
        );
        assert_eq!(entity_indices(&catalog, &[all]), vec![0, 1]);
    }
}
