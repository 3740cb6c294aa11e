//! Regular latitude/longitude grids.
//!
//! Grid requests name points rather than stations. Each requested latitude is
//! paired with each requested longitude and snapped to the nearest grid cell.

use std::collections::HashMap;

use sos_catalog::{AxisType, CatalogError};
use sos_common::{format_degree, LatLonBounds, SosError, SosResult};
use sos_protocol::kvp::{LATITUDE, LONGITUDE};

use super::{Cursor, FeatureExtractor, Observation, Source};

/// Parse and validate the `latitude` / `longitude` constraints.
///
/// Longitude is checked before latitude, presence before syntax.
pub fn parse_lat_lon(lat_lon: &HashMap<String, String>) -> SosResult<(Vec<f64>, Vec<f64>)> {
    let lons = lat_lon
        .get(LONGITUDE)
        .ok_or_else(|| SosError::missing(LONGITUDE, "No longitude point specified"))?;
    let lats = lat_lon
        .get(LATITUDE)
        .ok_or_else(|| SosError::missing(LATITUDE, "No latitude point specified"))?;

    let lats = parse_points(lats, LATITUDE, "Invalid latitude specified")?;
    let lons = parse_points(lons, LONGITUDE, "Invalid longitude specified")?;
    Ok((lats, lons))
}

fn parse_points(list: &str, locator: &str, message: &str) -> SosResult<Vec<f64>> {
    list.split(',')
        .map(|s| {
            s.trim()
                .parse::<f64>()
                .map_err(|_| SosError::invalid(locator, message))
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct GridPoint {
    lat_index: usize,
    lon_index: usize,
    lat: f64,
    lon: f64,
}

pub struct GridExtractor<'a> {
    source: Source<'a>,
    lat_dim: String,
    lon_dim: String,
    points: Vec<GridPoint>,
    entities: Vec<String>,
    fields: Vec<String>,
}

impl<'a> GridExtractor<'a> {
    pub fn new(
        source: Source<'a>,
        lats: &[f64],
        lons: &[f64],
        variables: Vec<String>,
    ) -> SosResult<Self> {
        let (lat_name, lat_dim) = horizontal_axis(&source, AxisType::Lat)?;
        let (lon_name, lon_dim) = horizontal_axis(&source, AxisType::Lon)?;
        let lat_values = source.values(&lat_name)?;
        let lon_values = source.values(&lon_name)?;

        let mut points = Vec::with_capacity(lats.len() * lons.len());
        for &lat in lats {
            for &lon in lons {
                let (Some(lat_index), Some(lon_index)) =
                    (nearest(&lat_values, lat), nearest(&lon_values, lon))
                else {
                    continue;
                };
                points.push(GridPoint {
                    lat_index,
                    lon_index,
                    lat: lat_values[lat_index],
                    lon: lon_values[lon_index],
                });
            }
        }

        let entities = points
            .iter()
            .map(|p| format!("{}_{}", format_degree(p.lat), format_degree(p.lon)))
            .collect();

        Ok(Self {
            source,
            lat_dim,
            lon_dim,
            points,
            entities,
            fields: variables,
        })
    }
}

impl FeatureExtractor for GridExtractor<'_> {
    fn entities(&self) -> &[String] {
        &self.entities
    }

    fn procedure(&self, entity: usize) -> String {
        self.source.catalog().station_urn(&self.entities[entity])
    }

    fn fields(&self) -> &[String] {
        &self.fields
    }

    fn observations(&self, entity: usize) -> SosResult<Vec<Observation>> {
        let point = self.points[entity];
        let time_dim = self.source.time_dimension();
        let height_dim = self.source.height_dimension();
        let levels = self.source.dimension_len(height_dim);

        let mut observations = Vec::new();
        for t in 0..self.source.dimension_len(time_dim) {
            let at_time = Cursor::new()
                .at(&self.lat_dim, point.lat_index)
                .at(&self.lon_dim, point.lon_index)
                .at_opt(time_dim, t);
            let Some(time) = self.source.time_at(&at_time)? else {
                continue;
            };
            if !self.source.in_window(&time) {
                continue;
            }
            for z in 0..levels {
                let cursor = at_time.clone().at_opt(height_dim, z);
                observations.push(Observation {
                    time,
                    position: Some((point.lat, point.lon)),
                    values: self.source.row(&self.fields, &cursor)?,
                });
            }
        }
        Ok(observations)
    }

    fn envelope(
        &self,
        entity: usize,
        _observations: &[Observation],
    ) -> SosResult<Option<LatLonBounds>> {
        let point = self.points[entity];
        Ok(Some(LatLonBounds::point(point.lat, point.lon)))
    }
}

/// Name and dimension of a one-dimensional horizontal axis.
fn horizontal_axis(source: &Source<'_>, axis_type: AxisType) -> SosResult<(String, String)> {
    let axis = source
        .catalog()
        .coordinate_axis(axis_type)
        .ok_or_else(|| CatalogError::MissingAxis(axis_type.to_string()))?;
    let dim = axis.dimensions.first().ok_or_else(|| {
        CatalogError::InvalidFormat(format!("{} axis {} has no dimension", axis_type, axis.name))
    })?;
    Ok((axis.name.clone(), dim.clone()))
}

fn nearest(values: &[f64], target: f64) -> Option<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .min_by(|(_, a), (_, b)| (*a - target).abs().total_cmp(&(*b - target).abs()))
        .map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sos_common::ErrorKind;
    use test_utils::catalogs::grid_catalog;

    fn constraints(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_lat_lon() {
        let (lats, lons) =
            parse_lat_lon(&constraints(&[("latitude", "1.0,2.0"), ("longitude", "3.0")])).unwrap();
        assert_eq!(lats, vec![1.0, 2.0]);
        assert_eq!(lons, vec![3.0]);
    }

    #[test]
    fn test_bad_latitude() {
        let err =
            parse_lat_lon(&constraints(&[("latitude", "abc"), ("longitude", "3.0")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(err.locator(), Some("latitude"));
        assert_eq!(err.message(), "Invalid latitude specified");
    }

    #[test]
    fn test_missing_longitude() {
        let err = parse_lat_lon(&constraints(&[("latitude", "1.0")])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingParameter);
        assert_eq!(err.locator(), Some("longitude"));
    }

    #[test]
    fn test_missing_both_reports_longitude() {
        let err = parse_lat_lon(&HashMap::new()).unwrap_err();
        assert_eq!(err.locator(), Some("longitude"));
    }

    #[test]
    fn test_nearest() {
        assert_eq!(nearest(&[40.0, 41.0, 42.0], 41.4), Some(1));
        assert_eq!(nearest(&[40.0, 41.0, 42.0], 99.0), Some(2));
        assert_eq!(nearest(&[], 1.0), None);
    }

    #[test]
    fn test_points_are_snapped_cartesian_product() {
        let catalog = grid_catalog();
        let source = Source::new(&catalog, None).unwrap();
        let ex = GridExtractor::new(
            source,
            &[40.1, 41.9],
            &[-70.2],
            vec!["temp".into(), "lat".into(), "lon".into()],
        )
        .unwrap();

        assert_eq!(ex.entities(), ["40.0000_-70.0000", "42.0000_-70.0000"]);
        assert_eq!(ex.bounds(1).unwrap(), Some(LatLonBounds::point(42.0, -70.0)));
    }

    #[test]
    fn test_grid_records() {
        let catalog = grid_catalog();
        let source = Source::new(&catalog, None).unwrap();
        let ex = GridExtractor::new(source, &[41.0], &[-71.0], vec!["temp".into()]).unwrap();

        // temp[time][depth][lat][lon] = time * 12 + depth * 6 + lat * 2 + lon
        assert_eq!(
            ex.data_block(0).unwrap(),
            "2020-01-01T00:00:00Z,2;2020-01-01T00:00:00Z,8;\
             2020-01-01T01:00:00Z,14;2020-01-01T01:00:00Z,20"
        );
    }
}
