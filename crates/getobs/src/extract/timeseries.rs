//! Fixed-station time series.

use sos_common::{LatLonBounds, SosResult};

use super::{station_names, Cursor, FeatureExtractor, Observation, Source};

/// One entity per station; every time step inside the window is a record.
pub struct FixedStationExtractor<'a> {
    source: Source<'a>,
    stations: Vec<usize>,
    entities: Vec<String>,
    fields: Vec<String>,
}

impl<'a> FixedStationExtractor<'a> {
    pub fn new(source: Source<'a>, stations: Vec<usize>, variables: Vec<String>) -> Self {
        let entities = station_names(source.catalog(), &stations);
        Self {
            source,
            stations,
            entities,
            fields: variables,
        }
    }
}

impl FeatureExtractor for FixedStationExtractor<'_> {
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
        let station = self.stations[entity];
        let position = self.source.station_position(station)?;
        let time_dim = self.source.time_dimension();
        let steps = self.source.dimension_len(time_dim);

        let mut observations = Vec::new();
        for t in 0..steps {
            let cursor = Cursor::new()
                .at_opt(self.source.entity_dimension(), station)
                .at_opt(time_dim, t);
            let Some(time) = self.source.time_at(&cursor)? else {
                continue;
            };
            if !self.source.in_window(&time) {
                continue;
            }
            observations.push(Observation {
                time,
                position,
                values: self.source.row(&self.fields, &cursor)?,
            });
        }
        Ok(observations)
    }

    /// A station sits still, so its envelope is its position even when the
    /// window holds no records.
    fn envelope(
        &self,
        entity: usize,
        _observations: &[Observation],
    ) -> SosResult<Option<LatLonBounds>> {
        Ok(self
            .source
            .station_position(self.stations[entity])?
            .map(|(lat, lon)| LatLonBounds::point(lat, lon)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::catalogs::station_catalog;

    fn extractor<'a>(
        catalog: &'a dyn sos_catalog::Catalog,
        window: Option<(&str, &str)>,
    ) -> FixedStationExtractor<'a> {
        let window = window.map(|(a, b)| (a.to_string(), b.to_string()));
        let source = Source::new(catalog, window.as_ref()).unwrap();
        FixedStationExtractor::new(source, vec![1, 0], vec!["temp".to_string()])
    }

    #[test]
    fn test_entities_follow_request_order() {
        let catalog = station_catalog();
        let ex = extractor(&catalog, None);
        assert_eq!(ex.entities(), ["buoy2", "buoy1"]);
        assert_eq!(ex.procedure(0), "urn:ioos:station:edu.test:buoy2");
    }

    #[test]
    fn test_data_block() {
        let catalog = station_catalog();
        let ex = extractor(&catalog, None);
        assert_eq!(
            ex.data_block(0).unwrap(),
            "2020-01-01T00:00:00Z,12;2020-01-01T01:00:00Z,12.5;2020-01-01T02:00:00Z,13"
        );
    }

    #[test]
    fn test_window_filters_records() {
        let catalog = station_catalog();
        let ex = extractor(
            &catalog,
            Some(("2020-01-01T01:00:00Z", "2020-01-01T01:00:00Z")),
        );
        assert_eq!(ex.data_block(1).unwrap(), "2020-01-01T01:00:00Z,10.5");
        assert_eq!(
            ex.time_bounds(1).unwrap(),
            Some((
                "2020-01-01T01:00:00Z".to_string(),
                "2020-01-01T01:00:00Z".to_string()
            ))
        );
    }

    #[test]
    fn test_bounds_without_records() {
        let catalog = station_catalog();
        let ex = extractor(
            &catalog,
            Some(("2030-01-01T00:00:00Z", "2030-01-02T00:00:00Z")),
        );
        assert_eq!(ex.data_block(0).unwrap(), "");
        assert_eq!(ex.bounds(0).unwrap(), Some(LatLonBounds::point(42.0, -70.1)));
        assert_eq!(ex.time_bounds(0).unwrap(), None);
    }
}
