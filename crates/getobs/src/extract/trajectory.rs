//! Moving platforms.

use sos_common::SosResult;

use super::{station_names, with_position_fields, Cursor, FeatureExtractor, Observation, Source};

/// One entity per trajectory. Records carry the platform position ahead of
/// the requested variables.
pub struct TrajectoryExtractor<'a> {
    source: Source<'a>,
    trajectories: Vec<usize>,
    entities: Vec<String>,
    fields: Vec<String>,
}

impl<'a> TrajectoryExtractor<'a> {
    pub fn new(source: Source<'a>, trajectories: Vec<usize>, variables: Vec<String>) -> Self {
        let entities = station_names(source.catalog(), &trajectories);
        let fields = with_position_fields(&source, variables);
        Self {
            source,
            trajectories,
            entities,
            fields,
        }
    }
}

impl FeatureExtractor for TrajectoryExtractor<'_> {
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
        let trajectory = self.trajectories[entity];
        let obs_dim = self.source.time_dimension();

        let mut observations = Vec::new();
        for i in 0..self.source.dimension_len(obs_dim) {
            let cursor = Cursor::new()
                .at_opt(self.source.entity_dimension(), trajectory)
                .at_opt(obs_dim, i);
            let Some(time) = self.source.time_at(&cursor)? else {
                continue;
            };
            if !self.source.in_window(&time) {
                continue;
            }
            observations.push(Observation {
                time,
                position: self.source.position_at(&cursor)?,
                values: self.source.row(&self.fields, &cursor)?,
            });
        }
        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sos_common::LatLonBounds;
    use test_utils::catalogs::trajectory_catalog;

    #[test]
    fn test_position_fields_lead() {
        let catalog = trajectory_catalog();
        let source = Source::new(&catalog, None).unwrap();
        let ex = TrajectoryExtractor::new(source, vec![0], vec!["temp".into(), "lat".into()]);
        assert_eq!(ex.fields(), ["lat", "lon", "temp"]);
    }

    #[test]
    fn test_bounds_span_the_track() {
        let catalog = trajectory_catalog();
        let source = Source::new(&catalog, None).unwrap();
        let ex = TrajectoryExtractor::new(source, vec![1], vec!["temp".into()]);

        assert_eq!(
            ex.bounds(0).unwrap(),
            Some(LatLonBounds {
                lower_lat: 35.0,
                upper_lat: 35.2,
                lower_lon: -75.0,
                upper_lon: -74.6,
            })
        );
        assert_eq!(
            ex.data_block(0).unwrap(),
            "2020-01-01T00:00:00Z,35,-75,21;2020-01-01T01:00:00Z,35.1,-74.8,21.5;2020-01-01T02:00:00Z,35.2,-74.6,22"
        );
    }

    #[test]
    fn test_window() {
        let catalog = trajectory_catalog();
        let window = (
            "2020-01-01T00:30:00Z".to_string(),
            "2020-01-01T02:00:00Z".to_string(),
        );
        let source = Source::new(&catalog, Some(&window)).unwrap();
        let ex = TrajectoryExtractor::new(source, vec![0], vec!["temp".into()]);
        assert_eq!(
            ex.time_bounds(0).unwrap(),
            Some((
                "2020-01-01T01:00:00Z".to_string(),
                "2020-01-01T02:00:00Z".to_string()
            ))
        );
    }
}
