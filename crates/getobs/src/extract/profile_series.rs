//! Time series of vertical profiles at fixed stations.

use sos_common::{LatLonBounds, SosResult};

use super::{station_names, Cursor, FeatureExtractor, Observation, Source};

/// One entity per station; each time step yields one record per level.
///
/// A `first` or `latest` event time restricts the output to the first or last
/// time step, which matters when time is indexed per station.
pub struct ProfileSeriesExtractor<'a> {
    source: Source<'a>,
    stations: Vec<usize>,
    entities: Vec<String>,
    fields: Vec<String>,
    first_requested: bool,
    last_requested: bool,
}

impl<'a> ProfileSeriesExtractor<'a> {
    pub fn new(
        source: Source<'a>,
        stations: Vec<usize>,
        variables: Vec<String>,
        first_requested: bool,
        last_requested: bool,
    ) -> Self {
        let entities = station_names(source.catalog(), &stations);
        Self {
            source,
            stations,
            entities,
            fields: variables,
            first_requested,
            last_requested,
        }
    }

    fn time_steps(&self, steps: usize) -> Vec<usize> {
        if !self.first_requested && !self.last_requested {
            return (0..steps).collect();
        }
        let mut selected = Vec::new();
        if self.first_requested && steps > 0 {
            selected.push(0);
        }
        if self.last_requested && steps > 0 && !selected.contains(&(steps - 1)) {
            selected.push(steps - 1);
        }
        selected
    }
}

impl FeatureExtractor for ProfileSeriesExtractor<'_> {
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
        let height_dim = self.source.height_dimension();
        let levels = self.source.dimension_len(height_dim);

        let mut observations = Vec::new();
        for t in self.time_steps(self.source.dimension_len(time_dim)) {
            let at_time = Cursor::new()
                .at_opt(self.source.entity_dimension(), station)
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
                    position,
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
        Ok(self
            .source
            .station_position(self.stations[entity])?
            .map(|(lat, lon)| LatLonBounds::point(lat, lon)))
    }
}
