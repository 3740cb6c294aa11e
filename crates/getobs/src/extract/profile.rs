//! Single vertical profiles.

use sos_common::SosResult;

use super::{station_names, Cursor, FeatureExtractor, Observation, Source};

/// One entity per profile; a profile has one time and yields a record per
/// level.
pub struct ProfileExtractor<'a> {
    source: Source<'a>,
    profiles: Vec<usize>,
    entities: Vec<String>,
    fields: Vec<String>,
}

impl<'a> ProfileExtractor<'a> {
    pub fn new(source: Source<'a>, profiles: Vec<usize>, variables: Vec<String>) -> Self {
        let entities = station_names(source.catalog(), &profiles);
        Self {
            source,
            profiles,
            entities,
            fields: variables,
        }
    }
}

impl FeatureExtractor for ProfileExtractor<'_> {
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
        let profile = self.profiles[entity];
        let at_profile = Cursor::new().at_opt(self.source.entity_dimension(), profile);

        let Some(time) = self.source.time_at(&at_profile)? else {
            return Ok(Vec::new());
        };
        if !self.source.in_window(&time) {
            return Ok(Vec::new());
        }

        let position = self.source.station_position(profile)?;
        let height_dim = self.source.height_dimension();
        (0..self.source.dimension_len(height_dim))
            .map(|z| {
                let cursor = at_profile.clone().at_opt(height_dim, z);
                Ok(Observation {
                    time,
                    position,
                    values: self.source.row(&self.fields, &cursor)?,
                })
            })
            .collect()
    }
}
