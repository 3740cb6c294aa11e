//! Sections: trajectories of vertical profiles.

use sos_common::SosResult;

use super::{station_names, with_position_fields, Cursor, FeatureExtractor, Observation, Source};

/// One entity per section; each profile along the track yields one record
/// per level.
pub struct SectionExtractor<'a> {
    source: Source<'a>,
    sections: Vec<usize>,
    entities: Vec<String>,
    fields: Vec<String>,
}

impl<'a> SectionExtractor<'a> {
    pub fn new(source: Source<'a>, sections: Vec<usize>, variables: Vec<String>) -> Self {
        let entities = station_names(source.catalog(), &sections);
        let fields = with_position_fields(&source, variables);
        Self {
            source,
            sections,
            entities,
            fields,
        }
    }
}

impl FeatureExtractor for SectionExtractor<'_> {
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
        let section = self.sections[entity];
        let obs_dim = self.source.time_dimension();
        let height_dim = self.source.height_dimension();
        let levels = self.source.dimension_len(height_dim);

        let mut observations = Vec::new();
        for i in 0..self.source.dimension_len(obs_dim) {
            let at_profile = Cursor::new()
                .at_opt(self.source.entity_dimension(), section)
                .at_opt(obs_dim, i);
            let Some(time) = self.source.time_at(&at_profile)? else {
                continue;
            };
            if !self.source.in_window(&time) {
                continue;
            }
            let position = self.source.position_at(&at_profile)?;
            for z in 0..levels {
                let cursor = at_profile.clone().at_opt(height_dim, z);
                observations.push(Observation {
                    time,
                    position,
                    values: self.source.row(&self.fields, &cursor)?,
                });
            }
        }
        Ok(observations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::catalogs::section_catalog;

    #[test]
    fn test_profiles_along_track() {
        let catalog = section_catalog();
        let source = Source::new(&catalog, None).unwrap();
        let ex = SectionExtractor::new(source, vec![0], vec!["temp".into(), "z".into()]);

        assert_eq!(ex.fields(), ["lat", "lon", "temp", "z"]);
        assert_eq!(
            ex.data_block(0).unwrap(),
            "2020-01-01T00:00:00Z,30,-60,25,0;\
             2020-01-01T00:00:00Z,30,-60,24,20;\
             2020-01-01T12:00:00Z,31,-61,23,0;\
             2020-01-01T12:00:00Z,31,-61,22,20"
        );

        let bounds = ex.bounds(0).unwrap().unwrap();
        assert_eq!(bounds.lower_corner(), "30.0000 -61.0000");
        assert_eq!(bounds.upper_corner(), "31.0000 -60.0000");
    }
}
