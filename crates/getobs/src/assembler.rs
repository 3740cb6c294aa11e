//! Output assembly: turn an extractor's per-entity results into an
//! [`ObservationCollection`].

use sos_catalog::Catalog;
use sos_common::{LatLonBounds, SosResult};
use sos_protocol::observation::RECORD_SEPARATOR;
use sos_protocol::{ObservationCollection, ObservationMember, PropertyInfo};
use tracing::debug;

use crate::context::RequestContext;
use crate::extract::{join_records, observation_time_bounds, FeatureExtractor};

/// Collect every entity the extractor enumerates, in its order.
///
/// Each entity's observations are read once; bounds, time bounds and
/// records all derive from that read.
pub fn assemble(
    catalog: &dyn Catalog,
    ctx: &RequestContext,
    extractor: &dyn FeatureExtractor,
) -> SosResult<ObservationCollection> {
    let mut members = Vec::with_capacity(extractor.entities().len());
    for (i, name) in extractor.entities().iter().enumerate() {
        let observations = extractor.observations(i)?;
        let bounds = extractor.envelope(i, &observations)?;
        let times = observation_time_bounds(&observations);
        let records = split_records(&join_records(&observations));

        debug!(entity = %name, records = records.len(), "Assembled member");
        members.push(ObservationMember {
            procedure: extractor.procedure(i),
            name: name.clone(),
            bounds,
            start: times.as_ref().map(|(s, _)| s.clone()),
            end: times.map(|(_, e)| e),
            records,
        });
    }

    let bounds = collection_bounds(&members);

    Ok(ObservationCollection {
        offering: ctx.offering.clone(),
        bounds,
        observed_properties: ctx
            .observed_properties
            .iter()
            .map(|name| property_info(catalog, name))
            .collect(),
        fields: extractor
            .fields()
            .iter()
            .map(|name| property_info(catalog, name))
            .collect(),
        members,
    })
}

/// Records of a data block; empty records are dropped.
pub fn split_records(block: &str) -> Vec<String> {
    block
        .split(RECORD_SEPARATOR)
        .filter(|r| !r.is_empty())
        .map(str::to_string)
        .collect()
}

/// Observed-property URL, units and fill value of a variable.
pub fn property_info(catalog: &dyn Catalog, name: &str) -> PropertyInfo {
    match catalog.find_variable(name) {
        Some(var) => PropertyInfo {
            name: var.short_name().to_string(),
            url: var.observed_property_url(),
            units: var.units().map(str::to_string),
            fill_value: var.fill_value().map(|v| v.to_string()),
        },
        None => PropertyInfo {
            name: name.to_string(),
            url: None,
            units: None,
            fill_value: None,
        },
    }
}

/// Envelope of all members, `None` when no member has a position.
pub fn collection_bounds(members: &[ObservationMember]) -> Option<LatLonBounds> {
    members
        .iter()
        .filter_map(|m| m.bounds)
        .reduce(|a, b| a.union(&b))
}
