//! Event time resolution.

use sos_catalog::Catalog;
use sos_common::{SosError, SosResult};
use tracing::debug;

/// Token standing for the first time step of the dataset.
pub const FIRST_TIME: &str = "first";
/// Token standing for the last time step of the dataset.
pub const LATEST_TIME: &str = "latest";

/// Resolved event time of a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemporalResolution {
    /// Inclusive `(start, end)`; `None` when the request has no time constraint.
    pub interval: Option<(String, String)>,
    /// A `first` token was present.
    pub first_requested: bool,
    /// A `latest` token was present.
    pub last_requested: bool,
}

impl TemporalResolution {
    pub fn is_unconstrained(&self) -> bool {
        self.interval.is_none()
    }
}

/// Resolve symbolic tokens against the time coordinate and build the interval.
///
/// Other tokens are passed through untouched. A single token becomes an
/// instantaneous interval. The time coordinate is only read when a symbolic
/// token is present.
pub fn resolve_time(catalog: &dyn Catalog, tokens: &[String]) -> SosResult<TemporalResolution> {
    if tokens.len() > 2 {
        return Err(SosError::invalid(
            "eventTime",
            format!(
                "eventTime must be a single time or a start/end pair, got {} values",
                tokens.len()
            ),
        ));
    }

    let symbolic = |t: &String| t == FIRST_TIME || t == LATEST_TIME;
    let coordinate = if tokens.iter().any(symbolic) {
        Some(catalog.time_coordinate()?)
    } else {
        None
    };

    let mut resolution = TemporalResolution::default();
    let mut resolved = Vec::with_capacity(2);
    for token in tokens {
        let coord = match &coordinate {
            Some(coord) if symbolic(token) => coord,
            _ => {
                resolved.push(token.clone());
                continue;
            }
        };

        let value = if token == FIRST_TIME {
            resolution.first_requested = true;
            coord.first()
        } else {
            resolution.last_requested = true;
            coord.last()
        };
        let value = value.ok_or_else(|| {
            SosError::CatalogError("time coordinate holds no values".to_string())
        })?;
        let instant = coord.unit.try_to_iso8601(value).ok_or_else(|| {
            SosError::CatalogError(format!("time value {} is out of range", value))
        })?;
        resolved.push(instant);
    }

    resolution.interval = match resolved.as_slice() {
        [] => None,
        [instant] => Some((instant.clone(), instant.clone())),
        [start, end] => Some((start.clone(), end.clone())),
        _ => None,
    };

    debug!(tokens = ?tokens, interval = ?resolution.interval, "Resolved event time");
    Ok(resolution)
}
