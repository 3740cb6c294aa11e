//! KVP (Key-Value Pair) query string parameters for GetObservation.

use std::collections::HashMap;

use serde::Deserialize;
use sos_common::{SosError, SosResult};

/// Spatial constraint key for latitudes.
pub const LATITUDE: &str = "latitude";
/// Spatial constraint key for longitudes.
pub const LONGITUDE: &str = "longitude";

/// Query string parameters of a GetObservation request.
#[derive(Debug, Default, Deserialize)]
pub struct GetObservationParams {
    #[serde(rename = "service", alias = "SERVICE")]
    pub service: Option<String>,

    #[serde(rename = "request", alias = "REQUEST")]
    pub request: Option<String>,

    #[serde(rename = "version", alias = "VERSION")]
    pub version: Option<String>,

    #[serde(rename = "offering", alias = "OFFERING")]
    pub offering: Option<String>,

    /// Comma-separated procedure identifiers.
    #[serde(rename = "procedure", alias = "PROCEDURE")]
    pub procedure: Option<String>,

    /// Comma-separated observed properties.
    #[serde(
        rename = "observedProperty",
        alias = "observedproperty",
        alias = "OBSERVEDPROPERTY"
    )]
    pub observed_property: Option<String>,

    /// Single instant or `start/end`.
    #[serde(rename = "eventTime", alias = "eventtime", alias = "EVENTTIME")]
    pub event_time: Option<String>,

    #[serde(
        rename = "responseFormat",
        alias = "responseformat",
        alias = "RESPONSEFORMAT"
    )]
    pub response_format: Option<String>,

    /// Comma-separated latitudes, for grid datasets.
    #[serde(rename = "latitude", alias = "LATITUDE", alias = "lat")]
    pub latitude: Option<String>,

    /// Comma-separated longitudes, for grid datasets.
    #[serde(rename = "longitude", alias = "LONGITUDE", alias = "lon")]
    pub longitude: Option<String>,
}

/// The raw request fields consumed by request normalization.
///
/// Nothing here has been decoded or checked against a dataset yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawObservationRequest {
    pub offering: String,
    /// `None` when the request named no procedure.
    pub procedures: Option<Vec<String>>,
    pub observed_properties: Vec<String>,
    /// Zero, one or two event-time tokens.
    pub event_time: Vec<String>,
    pub response_format: String,
    /// Raw `latitude` / `longitude` lists, keyed by parameter name.
    pub lat_lon: HashMap<String, String>,
}

impl GetObservationParams {
    /// Validate the envelope parameters and extract the GetObservation fields.
    pub fn into_request(self) -> SosResult<RawObservationRequest> {
        match self.service.as_deref() {
            Some(s) if s.eq_ignore_ascii_case("SOS") => {}
            Some(s) => {
                return Err(SosError::invalid(
                    "service",
                    format!("SERVICE must be SOS, got {}", s),
                ))
            }
            None => return Err(SosError::missing("service", "SERVICE is required")),
        }

        match self.request.as_deref() {
            Some(r) if r.eq_ignore_ascii_case("GetObservation") => {}
            Some(r) => {
                return Err(SosError::invalid(
                    "request",
                    format!("Unknown request: {}", r),
                ))
            }
            None => return Err(SosError::missing("request", "REQUEST is required")),
        }

        let offering = self
            .offering
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| SosError::missing("offering", "Missing required parameter: offering"))?;

        let observed_properties = self
            .observed_property
            .as_deref()
            .map(split_list)
            .unwrap_or_default();
        if observed_properties.is_empty() {
            return Err(SosError::missing(
                "observedProperty",
                "Missing required parameter: observedProperty",
            ));
        }

        let response_format = self
            .response_format
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| {
                SosError::missing("responseFormat", "Missing required parameter: responseFormat")
            })?;

        let procedures = self
            .procedure
            .as_deref()
            .map(split_list)
            .filter(|p| !p.is_empty());

        let event_time = self
            .event_time
            .as_deref()
            .map(|t| {
                t.split('/')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let mut lat_lon = HashMap::new();
        if let Some(lat) = self.latitude {
            lat_lon.insert(LATITUDE.to_string(), lat);
        }
        if let Some(lon) = self.longitude {
            lat_lon.insert(LONGITUDE.to_string(), lon);
        }

        Ok(RawObservationRequest {
            offering,
            procedures,
            observed_properties,
            event_time,
            response_format,
            lat_lon,
        })
    }
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sos_common::ErrorKind;

    fn params() -> GetObservationParams {
        GetObservationParams {
            service: Some("SOS".to_string()),
            request: Some("GetObservation".to_string()),
            offering: Some("urn:ioos:network:test:all".to_string()),
            observed_property: Some("temp, salinity".to_string()),
            response_format: Some("text/xml;subtype=\"om/1.0.0\"".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_into_request_minimal() {
        let req = params().into_request().unwrap();
        assert_eq!(req.observed_properties, vec!["temp", "salinity"]);
        assert!(req.procedures.is_none());
        assert!(req.event_time.is_empty());
        assert!(req.lat_lon.is_empty());
    }

    #[test]
    fn test_event_time_interval() {
        let mut p = params();
        p.event_time = Some("2020-01-01T00:00:00Z/2020-01-02T00:00:00Z".to_string());
        let req = p.into_request().unwrap();
        assert_eq!(
            req.event_time,
            vec!["2020-01-01T00:00:00Z", "2020-01-02T00:00:00Z"]
        );
    }

    #[test]
    fn test_lat_lon_keys() {
        let mut p = params();
        p.latitude = Some("1.0,2.0".to_string());
        let req = p.into_request().unwrap();
        assert_eq!(req.lat_lon.get(LATITUDE).map(String::as_str), Some("1.0,2.0"));
        assert!(!req.lat_lon.contains_key(LONGITUDE));
    }

    #[test]
    fn test_wrong_service() {
        let mut p = params();
        p.service = Some("WMS".to_string());
        let err = p.into_request().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(err.locator(), Some("service"));
    }

    #[test]
    fn test_missing_observed_property() {
        let mut p = params();
        p.observed_property = Some(" , ".to_string());
        let err = p.into_request().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingParameter);
        assert_eq!(err.locator(), Some("observedProperty"));
    }

    #[test]
    fn test_missing_response_format() {
        let mut p = params();
        p.response_format = None;
        let err = p.into_request().unwrap_err();
        assert_eq!(err.locator(), Some("responseFormat"));
    }

    #[test]
    fn test_deserialize_from_json_map() {
        let p: GetObservationParams = serde_json::from_str(
            r#"{"SERVICE":"SOS","REQUEST":"GetObservation","offering":"x",
                "observedProperty":"temp","responseFormat":"f","procedure":"a,b"}"#,
        )
        .unwrap();
        let req = p.into_request().unwrap();
        assert_eq!(
            req.procedures,
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }
}
