//! Request normalization: decoding and canonicalisation of raw request fields.
//!
//! Offerings travel with their colons escaped as `_-_` and both the offering
//! and the response format may be percent-encoded. Normalization undoes both
//! and picks the response formatter; nothing else is checked here.

use std::collections::HashMap;

use sos_common::{SosError, SosResult};
use tracing::debug;

use crate::format::ResponseFormat;
use crate::kvp::RawObservationRequest;
use crate::COLON_ESCAPE;

/// A request whose offering and format have been decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRequest {
    pub offering: String,
    pub procedures: Option<Vec<String>>,
    pub observed_properties: Vec<String>,
    pub event_time: Vec<String>,
    pub response_format: ResponseFormat,
    pub lat_lon: HashMap<String, String>,
}

/// Decode the offering and response format and select the formatter.
///
/// Fails with `UnrecognizedFormat` when the decoded format is not one of the
/// two supported strings, and with `InvalidParameter` on malformed
/// percent-encoding.
pub fn normalize_request(raw: RawObservationRequest) -> SosResult<NormalizedRequest> {
    let offering = percent_decode(&raw.offering.replace(COLON_ESCAPE, ":"), "offering")?;

    let format = collapse_subtype_whitespace(&percent_decode(
        &raw.response_format,
        "responseFormat",
    )?);
    let response_format = ResponseFormat::from_format_string(&format)
        .ok_or_else(|| SosError::unrecognized_format(&format))?;

    debug!(offering = %offering, format = ?response_format, "Normalized request");

    Ok(NormalizedRequest {
        offering,
        procedures: raw.procedures,
        observed_properties: raw.observed_properties,
        event_time: raw.event_time,
        response_format,
        lat_lon: raw.lat_lon,
    })
}

/// Form-style percent decoding: `+` is a space and every `%` must introduce
/// two hex digits.
pub fn percent_decode(value: &str, locator: &str) -> SosResult<String> {
    let bytes = value.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b != b'%' {
            continue;
        }
        let valid = bytes
            .get(i + 1..i + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            return Err(SosError::invalid(
                locator,
                format!("Malformed percent-encoding in {}: {}", locator, value),
            ));
        }
    }

    let spaced = value.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| SosError::invalid(locator, format!("Could not decode {}: {}", locator, e)))
}

/// Remove whitespace between `;` and a following `subtype` parameter.
pub fn collapse_subtype_whitespace(format: &str) -> String {
    let mut out = String::with_capacity(format.len());
    let mut rest = format;

    while let Some(pos) = rest.find(';') {
        out.push_str(&rest[..=pos]);
        let after = &rest[pos + 1..];
        let trimmed = after.trim_start_matches(|c: char| c.is_ascii_whitespace());
        rest = if trimmed.len() < after.len() && trimmed.starts_with("subtype") {
            trimmed
        } else {
            after
        };
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::{IOOS10_RESPONSE_FORMAT, OOSTETHYS_RESPONSE_FORMAT};
    use sos_common::ErrorKind;

    fn raw(offering: &str, format: &str) -> RawObservationRequest {
        RawObservationRequest {
            offering: offering.to_string(),
            response_format: format.to_string(),
            observed_properties: vec!["temp".to_string()],
            ..Default::default()
        }
    }

    #[test]
    fn test_colon_escape_is_reversed() {
        let req = normalize_request(raw(
            "urn_-_ioos_-_station_-_test_-_buoy1",
            OOSTETHYS_RESPONSE_FORMAT,
        ))
        .unwrap();
        assert_eq!(req.offering, "urn:ioos:station:test:buoy1");
    }

    #[test]
    fn test_percent_encoded_offering() {
        let req = normalize_request(raw(
            "urn%3Aioos%3Astation%3Atest%3Abuoy1",
            IOOS10_RESPONSE_FORMAT,
        ))
        .unwrap();
        assert_eq!(req.offering, "urn:ioos:station:test:buoy1");
        assert_eq!(req.response_format, ResponseFormat::Ioos10);
    }

    #[test]
    fn test_plus_decodes_to_space_then_collapses() {
        let req = normalize_request(raw("x", "text/xml;+subtype=\"om/1.0.0\"")).unwrap();
        assert_eq!(req.response_format, ResponseFormat::OosTethys);
    }

    #[test]
    fn test_collapse_subtype_whitespace() {
        assert_eq!(
            collapse_subtype_whitespace("text/xml;   subtype=\"om/1.0.0\""),
            "text/xml;subtype=\"om/1.0.0\""
        );
        assert_eq!(
            collapse_subtype_whitespace("text/xml; charset=utf-8"),
            "text/xml; charset=utf-8"
        );
        assert_eq!(collapse_subtype_whitespace("text/xml"), "text/xml");
    }

    #[test]
    fn test_unknown_format() {
        let err = normalize_request(raw("x", "application/json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnrecognizedFormat);
        assert_eq!(err.locator(), Some("responseFormat"));
    }

    #[test]
    fn test_malformed_percent_encoding() {
        let err = normalize_request(raw("urn%3", OOSTETHYS_RESPONSE_FORMAT)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert_eq!(err.locator(), Some("offering"));

        let err = percent_decode("text%zzxml", "responseFormat").unwrap_err();
        assert_eq!(err.locator(), Some("responseFormat"));
    }
}
