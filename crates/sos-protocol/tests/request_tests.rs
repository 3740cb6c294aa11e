//! KVP parsing through normalization.

use sos_common::ErrorKind;
use sos_protocol::normalize::normalize_request;
use sos_protocol::{exception_report, GetObservationParams, ResponseFormat};

fn params(json: &str) -> GetObservationParams {
    serde_json::from_str(json).unwrap()
}

#[test]
fn test_escaped_offering_and_encoded_format() {
    let raw = params(
        r#"{"service":"SOS","request":"GetObservation","version":"1.0.0",
            "offering":"urn_-_ioos_-_station_-_edu.example_-_buoy1",
            "observedProperty":"sea_water_temperature",
            "responseFormat":"text%2Fxml%3B%20subtype%3D%22om%2F1.0.0%2Fprofiles%2Fioos_sos%2F1.0%22",
            "eventTime":"latest"}"#,
    )
    .into_request()
    .unwrap();

    let request = normalize_request(raw).unwrap();
    assert_eq!(request.offering, "urn:ioos:station:edu.example:buoy1");
    assert_eq!(request.response_format, ResponseFormat::Ioos10);
    assert_eq!(request.event_time, vec!["latest"]);
}

#[test]
fn test_wrong_request_reported_as_exception() {
    let err = params(
        r#"{"service":"SOS","request":"GetCapabilities","offering":"x",
            "observedProperty":"t","responseFormat":"f"}"#,
    )
    .into_request()
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    let xml = exception_report(&err);
    assert!(xml.contains(r#"locator="request""#));
    assert!(xml.contains("GetCapabilities"));
}

#[test]
fn test_format_checked_before_anything_else() {
    let raw = params(
        r#"{"service":"SOS","request":"GetObservation","offering":"nope",
            "observedProperty":"does_not_exist","responseFormat":"text/csv"}"#,
    )
    .into_request()
    .unwrap();

    let err = normalize_request(raw).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnrecognizedFormat);
    assert_eq!(err.message(), "Could not recognize response format: text/csv");
}
