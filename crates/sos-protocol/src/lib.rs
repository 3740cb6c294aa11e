//! OGC Sensor Observation Service (SOS) GetObservation protocol.
//!
//! This crate covers the wire side of GetObservation:
//! - [`kvp`]: query-string parameters and their validation
//! - [`normalize`]: decoding and canonicalisation of the raw request fields
//! - [`format`]: the supported response formats
//! - [`observation`]: the O&M observation documents
//! - [`exception`]: the `ows:ExceptionReport` error document
//!
//! # Example
//!
//! ```rust
//! use sos_protocol::{normalize::normalize_request, RawObservationRequest, ResponseFormat};
//!
//! let raw = RawObservationRequest {
//!     offering: "urn_-_ioos_-_network_-_test_-_all".to_string(),
//!     response_format: "text%2Fxml%3B%20subtype%3D%22om%2F1.0.0%22".to_string(),
//!     observed_properties: vec!["sea_water_temperature".to_string()],
//!     ..Default::default()
//! };
//! let request = normalize_request(raw).unwrap();
//! assert_eq!(request.offering, "urn:ioos:network:test:all");
//! assert_eq!(request.response_format, ResponseFormat::OosTethys);
//! ```

pub mod exception;
pub mod format;
pub mod kvp;
pub mod normalize;
pub mod observation;

pub use exception::exception_report;
pub use format::ResponseFormat;
pub use kvp::{GetObservationParams, RawObservationRequest};
pub use normalize::NormalizedRequest;
pub use observation::{
    DocumentError, ObservationCollection, ObservationMember, PropertyInfo, TextEncoding,
};

/// XML namespaces used in SOS documents.
pub mod namespaces {
    pub const OWS: &str = "http://www.opengis.net/ows/1.1";
    pub const OM: &str = "http://www.opengis.net/om/1.0";
    pub const GML: &str = "http://www.opengis.net/gml";
    pub const SWE: &str = "http://www.opengis.net/swe/1.0.1";
    pub const XLINK: &str = "http://www.w3.org/1999/xlink";
    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
}

/// Content type of every SOS response document.
pub const CONTENT_TYPE: &str = "text/xml";

/// Escape for the colon in identifiers that travel through `gml:id`
/// attributes, which cannot contain colons.
pub const COLON_ESCAPE: &str = "_-_";

/// Make an identifier safe for use as a `gml:id`.
pub fn gml_id(s: &str) -> String {
    s.replace(':', COLON_ESCAPE)
}
