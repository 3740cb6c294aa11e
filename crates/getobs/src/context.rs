//! The validated request handed to feature extraction.

use std::collections::HashMap;

use sos_protocol::ResponseFormat;

use crate::temporal::TemporalResolution;

/// Result of the resolution stages. Every identifier in it exists in the
/// dataset; nothing changes it once built.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub offering: String,
    /// Procedure URNs, unique, in request order.
    pub procedures: Vec<String>,
    /// Variable names, including completed coordinate axes.
    pub variables: Vec<String>,
    /// The subset of `variables` reported as observed properties.
    pub observed_properties: Vec<String>,
    pub time: TemporalResolution,
    /// Raw spatial constraints, consulted for grid datasets only.
    pub lat_lon: HashMap<String, String>,
    pub response_format: ResponseFormat,
}
