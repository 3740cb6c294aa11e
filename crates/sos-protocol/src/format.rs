//! Supported GetObservation response formats.

use serde::{Deserialize, Serialize};

/// OOSTethys O&M 1.0.0 response format.
pub const OOSTETHYS_RESPONSE_FORMAT: &str = "text/xml;subtype=\"om/1.0.0\"";

/// IOOS SOS 1.0 profile of O&M 1.0.0.
pub const IOOS10_RESPONSE_FORMAT: &str = "text/xml;subtype=\"om/1.0.0/profiles/ioos_sos/1.0\"";

/// Formatter variant selected by the negotiated response format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseFormat {
    OosTethys,
    Ioos10,
}

impl ResponseFormat {
    /// Match a normalized response-format string, ignoring case.
    pub fn from_format_string(format: &str) -> Option<Self> {
        if format.eq_ignore_ascii_case(OOSTETHYS_RESPONSE_FORMAT) {
            Some(ResponseFormat::OosTethys)
        } else if format.eq_ignore_ascii_case(IOOS10_RESPONSE_FORMAT) {
            Some(ResponseFormat::Ioos10)
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseFormat::OosTethys => OOSTETHYS_RESPONSE_FORMAT,
            ResponseFormat::Ioos10 => IOOS10_RESPONSE_FORMAT,
        }
    }
}
