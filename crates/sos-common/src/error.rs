//! Error types for SOS request handling.

use thiserror::Error;

/// Result type alias using SosError.
pub type SosResult<T> = Result<T, SosError>;

/// Primary error type for GetObservation handling.
///
/// Every variant maps onto a single `ows:Exception` entry; the locator names
/// the request field that caused it, when there is one.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SosError {
    // === Request Errors ===
    #[error("{message}")]
    MissingParameter { locator: String, message: String },

    #[error("{message}")]
    InvalidParameter { locator: String, message: String },

    #[error("{message}")]
    UnrecognizedFormat { message: String },

    // === Dataset Errors ===
    #[error("{0}")]
    UnsupportedFeatureType(String),

    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("Failed to read dataset: {0}")]
    CatalogError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Discriminant of [`SosError`], for callers that only care about the class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    MissingParameter,
    InvalidParameter,
    UnrecognizedFormat,
    UnsupportedFeatureType,
    DatasetNotFound,
    CatalogError,
    Internal,
}

impl SosError {
    pub fn missing(locator: impl Into<String>, message: impl Into<String>) -> Self {
        SosError::MissingParameter {
            locator: locator.into(),
            message: message.into(),
        }
    }

    pub fn invalid(locator: impl Into<String>, message: impl Into<String>) -> Self {
        SosError::InvalidParameter {
            locator: locator.into(),
            message: message.into(),
        }
    }

    pub fn unrecognized_format(format: &str) -> Self {
        SosError::UnrecognizedFormat {
            message: format!("Could not recognize response format: {}", format),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            SosError::MissingParameter { .. } => ErrorKind::MissingParameter,
            SosError::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            SosError::UnrecognizedFormat { .. } => ErrorKind::UnrecognizedFormat,
            SosError::UnsupportedFeatureType(_) => ErrorKind::UnsupportedFeatureType,
            SosError::DatasetNotFound(_) => ErrorKind::DatasetNotFound,
            SosError::CatalogError(_) => ErrorKind::CatalogError,
            SosError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// The request field this error points at, if any.
    pub fn locator(&self) -> Option<&str> {
        match self {
            SosError::MissingParameter { locator, .. }
            | SosError::InvalidParameter { locator, .. } => Some(locator),
            SosError::UnrecognizedFormat { .. } => Some("responseFormat"),
            SosError::DatasetNotFound(_) => Some("offering"),
            SosError::UnsupportedFeatureType(_)
            | SosError::CatalogError(_)
            | SosError::Internal(_) => None,
        }
    }

    /// Human-readable exception text.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Get the OWS exception code for this error.
    pub fn exception_code(&self) -> &'static str {
        match self {
            SosError::MissingParameter { .. } => "MissingParameterValue",
            SosError::InvalidParameter { .. }
            | SosError::UnrecognizedFormat { .. }
            | SosError::DatasetNotFound(_) => "InvalidParameterValue",
            SosError::UnsupportedFeatureType(_)
            | SosError::CatalogError(_)
            | SosError::Internal(_) => "NoApplicableCode",
        }
    }

    /// Get the HTTP status code for this error.
    pub fn http_status_code(&self) -> u16 {
        match self {
            SosError::MissingParameter { .. }
            | SosError::InvalidParameter { .. }
            | SosError::UnrecognizedFormat { .. } => 400,

            SosError::DatasetNotFound(_) => 404,

            SosError::UnsupportedFeatureType(_)
            | SosError::CatalogError(_)
            | SosError::Internal(_) => 500,
        }
    }
}

impl From<std::io::Error> for SosError {
    fn from(err: std::io::Error) -> Self {
        SosError::CatalogError(err.to_string())
    }
}
