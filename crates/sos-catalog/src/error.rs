//! Error types for catalog access.

use sos_common::SosError;
use thiserror::Error;

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Error types for catalog access.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// File I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Variable not present in the dataset
    #[error("Missing variable: {0}")]
    MissingVariable(String),

    /// Coordinate axis not present in the dataset
    #[error("Missing coordinate axis: {0}")]
    MissingAxis(String),

    /// Invalid data format
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    /// Error reported by the NetCDF library
    #[error("NetCDF error: {0}")]
    NetCdf(String),
}

impl From<CatalogError> for SosError {
    fn from(err: CatalogError) -> Self {
        SosError::CatalogError(err.to_string())
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::InvalidFormat(format!("JSON error: {}", err))
    }
}

impl From<serde_yaml::Error> for CatalogError {
    fn from(err: serde_yaml::Error) -> Self {
        CatalogError::InvalidFormat(format!("YAML error: {}", err))
    }
}
