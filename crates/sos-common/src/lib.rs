//! Common types and utilities shared across the SOS crates.

pub mod coords;
pub mod error;
pub mod time;

pub use coords::{format_corner, format_degree, LatLonBounds};
pub use error::{ErrorKind, SosError, SosResult};
pub use time::{format_iso8601, parse_iso8601, TimeParseError, TimeUnit};
