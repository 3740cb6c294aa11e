//! GetObservation request resolution and data extraction.
//!
//! A request flows through a fixed sequence of stages, each returning
//! [`SosResult`](sos_common::SosResult) so the first failure ends the request:
//!
//! 1. [`sos_protocol::normalize`]: decode the offering and pick the formatter
//! 2. [`properties`]: map observed properties onto dataset variables
//! 3. [`procedures`]: expand and validate the requested procedures
//! 4. [`temporal`]: resolve `first` / `latest` and build the time interval
//! 5. [`axes`]: add the coordinate variables needed to georeference output
//! 6. [`extract`]: build the extractor for the dataset's feature type
//! 7. [`assembler`]: collect per-entity results into an observation collection
//!
//! [`GetObservationPipeline`] runs them in order.

pub mod assembler;
pub mod axes;
pub mod context;
pub mod extract;
pub mod pipeline;
pub mod procedures;
pub mod properties;
pub mod temporal;

pub use context::RequestContext;
pub use extract::{dispatch, FeatureExtractor, Observation};
pub use pipeline::{GetObservationPipeline, GetObservationResponse, SosDocument};
pub use temporal::TemporalResolution;
