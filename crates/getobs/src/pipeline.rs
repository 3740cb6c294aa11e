//! The GetObservation pipeline.

use sos_catalog::{AxisType, Catalog, FeatureType};
use sos_common::{SosError, SosResult};
use sos_protocol::normalize::normalize_request;
use sos_protocol::{
    exception_report, DocumentError, ObservationCollection, RawObservationRequest, ResponseFormat,
};
use tracing::{debug, info, warn};

use crate::assembler::assemble;
use crate::axes::{complete_axis, complete_grid_axes, observed_properties};
use crate::context::RequestContext;
use crate::extract::dispatch;
use crate::procedures::resolve_procedures;
use crate::properties::resolve_properties;
use crate::temporal::resolve_time;

/// A successful GetObservation result and the format it was asked in.
#[derive(Debug, Clone, PartialEq)]
pub struct GetObservationResponse {
    pub format: ResponseFormat,
    pub collection: ObservationCollection,
}

impl GetObservationResponse {
    pub fn to_xml(&self) -> Result<String, DocumentError> {
        self.collection.to_xml(self.format)
    }
}

/// The final document of a request: an observation collection or an
/// exception report, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SosDocument {
    pub status: u16,
    pub body: String,
}

impl SosDocument {
    pub fn error(error: &SosError) -> Self {
        Self {
            status: error.http_status_code(),
            body: exception_report(error),
        }
    }
}

/// Runs GetObservation requests against one dataset.
///
/// Stages run in order and the first failing stage ends the request.
pub struct GetObservationPipeline<'a> {
    catalog: &'a dyn Catalog,
}

impl<'a> GetObservationPipeline<'a> {
    pub fn new(catalog: &'a dyn Catalog) -> Self {
        Self { catalog }
    }

    /// Normalize the request and resolve it against the dataset.
    pub fn resolve(&self, raw: RawObservationRequest) -> SosResult<RequestContext> {
        let catalog = self.catalog;

        let request = normalize_request(raw)?;
        let variables = resolve_properties(catalog, &request.observed_properties)?;
        let procedures = resolve_procedures(catalog, &request.offering, request.procedures.as_deref())?;
        let time = resolve_time(catalog, &request.event_time)?;

        let height = catalog.coordinate_axis(AxisType::Height);
        let mut variables = complete_axis(variables, height);
        if catalog.feature_type() == Some(FeatureType::Grid) {
            variables = complete_grid_axes(catalog, variables);
        }
        let observed_properties = observed_properties(&variables, height);

        debug!(variables = ?variables, "Completed coordinate axes");

        Ok(RequestContext {
            offering: request.offering,
            procedures,
            variables,
            observed_properties,
            time,
            lat_lon: request.lat_lon,
            response_format: request.response_format,
        })
    }

    /// Resolve, extract and assemble.
    pub fn execute(&self, raw: RawObservationRequest) -> SosResult<GetObservationResponse> {
        let ctx = self.resolve(raw)?;
        let extractor = dispatch(self.catalog, &ctx)?;
        let collection = assemble(self.catalog, &ctx, extractor.as_ref())?;

        info!(
            offering = %ctx.offering,
            members = collection.members.len(),
            "GetObservation complete"
        );
        Ok(GetObservationResponse {
            format: ctx.response_format,
            collection,
        })
    }

    /// Run the request and render whichever document results.
    pub fn respond(&self, raw: RawObservationRequest) -> SosDocument {
        let rendered = self.execute(raw).and_then(|response| {
            response
                .to_xml()
                .map_err(|e| SosError::Internal(format!("Failed to render document: {}", e)))
        });

        match rendered {
            Ok(body) => SosDocument { status: 200, body },
            Err(e) => {
                warn!(
                    kind = ?e.kind(),
                    locator = e.locator().unwrap_or("-"),
                    "GetObservation failed: {}",
                    e
                );
                SosDocument::error(&e)
            }
        }
    }
}
