//! GetObservation handlers.

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Extension, Path, Query},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use getobs::{GetObservationPipeline, SosDocument};
use serde::Deserialize;
use sos_common::SosError;
use sos_protocol::{GetObservationParams, CONTENT_TYPE};
use tracing::instrument;

use crate::state::{AppState, Dataset};

/// Picks the dataset on the unqualified `/sos` route.
#[derive(Debug, Default, Deserialize)]
pub struct DatasetSelector {
    pub dataset: Option<String>,
}

/// GET /sos
#[instrument(skip(state, selector, params))]
pub async fn default_dataset_handler(
    Extension(state): Extension<Arc<AppState>>,
    selector: Result<Query<DatasetSelector>, QueryRejection>,
    params: Result<Query<GetObservationParams>, QueryRejection>,
) -> Response {
    let requested = selector.ok().and_then(|Query(s)| s.dataset);
    let dataset = match &requested {
        Some(id) => state.dataset(id),
        None => state.default_dataset(),
    };
    let Some(dataset) = dataset else {
        let id = requested.unwrap_or_else(|| "(default)".to_string());
        return xml_response(SosDocument::error(&SosError::DatasetNotFound(id)));
    };
    get_observation(dataset.clone(), params).await
}

/// GET /sos/:dataset_id
#[instrument(skip(state, params))]
pub async fn dataset_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(dataset_id): Path<String>,
    params: Result<Query<GetObservationParams>, QueryRejection>,
) -> Response {
    let Some(dataset) = state.dataset(&dataset_id) else {
        return xml_response(SosDocument::error(&SosError::DatasetNotFound(dataset_id)));
    };
    get_observation(dataset.clone(), params).await
}

async fn get_observation(
    dataset: Dataset,
    params: Result<Query<GetObservationParams>, QueryRejection>,
) -> Response {
    let raw = params
        .map_err(|e| SosError::invalid("request", format!("Invalid query string: {}", e.body_text())))
        .and_then(|Query(params)| params.into_request());
    let raw = match raw {
        Ok(raw) => raw,
        Err(e) => {
            tracing::debug!(dataset = %dataset.config.id, "Rejected request: {}", e);
            return xml_response(SosDocument::error(&e));
        }
    };

    tracing::debug!(
        dataset = %dataset.config.id,
        offering = %raw.offering,
        "GetObservation request"
    );

    // Extraction reads the dataset synchronously.
    let catalog = Arc::clone(&dataset.catalog);
    let document = tokio::task::spawn_blocking(move || {
        GetObservationPipeline::new(catalog.as_ref()).respond(raw)
    })
    .await
    .unwrap_or_else(|e| {
        tracing::error!(dataset = %dataset.config.id, "GetObservation task failed: {}", e);
        SosDocument::error(&SosError::Internal(e.to_string()))
    });

    xml_response(document)
}

fn xml_response(document: SosDocument) -> Response {
    let status =
        StatusCode::from_u16(document.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, CONTENT_TYPE)], document.body).into_response()
}
