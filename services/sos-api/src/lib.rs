//! SOS API Service Library
//!
//! HTTP front end for GetObservation over a set of configured datasets.

pub mod config;
pub mod handlers;
pub mod state;

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

/// All service routes with their middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sos", get(handlers::observation::default_dataset_handler))
        .route(
            "/sos/:dataset_id",
            get(handlers::observation::dataset_handler),
        )
        .route("/health", get(handlers::health::health_handler))
        .route("/ready", get(handlers::health::ready_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
}
