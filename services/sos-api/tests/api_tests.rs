//! Router-level tests for the SOS API.

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use sos_api::build_router;
use sos_api::config::DatasetConfig;
use sos_api::state::{AppState, Dataset};
use sos_catalog::Catalog;
use test_utils::catalogs::{grid_catalog, station_catalog};
use test_utils::workspace_root;
use tower::util::ServiceExt; // for `oneshot`

const FORMAT: &str = "text%2Fxml%3Bsubtype%3D%22om%2F1.0.0%22";
const NETWORK_ALL: &str = "urn:ioos:network:edu.test:all";

fn dataset(id: &str, catalog: impl Catalog + 'static) -> Dataset {
    Dataset {
        config: DatasetConfig {
            id: id.to_string(),
            title: id.to_string(),
            source: PathBuf::from(format!("{}.yaml", id)),
            naming_authority: None,
            default: false,
        },
        catalog: Arc::new(catalog),
    }
}

fn app() -> Router {
    let state = AppState::new(
        vec![
            dataset("buoys", station_catalog()),
            dataset("grid", grid_catalog()),
        ],
        Some("buoys".to_string()),
    );
    build_router(Arc::new(state))
}

fn get_observation(path: &str, extra: &str) -> String {
    format!(
        "{}service=SOS&request=GetObservation&version=1.0.0&offering={}&observedProperty=sea_water_temperature&responseFormat={}{}",
        path, NETWORK_ALL, FORMAT, extra
    )
}

async fn send(uri: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app().oneshot(request).await.unwrap();

    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_health() {
    let (status, _, body) = send("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"status\":\"ok\""));
}

#[tokio::test]
async fn test_ready_counts_datasets() {
    let (status, _, body) = send("/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("\"datasets\":2"));
}

#[tokio::test]
async fn test_named_dataset() {
    let (status, content_type, body) =
        send(&get_observation("/sos/buoys?", "&eventTime=latest")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/xml"));
    assert!(body.contains("<om:ObservationCollection"));
    assert!(body.contains("<swe:values>2020-01-01T02:00:00Z,11</swe:values>"));
}

#[tokio::test]
async fn test_default_dataset() {
    let (status, _, body) = send(&get_observation("/sos?", "")).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<gml:name>buoy2</gml:name>"));
}

#[tokio::test]
async fn test_dataset_selected_by_query() {
    let (status, _, body) = send(&get_observation(
        "/sos?dataset=grid&",
        "&latitude=41&longitude=-70",
    ))
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<gml:name>41.0000_-70.0000</gml:name>"));
}

#[tokio::test]
async fn test_grid_without_longitude() {
    let (status, content_type, body) =
        send(&get_observation("/sos/grid?", "&latitude=41")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(content_type.as_deref(), Some("text/xml"));
    assert!(body.contains("ows:ExceptionReport"));
    assert!(body.contains(r#"locator="longitude""#));
}

#[tokio::test]
async fn test_unknown_dataset() {
    let (status, _, body) = send(&get_observation("/sos/nope?", "")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("ows:ExceptionReport"));
    assert!(body.contains("nope"));
}

#[tokio::test]
async fn test_missing_request_parameter() {
    let (status, _, body) = send("/sos/buoys?service=SOS").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains(r#"locator="request""#));
}

#[tokio::test]
async fn test_unknown_property_reports_locator() {
    let uri = format!(
        "/sos/buoys?service=SOS&request=GetObservation&offering={}&observedProperty=air_pressure&responseFormat={}",
        NETWORK_ALL, FORMAT
    );
    let (status, _, body) = send(&uri).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains(r#"locator="observedProperty""#));
    assert!(body.contains("observed property - air_pressure - was not found in the dataset"));
}

#[test]
fn test_shipped_configuration_loads() {
    let state = AppState::load(workspace_root().join("config/sos")).unwrap();
    assert_eq!(state.dataset_count(), 2);

    let default = state.default_dataset().unwrap();
    assert_eq!(default.config.id, "buoys");
    assert_eq!(default.catalog.stations().len(), 3);
    assert!(state.dataset("gulf-grid").is_some());
}
