use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
    response::Json,
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    SafeBreatheError,
    aggregator::Aggregator,
    models::{LocationQuery, RawPayload},
    orchestrator::PayloadSource,
    view::UnifiedViewModel,
};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn PayloadSource>,
    pub aggregator: Aggregator,
}

/// `city`, or `lat` and `lon`; none of them means the default location
#[derive(Debug, Default, Deserialize)]
pub struct DashboardParams {
    pub city: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

impl DashboardParams {
    fn to_query(&self) -> Result<LocationQuery, SafeBreatheError> {
        LocationQuery::from_params(self.city.as_deref(), self.lat, self.lon)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

type ApiFailure = (StatusCode, Json<ApiError>);

/// Query extraction that reports malformed parameters as JSON
type ParamsResult = Result<Query<DashboardParams>, QueryRejection>;

fn failure(status: StatusCode, err: &SafeBreatheError) -> ApiFailure {
    (
        status,
        Json(ApiError {
            error: err.user_message(),
        }),
    )
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(welcome))
        .route("/dashboard-data", get(get_dashboard_data))
        .route("/dashboard", get(get_dashboard))
        .with_state(state)
}

async fn welcome() -> Json<ApiMessage> {
    Json(ApiMessage {
        message: "Welcome to SafeBreathe!".to_string(),
    })
}

async fn fetch_payload(state: &AppState, params: ParamsResult) -> Result<RawPayload, ApiFailure> {
    let Query(params) = params.map_err(|rejection| {
        failure(
            StatusCode::BAD_REQUEST,
            &SafeBreatheError::validation(rejection.body_text()),
        )
    })?;
    let query = params
        .to_query()
        .map_err(|e| failure(StatusCode::BAD_REQUEST, &e))?;

    state.source.fetch(&query).await.map_err(|e| {
        warn!("Payload source failed for {:?}: {}", query, e);
        failure(StatusCode::BAD_GATEWAY, &e)
    })
}

async fn get_dashboard_data(
    State(state): State<AppState>,
    params: ParamsResult,
) -> Result<Json<RawPayload>, ApiFailure> {
    fetch_payload(&state, params).await.map(Json)
}

async fn get_dashboard(
    State(state): State<AppState>,
    params: ParamsResult,
) -> Result<Json<UnifiedViewModel>, ApiFailure> {
    let payload = fetch_payload(&state, params).await?;
    state
        .aggregator
        .aggregate(&payload)
        .map(Json)
        .map_err(|e| failure(StatusCode::BAD_GATEWAY, &e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    struct CannedSource(RawPayload);

    #[async_trait]
    impl PayloadSource for CannedSource {
        async fn fetch(&self, _query: &LocationQuery) -> crate::Result<RawPayload> {
            Ok(self.0.clone())
        }
    }

    struct DownSource;

    #[async_trait]
    impl PayloadSource for DownSource {
        async fn fetch(&self, _query: &LocationQuery) -> crate::Result<RawPayload> {
            Err(SafeBreatheError::transport("connection refused"))
        }
    }

    fn app(source: impl PayloadSource + 'static) -> Router {
        router(AppState {
            source: Arc::new(source),
            aggregator: Aggregator::default(),
        })
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_welcome() {
        let (status, body) = get_json(app(DownSource), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Welcome to SafeBreathe!");
    }

    #[tokio::test]
    async fn test_dashboard_aggregates_payload() {
        let payload: RawPayload =
            serde_json::from_str(r#"{"pollution": {"aqi_score": 1}, "location": "Metz"}"#)
                .unwrap();
        let (status, body) = get_json(app(CannedSource(payload)), "/dashboard?city=Metz").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["location"], "Metz");
        assert_eq!(body["pollution_summary"]["is_good_for_exercise"], true);
        assert_eq!(body["uv_band"]["state"], "unavailable");
    }

    #[tokio::test]
    async fn test_dashboard_surfaces_upstream_error() {
        let payload = RawPayload::failed("rate limited");
        let (status, body) = get_json(app(CannedSource(payload)), "/dashboard").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], "rate limited");
    }

    #[tokio::test]
    async fn test_dashboard_data_passes_error_payload_through() {
        let payload = RawPayload::failed("Unable to retrieve data.");
        let (status, body) = get_json(app(CannedSource(payload)), "/dashboard-data").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["error"], "Unable to retrieve data.");
    }

    #[tokio::test]
    async fn test_blank_city_is_bad_request() {
        let (status, body) = get_json(app(DownSource), "/dashboard-data?city=%20").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("City name cannot be empty"));
    }

    #[tokio::test]
    async fn test_unparsable_coordinate_is_json_bad_request() {
        let (status, body) = get_json(app(DownSource), "/dashboard?lat=abc&lon=7").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid input:"));
    }

    #[tokio::test]
    async fn test_unreachable_source_is_bad_gateway() {
        let (status, body) = get_json(app(DownSource), "/dashboard").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["error"], crate::error::GENERIC_FAILURE_MESSAGE);
    }
}
