//! HTTP API routes
//!
//! Defines all REST API endpoints for the server.

use crate::error::Error;
use crate::geo::{Coordinates, GeoBackend, LocationCandidate};
use crate::location::ResolvedLocation;
use crate::server::state::AppState;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Create the API router
pub fn create_router<B: GeoBackend + 'static>(state: Arc<AppState<B>>) -> Router {
    Router::new()
        .route("/api/status", get(status_handler::<B>))
        .route("/api/suggestions", get(suggestions_handler::<B>))
        .route("/api/resolve", post(resolve_handler::<B>))
        .route("/api/reverse", get(reverse_handler::<B>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
}

impl ApiError {
    fn new(error: impl Into<String>, code: &str) -> Self {
        Self {
            error: error.into(),
            code: code.to_string(),
        }
    }

    fn status(&self) -> StatusCode {
        match self.code.as_str() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "GEOCODING_ERROR" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidCoordinates(_) => "INVALID_COORDINATES",
            Error::Geocoding(_) | Error::Http(_) => "GEOCODING_ERROR",
            _ => "INTERNAL_ERROR",
        };
        ApiError::new(err.to_string(), code)
    }
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
    pub version: String,
    /// Base URL of the configured geocoder
    pub geocoder: String,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler<B: GeoBackend>(State(state): State<Arc<AppState<B>>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        geocoder: state.config.geocoder.base_url.clone(),
    })
}

#[derive(Debug, Deserialize)]
pub struct SuggestionsQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub query: String,
    pub suggestions: Vec<LocationCandidate>,
}

/// Search suggestions; failures upstream come back as an empty list
///
/// GET /api/suggestions?q=
async fn suggestions_handler<B: GeoBackend>(
    State(state): State<Arc<AppState<B>>>,
    Query(params): Query<SuggestionsQuery>,
) -> Json<SuggestionsResponse> {
    let suggestions = state.fetcher.invoke(&params.q).await;
    Json(SuggestionsResponse {
        query: params.q,
        suggestions,
    })
}

/// Resolve a picked candidate
///
/// POST /api/resolve
async fn resolve_handler<B: GeoBackend>(
    State(state): State<Arc<AppState<B>>>,
    Json(candidate): Json<LocationCandidate>,
) -> Result<Json<ResolvedLocation>, ApiError> {
    candidate.coordinates().validate()?;
    Ok(Json(state.resolver.resolve(&candidate)))
}

#[derive(Debug, Deserialize)]
pub struct ReverseQuery {
    pub lat: f64,
    pub lng: f64,
}

/// Reverse geocode a point; an upstream failure is a 502, no address a 404
///
/// GET /api/reverse?lat=&lng=
async fn reverse_handler<B: GeoBackend>(
    State(state): State<Arc<AppState<B>>>,
    Query(params): Query<ReverseQuery>,
) -> Result<Json<ResolvedLocation>, ApiError> {
    let coords = Coordinates::new(params.lat, params.lng);
    coords.validate()?;

    let hit = state.geocoder.reverse(coords).await?.ok_or_else(|| {
        ApiError::new(format!("No address found at {}, {}", coords.lat, coords.lng), "NOT_FOUND")
    })?;

    Ok(Json(state.resolver.merge_reverse(&ResolvedLocation::empty(), coords, &hit)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::test_support::{candidate, MockBackend};
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn create_test_app(backend: MockBackend) -> (Router, Arc<MockBackend>) {
        let backend = Arc::new(backend);
        let state = Arc::new(AppState::new(Config::default(), backend.clone()));
        (create_router(state), backend)
    }

    fn paris() -> LocationCandidate {
        candidate("Paris, France", 48.8566, 2.3522, &[("country", "France")])
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let (app, _) = create_test_app(MockBackend::new());

        let response = app
            .oneshot(Request::builder().uri("/api/status").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let status: StatusResponse = body_json(response).await;
        assert!(status.running);
        assert_eq!(status.geocoder, "https://nominatim.openstreetmap.org");
    }

    #[tokio::test]
    async fn test_suggestions_endpoint() {
        let (app, _) = create_test_app(MockBackend::new().with_results("Paris", vec![paris()]));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/suggestions?q=Paris")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let result: SuggestionsResponse = body_json(response).await;
        assert_eq!(result.query, "Paris");
        assert_eq!(result.suggestions, vec![paris()]);
    }

    #[tokio::test]
    async fn test_blank_suggestions_skip_geocoder() {
        let (app, backend) = create_test_app(MockBackend::new());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/suggestions?q=%20%20")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let result: SuggestionsResponse = body_json(response).await;
        assert!(result.suggestions.is_empty());
        assert!(backend.search_calls().is_empty());
    }

    #[tokio::test]
    async fn test_resolve_endpoint() {
        let (app, _) = create_test_app(MockBackend::new());
        let tokyo = candidate("Ueno Park, Taito, Tokyo, Japan", 35.71, 139.77, &[("city", "Taito"), ("country", "Japan")]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/resolve")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&tokyo).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let resolved: ResolvedLocation = body_json(response).await;
        assert_eq!(resolved.city, "Tokyo");
        assert_eq!(resolved.country, "Japan");
    }

    #[tokio::test]
    async fn test_resolve_rejects_bad_coordinates() {
        let (app, _) = create_test_app(MockBackend::new());
        let bad = candidate("Nowhere", 123.0, 0.0, &[]);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/resolve")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(serde_json::to_vec(&bad).unwrap()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "INVALID_COORDINATES");
    }

    #[tokio::test]
    async fn test_reverse_endpoint() {
        let hit = candidate("Shinjuku, Tokyo, Japan", 0.0, 0.0, &[("country", "Japan")]);
        let (app, backend) = create_test_app(MockBackend::new().with_reverse(hit));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/reverse?lat=35.68&lng=139.69")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let resolved: ResolvedLocation = body_json(response).await;
        assert_eq!(resolved.city, "Tokyo");
        assert_eq!(resolved.coordinates, Some(Coordinates::new(35.68, 139.69)));
        assert_eq!(backend.reverse_calls(), vec![Coordinates::new(35.68, 139.69)]);
    }

    #[tokio::test]
    async fn test_reverse_not_found() {
        let (app, _) = create_test_app(MockBackend::new());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/reverse?lat=0&lng=-30")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_reverse_geocoder_outage_is_bad_gateway() {
        let (app, _) = create_test_app(MockBackend::failing());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/reverse?lat=1&lng=1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let error: ApiError = body_json(response).await;
        assert_eq!(error.code, "GEOCODING_ERROR");
    }

    #[tokio::test]
    async fn test_reverse_rejects_out_of_range() {
        let (app, backend) = create_test_app(MockBackend::new());

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/reverse?lat=95&lng=0")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(backend.reverse_calls().is_empty());
    }
}
