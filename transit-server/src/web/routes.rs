//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Local;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::query::{QueryError, QueryRequest};

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/search", get(search))
        .route("/api/routes/between", get(routes_between))
        .route("/api/routes/:number", get(route_details))
        .route("/api/routes/:number/accessibility", get(accessibility))
        .route("/api/timings", get(live_timings))
        .route("/api/fare", get(fare_estimate))
        .route("/api/areas", get(all_areas))
        .route("/api/stops/near", get(stops_near))
        .route("/api/status", get(status))
        .route("/api/query", post(query))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search routes, areas and stops.
async fn search(
    State(state): State<AppState>,
    Query(req): Query<SearchRequest>,
) -> Json<SearchResponse> {
    let results = state.service.search(req.q.as_deref().unwrap_or_default());
    Json(SearchResponse::from_results(&results))
}

/// Routes serving both ends of a trip.
async fn routes_between(
    State(state): State<AppState>,
    Query(req): Query<RoutesBetweenRequest>,
) -> Result<Json<RoutesBetweenResponse>, AppError> {
    let matches = state.service.routes_between(
        req.from.as_deref().unwrap_or_default(),
        req.to.as_deref().unwrap_or_default(),
    )?;
    Ok(Json(RoutesBetweenResponse::from_matches(&matches)))
}

/// A single route by number.
async fn route_details(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<RouteResult>, AppError> {
    let route = state.service.route(&number)?;
    Ok(Json(RouteResult::from_route(route)))
}

/// Accessibility features of a route.
async fn accessibility(
    State(state): State<AppState>,
    Path(number): Path<String>,
) -> Result<Json<AccessibilityResponse>, AppError> {
    let info = state.service.accessibility(&number)?;
    Ok(Json(AccessibilityResponse::from_info(&info)))
}

/// Live arrivals at a stop or area.
async fn live_timings(
    State(state): State<AppState>,
    Query(req): Query<LiveTimingsRequest>,
) -> Result<Json<LiveTimingsResponse>, AppError> {
    let result = state
        .service
        .live_timings(req.stop.as_deref().unwrap_or_default(), Local::now())?;
    Ok(Json(LiveTimingsResponse::from_result(&result)))
}

/// Distance and fares between two stops.
async fn fare_estimate(
    State(state): State<AppState>,
    Query(req): Query<FareRequest>,
) -> Result<Json<FareEstimateResponse>, AppError> {
    let estimate = state.service.fare_estimate(
        req.from.as_deref().unwrap_or_default(),
        req.to.as_deref().unwrap_or_default(),
    )?;
    Ok(Json(FareEstimateResponse::from_estimate(&estimate)))
}

/// Every known place name, for autocomplete.
async fn all_areas(State(state): State<AppState>) -> Json<AreasResponse> {
    Json(AreasResponse {
        areas: state.service.all_areas(),
    })
}

/// Stops whose name or zone matches an area label.
async fn stops_near(
    State(state): State<AppState>,
    Query(req): Query<StopsNearRequest>,
) -> Result<Json<StopsNearResponse>, AppError> {
    let stops = state
        .service
        .stops_near(req.area.as_deref().unwrap_or_default())?;
    Ok(Json(StopsNearResponse {
        stops: stops.iter().map(StopResult::from_nearby).collect(),
    }))
}

/// Operator status.
async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let status = state.service.status(Local::now());
    Json(StatusResponse::from_status(&status))
}

/// Any query, as a tagged JSON request.
async fn query(
    State(state): State<AppState>,
    Json(req): Json<QueryRequest>,
) -> Result<Json<QueryResponseDto>, AppError> {
    let response = state.service.handle(req)?;
    Ok(Json(QueryResponseDto::from_response(&response)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
}

impl From<QueryError> for AppError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::NotFound { .. } => AppError::NotFound {
                message: e.to_string(),
            },
            QueryError::MissingParameter(_) => AppError::BadRequest {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
