//! JSON HTTP API over the field dispatcher
//!
//! Every request is answered from the immutable shared state; nothing is kept
//! between requests.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, warn};

use crate::{
    CivicRouteError,
    dispatch::{Classification, FieldDispatcher, NearestOutcome, RouteOutcome},
    issue_source::IssueSource,
    models::{Coordinate, IssueFilter, IssueLocation, IssueStats, Priority},
};

/// Shared, read-only application state
pub struct AppState {
    pub dispatcher: FieldDispatcher,
    pub source: Box<dyn IssueSource>,
}

pub type SharedState = Arc<AppState>;

#[derive(Debug, Serialize, Deserialize)]
pub struct NearestRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// Issues to search; the configured source is used when absent
    #[serde(default)]
    pub issues: Option<Vec<IssueLocation>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteRequest {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub priorities: Option<Vec<Priority>>,
    #[serde(default)]
    pub issues: Option<Vec<IssueLocation>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ClassifyRequest {
    pub latitude: f64,
    pub longitude: f64,
}

/// Error wrapper mapping validation failures to 400 and the rest to 500
pub struct ApiError(CivicRouteError);

impl From<CivicRouteError> for ApiError {
    fn from(err: CivicRouteError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = if self.0.is_validation() {
            warn!("Rejected request: {}", self.0);
            StatusCode::BAD_REQUEST
        } else {
            error!("Request failed: {}", self.0);
            StatusCode::INTERNAL_SERVER_ERROR
        };
        (status, Json(json!({ "error": self.0.user_message() }))).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/issues", get(get_issues))
        .route("/stats", get(get_stats))
        .route("/nearest", post(post_nearest))
        .route("/route", post(post_route))
        .route("/classify", post(post_classify))
        .with_state(state)
}

fn issues_or_source(state: &AppState, issues: Option<Vec<IssueLocation>>) -> Result<Vec<IssueLocation>, CivicRouteError> {
    match issues {
        Some(issues) => Ok(issues),
        None => state.source.load_issues(),
    }
}

/// `GET /issues?status=In%20Progress&priority=High`
async fn get_issues(
    State(state): State<SharedState>,
    Query(filter): Query<IssueFilter>,
) -> ApiResult<Vec<IssueLocation>> {
    let issues = state.source.load_issues()?;
    Ok(Json(filter.apply(issues)))
}

async fn get_stats(State(state): State<SharedState>) -> ApiResult<IssueStats> {
    let issues = state.source.load_issues()?;
    Ok(Json(state.dispatcher.stats(&issues)))
}

async fn post_nearest(
    State(state): State<SharedState>,
    Json(request): Json<NearestRequest>,
) -> ApiResult<NearestOutcome> {
    let issues = issues_or_source(&state, request.issues)?;
    let worker = Coordinate {
        latitude: request.latitude,
        longitude: request.longitude,
    };
    Ok(Json(state.dispatcher.nearest(worker, &issues)?))
}

async fn post_route(
    State(state): State<SharedState>,
    Json(request): Json<RouteRequest>,
) -> ApiResult<RouteOutcome> {
    let issues = issues_or_source(&state, request.issues)?;
    let worker = Coordinate {
        latitude: request.latitude,
        longitude: request.longitude,
    };
    let priorities = request
        .priorities
        .filter(|p| !p.is_empty())
        .map(|p| p.into_iter().collect::<HashSet<_>>());
    Ok(Json(state.dispatcher.optimize(worker, &issues, priorities)?))
}

async fn post_classify(
    State(state): State<SharedState>,
    Json(request): Json<ClassifyRequest>,
) -> ApiResult<Classification> {
    let coordinate = Coordinate {
        latitude: request.latitude,
        longitude: request.longitude,
    };
    Ok(Json(state.dispatcher.classify(coordinate)?))
}
