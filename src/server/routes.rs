//! Enumeration API endpoints
//!
//! ## Endpoints
//!
//! - `POST /api/v1/hosts/tags` - distinct host tags
//! - `POST /api/v1/hosts/operating-systems` - distinct host operating systems
//! - `GET /health` - liveness probe
//!
//! The optional `x-org-id` header scopes the enumeration to one
//! organization.

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::enumeration::{
    org_scope, EnumerationResolver, EnumerationResult, HostOperatingSystem,
    HostOperatingSystemsArgs, HostTag, HostTagsArgs,
};
use crate::error::EnumerationError;
use crate::filter::Constraint;

/// Header carrying the caller's organization
pub const ORG_ID_HEADER: &str = "x-org-id";

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<EnumerationResolver>,
}

impl AppState {
    pub fn new(resolver: Arc<EnumerationResolver>) -> Self {
        Self { resolver }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/v1/hosts/tags", post(host_tags))
        .route("/api/v1/hosts/operating-systems", post(host_operating_systems))
        .route("/health", get(health))
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

// ============================================================================
// Errors
// ============================================================================

/// Renders an [`EnumerationError`] as `{ "error": message }`
#[derive(Debug)]
pub struct ApiError(EnumerationError);

impl From<EnumerationError> for ApiError {
    fn from(err: EnumerationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Enumeration failed");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

// ============================================================================
// Handlers
// ============================================================================

fn scope_from(headers: &HeaderMap) -> Vec<Constraint> {
    headers
        .get(ORG_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .filter(|org_id| !org_id.is_empty())
        .map(|org_id| vec![org_scope(org_id)])
        .unwrap_or_default()
}

/// POST /api/v1/hosts/tags
async fn host_tags(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(args): Json<HostTagsArgs>,
) -> Result<Json<EnumerationResult<HostTag>>, ApiError> {
    let result = state
        .resolver
        .list_host_tags(args, scope_from(&headers))
        .await?;
    Ok(Json(result))
}

/// POST /api/v1/hosts/operating-systems
async fn host_operating_systems(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(args): Json<HostOperatingSystemsArgs>,
) -> Result<Json<EnumerationResult<HostOperatingSystem>>, ApiError> {
    let result = state
        .resolver
        .list_host_operating_systems(args, scope_from(&headers))
        .await?;
    Ok(Json(result))
}

/// GET /health
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}
