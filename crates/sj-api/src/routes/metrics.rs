//! Metrics endpoint.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::error::ApiError;
use crate::state::AppState;

/// Creates metrics routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/metrics", get(prometheus_metrics))
}

/// Prometheus metrics endpoint.
#[utoipa::path(
    get,
    path = "/metrics",
    responses(
        (status = 200, description = "Prometheus metrics", content_type = "text/plain"),
        (status = 503, description = "Metrics exporter not installed")
    ),
    tag = "Metrics"
)]
pub async fn prometheus_metrics(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let handle = state.prometheus_handle.as_ref().ok_or_else(|| {
        ApiError::ServiceUnavailable("Prometheus metrics not initialized".to_string())
    })?;

    Ok((
        StatusCode::OK,
        [(
            header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        handle.render(),
    ))
}
