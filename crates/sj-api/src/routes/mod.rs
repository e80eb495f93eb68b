//! API routes.

pub mod health;
pub mod jobs;
pub mod metrics;
pub mod share_url;

use crate::state::AppState;
use axum::Router;

/// Creates the main API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Versioned API endpoint
        .nest("/api/v1", api_routes())
        // Function-style paths used by existing logic app connectors
        .nest("/api", api_routes())
        .merge(health::routes())
        .merge(metrics::routes())
        .with_state(state)
}

/// API routes under /api prefix.
fn api_routes() -> Router<AppState> {
    Router::new().merge(jobs::routes()).merge(share_url::routes())
}
