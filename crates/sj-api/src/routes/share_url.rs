//! Share-link endpoint.

use axum::{body::Bytes, extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::warn;

use sj_core::{build_share_url, ShareLinkRequest};
use sj_observability::metrics::record_share_url;

use crate::dto::{ShareUrlRequest, ShareUrlResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Creates share-link routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/MakeLaShareUrl", post(create_share_url))
        .route("/share-url", post(create_share_url))
}

/// Build a Log Analytics deep link that opens the given query.
#[utoipa::path(
    post,
    path = "/api/MakeLaShareUrl",
    request_body = ShareUrlRequest,
    responses(
        (status = 200, description = "Share link built", body = ShareUrlResponse),
        (status = 500, description = "Required fields missing, or missing JSON payload", body = ShareUrlResponse)
    ),
    tag = "Share links"
)]
pub async fn create_share_url(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<ShareUrlResponse>), ApiError> {
    let request: ShareUrlRequest = ApiError::parse_object(&body)?;
    let request = ShareLinkRequest::from(request);

    let (status, response) = match build_share_url(&request, &state.share_link) {
        Ok(share_url) => {
            record_share_url("ok");
            (
                StatusCode::OK,
                ShareUrlResponse {
                    share_url,
                    errors: String::new(),
                },
            )
        }
        Err(err) => {
            warn!(error = %err, "Share link not built");
            record_share_url("error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ShareUrlResponse {
                    share_url: String::new(),
                    errors: err.to_string(),
                },
            )
        }
    };

    Ok((status, Json(response)))
}
