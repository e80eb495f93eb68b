//! Make-job endpoint.

use axum::{body::Bytes, extract::State, http::StatusCode, routing::post, Json, Router};
use tracing::info;

use sj_core::{make_job, ResultCode};
use sj_observability::metrics::record_make_job;

use crate::dto::{MakeJobRequest, MakeJobResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Creates make-job routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/MakeJob", post(create_jobs))
        .route("/make-job", post(create_jobs))
}

/// Maps a pipeline outcome to the HTTP status it is reported with.
pub fn status_for(code: ResultCode) -> StatusCode {
    match code {
        ResultCode::Ok => StatusCode::OK,
        ResultCode::NoWork => StatusCode::ACCEPTED,
        ResultCode::InvalidJob => StatusCode::BAD_REQUEST,
        ResultCode::MalformedPayload => StatusCode::IM_A_TEAPOT,
    }
}

/// Build one query per incident entity matching the job's entity type.
#[utoipa::path(
    post,
    path = "/api/MakeJob",
    request_body = MakeJobRequest,
    responses(
        (status = 200, description = "Jobs materialized", body = MakeJobResponse),
        (status = 202, description = "No entities, or none of the job's entity type", body = MakeJobResponse),
        (status = 400, description = "Job failed validation", body = MakeJobResponse),
        (status = 418, description = "Incident or job has an unexpected shape", body = MakeJobResponse),
        (status = 500, description = "Missing JSON payload", content_type = "text/plain")
    ),
    tag = "Jobs"
)]
pub async fn create_jobs(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<MakeJobResponse>), ApiError> {
    let request: MakeJobRequest = ApiError::parse_object(&body)?;

    let outcome = make_job(
        &request.sentinel_incident,
        &request.enrichment_job,
        &state.pipeline,
    );

    info!(
        outcome = outcome.code.as_str(),
        jobs = outcome.envelope.jobs.len(),
        "Processed make-job request"
    );
    record_make_job(outcome.code.as_str(), outcome.envelope.jobs.len());

    Ok((status_for(outcome.code), Json(outcome.envelope.into())))
}
