//! Data Transfer Objects (DTOs) for API requests and responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use sj_core::{MaterializedJob, NormalizedEntity, ResultEnvelope, ShareLinkRequest};

// ============================================================================
// Make-job DTOs
// ============================================================================

/// Request to build enrichment queries for an incident.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct MakeJobRequest {
    /// Sentinel incident as emitted by the incident-creation trigger.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub sentinel_incident: Value,
    /// Enrichment job descriptor (`item-type`, `entity-type`, `query`, `additional_params`).
    #[serde(default)]
    #[schema(value_type = Object)]
    pub enrichment_job: Value,
}

/// An entity reduced to its kind and substitution value.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EntityResponse {
    pub kind: String,
    pub entity_value: String,
}

impl From<NormalizedEntity> for EntityResponse {
    fn from(entity: NormalizedEntity) -> Self {
        Self {
            kind: entity.kind,
            entity_value: entity.entity_value,
        }
    }
}

/// A query to run for one matching entity.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct JobResponse {
    pub kind: String,
    pub entity_value: String,
    pub query_to_run: String,
}

impl From<MaterializedJob> for JobResponse {
    fn from(job: MaterializedJob) -> Self {
        Self {
            kind: job.entity.kind,
            entity_value: job.entity.entity_value,
            query_to_run: job.query_to_run,
        }
    }
}

/// Result of a make-job request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MakeJobResponse {
    pub jobs: Vec<JobResponse>,
    /// Lowercased entity kinds found in the incident.
    pub distinct_entities: Vec<String>,
    /// `friendlyName:kind` labels.
    pub friendly_entities: Vec<String>,
    pub customised_entities: Vec<EntityResponse>,
    pub warnings: String,
    pub errors: String,
    pub status: String,
}

impl From<ResultEnvelope> for MakeJobResponse {
    fn from(envelope: ResultEnvelope) -> Self {
        Self {
            jobs: envelope.jobs.into_iter().map(Into::into).collect(),
            distinct_entities: envelope.distinct_entities.into_iter().collect(),
            friendly_entities: envelope.friendly_entities,
            customised_entities: envelope
                .customised_entities
                .into_iter()
                .map(Into::into)
                .collect(),
            warnings: envelope.warnings,
            errors: envelope.errors,
            status: envelope.status,
        }
    }
}

// ============================================================================
// Share-link DTOs
// ============================================================================

/// Request to build a Log Analytics share link.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ShareUrlRequest {
    pub query: String,
    pub subscription_id: String,
    pub resource_group: String,
    pub workspace_name: String,
    /// ISO-8601 duration or encoded interval appended as `/timespan/...`.
    pub timespan: String,
    /// Prepend `set query_now = datetime(...)` to the query.
    pub set_query_now: bool,
}

impl From<ShareUrlRequest> for ShareLinkRequest {
    fn from(request: ShareUrlRequest) -> Self {
        Self {
            query: request.query,
            subscription_id: request.subscription_id,
            resource_group: request.resource_group,
            workspace_name: request.workspace_name,
            timespan: request.timespan,
            set_query_now: request.set_query_now,
        }
    }
}

/// Share link or the reasons it could not be built.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ShareUrlResponse {
    pub share_url: String,
    pub errors: String,
}

// ============================================================================
// Health DTOs
// ============================================================================

/// Health check response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}
