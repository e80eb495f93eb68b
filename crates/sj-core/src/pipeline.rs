//! The make-job pipeline.
//!
//! Extraction and validation run first and may end the request early; the
//! entity summaries are then computed and the job is materialized against
//! matching entities. Every exit point maps to a [`ResultCode`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

use crate::entity::{
    distinct_entity_types, extract_entities, friendly_entity_types, normalize_entities,
    NormalizedEntity,
};
use crate::error::PipelineError;
use crate::job::EnrichmentJob;
use crate::materialize::{materialize, MaterializedJob};

const WARN_NO_ENTITIES: &str = "no entities in incident";
const ERR_MALFORMED: &str = "incorrect schema or malformed payload";
const STATUS_SEE_WARNINGS: &str = "1:see_warnings,";
const STATUS_SEE_ERRORS: &str = "2:see_errors,";
const STATUS_TYPE_NOT_IN_INCIDENT: &str = "0:job entity type not in sentinel incident";
const STATUS_OK: &str = "0:ok";

/// Toggles applied while building jobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Rewrite account entities to `accountName@upnSuffix` when possible.
    #[serde(default = "default_true")]
    pub match_upn: bool,
    /// Substitute entity values into the job query.
    #[serde(default = "default_true")]
    pub rewrite_queries: bool,
}

fn default_true() -> bool {
    true
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            match_upn: true,
            rewrite_queries: true,
        }
    }
}

/// How a make-job request ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultCode {
    /// Jobs were materialized.
    Ok,
    /// Nothing to do: no entities, or none of the job's entity type.
    NoWork,
    /// The job failed validation.
    InvalidJob,
    /// The incident or job document has an unexpected shape.
    MalformedPayload,
}

impl ResultCode {
    /// HTTP status code reported for this outcome.
    pub fn http_status(&self) -> u16 {
        match self {
            ResultCode::Ok => 200,
            ResultCode::NoWork => 202,
            ResultCode::InvalidJob => 400,
            ResultCode::MalformedPayload => 418,
        }
    }

    /// Short label used for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResultCode::Ok => "ok",
            ResultCode::NoWork => "no_work",
            ResultCode::InvalidJob => "invalid_job",
            ResultCode::MalformedPayload => "malformed_payload",
        }
    }
}

/// Response body of a make-job request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub jobs: Vec<MaterializedJob>,
    pub distinct_entities: BTreeSet<String>,
    pub friendly_entities: Vec<String>,
    pub customised_entities: Vec<NormalizedEntity>,
    pub warnings: String,
    pub errors: String,
    pub status: String,
}

/// Envelope plus the code it should be returned with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub envelope: ResultEnvelope,
    pub code: ResultCode,
}

impl PipelineOutcome {
    fn new(envelope: ResultEnvelope, code: ResultCode) -> Self {
        Self { envelope, code }
    }

    fn malformed(mut envelope: ResultEnvelope, err: PipelineError) -> Self {
        warn!(error = %err, "Rejecting malformed payload");
        envelope.errors.push_str(ERR_MALFORMED);
        Self::new(envelope, ResultCode::MalformedPayload)
    }
}

/// Builds the jobs described by `job` for the entities of `incident`.
#[instrument(skip_all)]
pub fn make_job(incident: &Value, job: &Value, config: &PipelineConfig) -> PipelineOutcome {
    let mut envelope = ResultEnvelope::default();
    let mut early_exit = None;

    let entities = match extract_entities(incident) {
        Ok(entities) => entities,
        Err(err) => return PipelineOutcome::malformed(envelope, err),
    };
    if entities.is_empty() {
        info!("Incident has no related entities");
        envelope.warnings.push_str(WARN_NO_ENTITIES);
        envelope.status.push_str(STATUS_SEE_WARNINGS);
        early_exit = Some(ResultCode::NoWork);
    }

    let job = match EnrichmentJob::from_value(job) {
        Ok(job) => job,
        Err(err) => return PipelineOutcome::malformed(envelope, err),
    };
    match job.validate() {
        Ok(report) if !report.is_ok() => {
            envelope.status.push_str(STATUS_SEE_ERRORS);
            envelope.errors.push_str(&report.joined());
            early_exit = Some(ResultCode::InvalidJob);
        }
        Ok(_) => {}
        Err(err) => return PipelineOutcome::malformed(envelope, err),
    }

    if let Some(code) = early_exit {
        return PipelineOutcome::new(envelope, code);
    }

    let summaries = distinct_entity_types(&entities).and_then(|distinct| {
        let friendly = friendly_entity_types(&entities)?;
        let customised = normalize_entities(&entities, config.match_upn)?;
        Ok((distinct, friendly, customised))
    });
    match summaries {
        Ok((distinct, friendly, customised)) => {
            envelope.distinct_entities = distinct;
            envelope.friendly_entities = friendly;
            envelope.customised_entities = customised;
        }
        Err(err) => return PipelineOutcome::malformed(envelope, err),
    }

    let target = job.entity_type().to_lowercase();
    if !envelope.distinct_entities.contains(&target) {
        info!(entity_type = %target, "Job entity type not present in incident");
        envelope.status = STATUS_TYPE_NOT_IN_INCIDENT.to_string();
        return PipelineOutcome::new(envelope, ResultCode::NoWork);
    }

    envelope.jobs = materialize(&job, &envelope.customised_entities, config.rewrite_queries);
    debug!(jobs = envelope.jobs.len(), entity_type = %target, "Materialized jobs");
    envelope.status = STATUS_OK.to_string();

    PipelineOutcome::new(envelope, ResultCode::Ok)
}
