//! # sj-core
//!
//! Core transformation logic for SOAR Jobs.
//!
//! Given a Sentinel incident and an enrichment job descriptor, this crate
//! validates the job, normalizes the incident's related entities and expands
//! the job's query template once per matching entity. It also builds
//! Log Analytics share links from raw queries.
//!
//! Every operation is a pure function of its input; nothing here performs I/O.

pub mod entity;
pub mod error;
pub mod job;
pub mod materialize;
pub mod pipeline;
pub mod share_link;

pub use entity::{
    distinct_entity_types, extract_entities, friendly_entity_types, normalize_entities,
    IncidentEntity, NormalizedEntity,
};
pub use error::{PipelineError, PipelineResult};
pub use job::{AdditionalParams, EnrichmentJob, Severity, SeverityRule, ValidationReport};
pub use materialize::{materialize, MaterializedJob, ENTITY_PLACEHOLDER};
pub use pipeline::{make_job, PipelineConfig, PipelineOutcome, ResultCode, ResultEnvelope};
pub use share_link::{
    build_share_url, build_share_url_at, decode_query, encode_query, ShareLinkConfig,
    ShareLinkError, ShareLinkRequest,
};
