//! Error types for the enrichment job pipeline.

use thiserror::Error;

/// Errors raised when an incident or job document does not have the expected shape.
///
/// These never carry business-rule violations; those are collected in a
/// [`crate::job::ValidationReport`] instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// A document or one of its members has the wrong JSON type.
    #[error("incorrect schema: {0}")]
    Schema(String),

    /// An entity lacks a field required to describe it.
    #[error("entity {index} is missing required field '{field}'")]
    MissingField {
        /// Position of the entity in `relatedEntities`.
        index: usize,
        /// Name of the missing field.
        field: &'static str,
    },
}

impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Schema(err.to_string())
    }
}

/// Result type for pipeline steps.
pub type PipelineResult<T> = Result<T, PipelineError>;
