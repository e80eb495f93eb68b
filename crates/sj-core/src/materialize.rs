//! Expansion of a job's query template over matching entities.

use serde::{Deserialize, Serialize};

use crate::entity::NormalizedEntity;
use crate::job::EnrichmentJob;

/// Token replaced by an entity's value in a job query.
pub const ENTITY_PLACEHOLDER: &str = "%ENTITY%";

/// A normalized entity paired with the concrete query to run for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializedJob {
    #[serde(flatten)]
    pub entity: NormalizedEntity,
    pub query_to_run: String,
}

/// Produces one query per entity whose kind matches the job's entity type.
///
/// Kinds are compared case-insensitively and input order is preserved. Entity
/// values are substituted verbatim, without any escaping for the downstream
/// query language. With `rewrite_queries` unset the template is copied as is.
pub fn materialize(
    job: &EnrichmentJob,
    entities: &[NormalizedEntity],
    rewrite_queries: bool,
) -> Vec<MaterializedJob> {
    let target = job.entity_type().to_lowercase();

    entities
        .iter()
        .filter(|entity| entity.kind.to_lowercase() == target)
        .map(|entity| {
            let query_to_run = if rewrite_queries {
                job.query().replace(ENTITY_PLACEHOLDER, &entity.entity_value)
            } else {
                job.query().to_string()
            };
            MaterializedJob {
                entity: entity.clone(),
                query_to_run,
            }
        })
        .collect()
}
