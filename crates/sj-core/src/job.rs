//! Enrichment job descriptors and their validation.
//!
//! A job arrives as loosely-typed JSON, so optional members are kept as raw
//! [`serde_json::Value`]s and checked by [`EnrichmentJob::validate`] rather than
//! rejected during deserialization.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::error::{PipelineError, PipelineResult};

/// The only job type this service materializes.
pub const SOAR_TRIGGER: &str = "SOAR-trigger";

const MSG_NOT_SOAR_TRIGGER: &str = "Job type not SOAR trigger";
const MSG_ENTITY_TYPE_EMPTY: &str = "entity-type empty field";
const MSG_INVALID_QUERY: &str = "invalid query";
const MSG_RESULTS_COUNT_NAN: &str = "Job Error: results_count_mt is not a number";
const MSG_SEVERITY_MISSING: &str =
    "Job Error: Job included severity change but did not specify a Low/Medium/High/Informational";
const MSG_ENTITY_CONTAINS_EMPTY: &str = "Job Error: entity_contains requires string";
const MSG_COMMENT_NOT_BOOL: &str = "commentOnIncidents is not true or false";

/// Incident severity levels a job may move an incident to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Informational,
    Low,
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Informational => "Informational",
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for Severity {
    type Err = String;

    /// Parses a severity. Matching is case-sensitive, as in Sentinel.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Informational" => Ok(Severity::Informational),
            "Low" => Ok(Severity::Low),
            "Medium" => Ok(Severity::Medium),
            "High" => Ok(Severity::High),
            _ => Err(format!("Invalid severity: {}", s)),
        }
    }
}

/// A conditional severity change attached to a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityRule {
    /// Minimum result count ("more than") that triggers the change.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub results_count_mt: Option<Value>,
    /// Substring an entity value must contain to trigger the change.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub entity_contains: Option<Value>,
    /// Target severity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Value>,
}

impl SeverityRule {
    /// Returns the target severity if it names one of the allowed levels.
    pub fn level(&self) -> Option<Severity> {
        self.severity
            .as_ref()
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
    }
}

/// Optional post-processing parameters of a job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdditionalParams {
    /// Severity rules. Entries that are not JSON objects carry no rule and
    /// are dropped.
    #[serde(default, deserialize_with = "object_rules")]
    pub severity_change: Vec<SeverityRule>,
    /// Whether query results should be posted as incident comments.
    #[serde(
        default,
        alias = "commentOnIncidents",
        skip_serializing_if = "Option::is_none"
    )]
    pub comment_on_incidents: Option<Value>,
}

/// A declarative enrichment job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrichmentJob {
    #[serde(rename = "item-type", default)]
    pub item_type: Option<Value>,
    #[serde(rename = "entity-type", default)]
    pub entity_type: Option<Value>,
    #[serde(default)]
    pub query: Option<Value>,
    #[serde(default)]
    pub additional_params: AdditionalParams,
}

/// Keeps an explicit `null` distinguishable from an absent member.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn object_rules<'de, D>(deserializer: D) -> Result<Vec<SeverityRule>, D::Error>
where
    D: Deserializer<'de>,
{
    Vec::<Value>::deserialize(deserializer)?
        .into_iter()
        .filter(|entry| {
            let keep = entry.is_object();
            if !keep {
                debug!(entry = %entry, "Ignoring non-object severity_change entry");
            }
            keep
        })
        .map(|entry| serde_json::from_value(entry).map_err(D::Error::custom))
        .collect()
}

/// Outcome of validating a job: every rule violation, in evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub reasons: Vec<String>,
}

impl ValidationReport {
    fn rejected(reason: &str) -> Self {
        Self {
            reasons: vec![reason.to_string()],
        }
    }

    /// Returns true if the job passed every rule.
    pub fn is_ok(&self) -> bool {
        self.reasons.is_empty()
    }

    /// Reasons joined the way they are reported in a result envelope.
    pub fn joined(&self) -> String {
        self.reasons.join(",")
    }
}

impl EnrichmentJob {
    /// Parses a job from an arbitrary JSON document.
    pub fn from_value(value: &Value) -> PipelineResult<Self> {
        if value.is_null() {
            return Ok(Self::default());
        }
        if !value.is_object() {
            return Err(PipelineError::Schema(
                "enrichment job must be a JSON object".to_string(),
            ));
        }
        Ok(serde_json::from_value(value.clone())?)
    }

    /// The target entity type, or an empty string when unset or not a string.
    pub fn entity_type(&self) -> &str {
        text(&self.entity_type)
    }

    /// The query template, or an empty string when unset or not a string.
    pub fn query(&self) -> &str {
        text(&self.query)
    }

    /// Checks the job against its structural and severity rules.
    ///
    /// The three structural checks short-circuit with a single reason. The
    /// remaining rules are all evaluated and every violation is reported.
    /// A `results_count_mt` that is not a JSON number makes the whole
    /// document malformed and is returned as an error.
    pub fn validate(&self) -> PipelineResult<ValidationReport> {
        if self.item_type.as_ref().and_then(Value::as_str) != Some(SOAR_TRIGGER) {
            warn!(item_type = ?self.item_type, "Job is not of type SOAR-trigger");
            return Ok(ValidationReport::rejected(MSG_NOT_SOAR_TRIGGER));
        }
        if self.entity_type().is_empty() {
            warn!("Job has no entity type");
            return Ok(ValidationReport::rejected(MSG_ENTITY_TYPE_EMPTY));
        }
        if self.query().is_empty() {
            warn!("Job query is empty");
            return Ok(ValidationReport::rejected(MSG_INVALID_QUERY));
        }

        let mut report = ValidationReport::default();

        for (index, rule) in self.additional_params.severity_change.iter().enumerate() {
            if let Some(count) = &rule.results_count_mt {
                if !is_non_negative_integer(count, index)? {
                    report.reasons.push(MSG_RESULTS_COUNT_NAN.to_string());
                }
                if rule.level().is_none() {
                    report.reasons.push(MSG_SEVERITY_MISSING.to_string());
                }
            }

            if let Some(needle) = &rule.entity_contains {
                if needle.as_str().map_or(true, str::is_empty) {
                    report.reasons.push(MSG_ENTITY_CONTAINS_EMPTY.to_string());
                }
                if rule.level().is_none() {
                    report.reasons.push(MSG_SEVERITY_MISSING.to_string());
                }
            }
        }

        if let Some(flag) = &self.additional_params.comment_on_incidents {
            if !flag.is_boolean() {
                report.reasons.push(MSG_COMMENT_NOT_BOOL.to_string());
            }
        }

        if report.is_ok() {
            debug!(entity_type = self.entity_type(), "Job validated");
        } else {
            warn!(violations = report.reasons.len(), "Job failed validation");
        }

        Ok(report)
    }
}

fn text(value: &Option<Value>) -> &str {
    value.as_ref().and_then(Value::as_str).unwrap_or_default()
}

/// Booleans count as 0 and 1.
fn is_non_negative_integer(value: &Value, index: usize) -> PipelineResult<bool> {
    match value {
        Value::Bool(_) => Ok(true),
        Value::Number(n) => {
            if n.is_u64() {
                Ok(true)
            } else if n.is_i64() {
                Ok(false)
            } else {
                Ok(n.as_f64().map_or(false, |f| f >= 0.0 && f.fract() == 0.0))
            }
        }
        _ => Err(PipelineError::Schema(format!(
            "severity_change[{}].results_count_mt must be numeric",
            index
        ))),
    }
}
