//! Incident entity extraction and normalization.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::error::{PipelineError, PipelineResult};

/// Entity kind whose value may be rewritten to a user principal name.
const ACCOUNT_KIND: &str = "Account";

/// An entity as it appears in a Sentinel incident's `relatedEntities`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentEntity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub properties: Map<String, Value>,
}

impl IncidentEntity {
    /// Returns a property rendered as text, or `None` when absent or null.
    pub fn property(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::Null => None,
            Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    fn non_empty_property(&self, key: &str) -> Option<String> {
        self.property(key).filter(|v| !v.is_empty())
    }

    fn require_kind(&self, index: usize) -> PipelineResult<&str> {
        self.kind
            .as_deref()
            .ok_or(PipelineError::MissingField {
                index,
                field: "kind",
            })
    }

    /// Builds `accountName@upnSuffix` for account entities that carry both parts.
    pub fn user_principal_name(&self) -> Option<String> {
        if self.kind.as_deref() != Some(ACCOUNT_KIND) {
            return None;
        }
        let suffix = self.non_empty_property("upnSuffix")?;
        let account = self.non_empty_property("accountName")?;
        Some(format!("{}@{}", account, suffix))
    }
}

/// An entity reduced to its kind and the value substituted into queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEntity {
    pub kind: String,
    pub entity_value: String,
}

/// Reads `object.properties.relatedEntities` from an incident.
///
/// Absent or null path segments yield an empty list. A `relatedEntities`
/// member that is not a list of objects is a schema error.
pub fn extract_entities(incident: &Value) -> PipelineResult<Vec<IncidentEntity>> {
    let related = incident
        .get("object")
        .and_then(|object| object.get("properties"))
        .and_then(|properties| properties.get("relatedEntities"));

    match related {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                if !item.is_object() {
                    return Err(PipelineError::Schema(format!(
                        "relatedEntities[{}] is not an object",
                        index
                    )));
                }
                Ok(serde_json::from_value::<IncidentEntity>(item.clone())?)
            })
            .collect(),
        Some(_) => Err(PipelineError::Schema(
            "relatedEntities is not a list".to_string(),
        )),
    }
}

/// Derives the substitution value of every entity, preserving order.
///
/// With `match_upn` set, accounts carrying both `accountName` and `upnSuffix`
/// become `accountName@upnSuffix`; everything else uses `friendlyName`.
pub fn normalize_entities(
    entities: &[IncidentEntity],
    match_upn: bool,
) -> PipelineResult<Vec<NormalizedEntity>> {
    entities
        .iter()
        .enumerate()
        .map(|(index, entity)| {
            let kind = entity.require_kind(index)?.to_string();
            let entity_value = match_upn
                .then(|| entity.user_principal_name())
                .flatten()
                .or_else(|| entity.property("friendlyName"))
                .unwrap_or_default();
            Ok(NormalizedEntity { kind, entity_value })
        })
        .collect()
}

/// Lowercased entity kinds present in the incident.
pub fn distinct_entity_types(entities: &[IncidentEntity]) -> PipelineResult<BTreeSet<String>> {
    entities
        .iter()
        .enumerate()
        .map(|(index, entity)| Ok(entity.require_kind(index)?.to_lowercase()))
        .collect()
}

/// `friendlyName:kind` labels, one per entity.
pub fn friendly_entity_types(entities: &[IncidentEntity]) -> PipelineResult<Vec<String>> {
    entities
        .iter()
        .enumerate()
        .map(|(index, entity)| {
            let kind = entity.require_kind(index)?;
            let friendly_name =
                entity
                    .property("friendlyName")
                    .ok_or(PipelineError::MissingField {
                        index,
                        field: "friendlyName",
                    })?;
            Ok(format!("{}:{}", friendly_name, kind.to_lowercase()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn incident(entities: Value) -> Value {
        json!({ "object": { "properties": { "relatedEntities": entities } } })
    }

    fn account(name: &str, suffix: Option<&str>) -> Value {
        let mut properties = json!({
            "accountName": name,
            "friendlyName": name,
        });
        if let Some(suffix) = suffix {
            properties["upnSuffix"] = json!(suffix);
        }
        json!({ "kind": "Account", "properties": properties })
    }

    #[test]
    fn test_extract_missing_path_is_empty() {
        assert!(extract_entities(&json!({})).unwrap().is_empty());
        assert!(extract_entities(&json!({ "object": {} })).unwrap().is_empty());
        assert!(extract_entities(&json!({ "object": { "properties": null } }))
            .unwrap()
            .is_empty());
        assert!(extract_entities(&json!("not an incident")).unwrap().is_empty());
    }

    #[test]
    fn test_extract_reads_related_entities() {
        let doc = incident(json!([
            account("alice", Some("example.com")),
            { "kind": "Url", "properties": { "friendlyName": "https://evil.test" } }
        ]));
        let entities = extract_entities(&doc).unwrap();
        assert_eq!(entities.len(), 2);
        assert_eq!(entities[1].kind.as_deref(), Some("Url"));
    }

    #[test]
    fn test_extract_rejects_non_list() {
        let err = extract_entities(&incident(json!({ "kind": "Url" }))).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));

        let err = extract_entities(&incident(json!(["Url"]))).unwrap_err();
        assert!(matches!(err, PipelineError::Schema(_)));
    }

    #[test]
    fn test_normalize_builds_upn() {
        let entities = extract_entities(&incident(json!([account(
            "alice",
            Some("example.com")
        )])))
        .unwrap();
        let normalized = normalize_entities(&entities, true).unwrap();
        assert_eq!(
            normalized,
            vec![NormalizedEntity {
                kind: "Account".to_string(),
                entity_value: "alice@example.com".to_string(),
            }]
        );
    }

    #[test]
    fn test_normalize_falls_back_to_friendly_name() {
        let entities = extract_entities(&incident(json!([
            account("bob", None),
            { "kind": "Account", "properties": { "accountName": "", "upnSuffix": "corp.com", "friendlyName": "carol" } },
            { "kind": "Ip", "properties": {} }
        ])))
        .unwrap();
        let values: Vec<_> = normalize_entities(&entities, true)
            .unwrap()
            .into_iter()
            .map(|e| e.entity_value)
            .collect();
        assert_eq!(values, vec!["bob", "carol", ""]);
    }

    #[test]
    fn test_normalize_upn_only_for_account_kind() {
        let entities = extract_entities(&incident(json!([
            { "kind": "account", "properties": { "accountName": "dave", "upnSuffix": "corp.com", "friendlyName": "dave" } }
        ])))
        .unwrap();
        assert_eq!(
            normalize_entities(&entities, true).unwrap()[0].entity_value,
            "dave"
        );
    }

    #[test]
    fn test_normalize_without_upn_matching() {
        let entities =
            extract_entities(&incident(json!([account("alice", Some("example.com"))]))).unwrap();
        assert_eq!(
            normalize_entities(&entities, false).unwrap()[0].entity_value,
            "alice"
        );
    }

    #[test]
    fn test_distinct_types_are_lowercased_and_deduplicated() {
        let entities = extract_entities(&incident(json!([
            account("alice", None),
            account("bob", None),
            { "kind": "Url", "properties": { "friendlyName": "u" } }
        ])))
        .unwrap();
        let distinct = distinct_entity_types(&entities).unwrap();
        assert_eq!(
            distinct.into_iter().collect::<Vec<_>>(),
            vec!["account".to_string(), "url".to_string()]
        );
    }

    #[test]
    fn test_friendly_labels() {
        let entities = extract_entities(&incident(json!([
            account("alice", Some("example.com")),
            { "kind": "Url", "properties": { "friendlyName": "https://evil.test" } }
        ])))
        .unwrap();
        assert_eq!(
            friendly_entity_types(&entities).unwrap(),
            vec!["alice:account", "https://evil.test:url"]
        );
    }

    #[test]
    fn test_friendly_labels_require_friendly_name() {
        let entities =
            extract_entities(&incident(json!([{ "kind": "Ip", "properties": {} }]))).unwrap();
        assert_eq!(
            friendly_entity_types(&entities).unwrap_err(),
            PipelineError::MissingField {
                index: 0,
                field: "friendlyName"
            }
        );
    }

    #[test]
    fn test_missing_kind_is_reported() {
        let entities = extract_entities(&incident(json!([
            { "properties": { "friendlyName": "x" } }
        ])))
        .unwrap();
        assert!(matches!(
            normalize_entities(&entities, true),
            Err(PipelineError::MissingField { field: "kind", .. })
        ));
        assert!(distinct_entity_types(&entities).is_err());
    }
}
