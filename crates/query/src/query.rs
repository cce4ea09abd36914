//! JSON query adapter over the skein fact store.
//!
//! Translates a raw JSON request string into store calls and a JSON
//! response value. Two request kinds exist, discriminated by `queryType`:
//!
//! ```json
//! {"queryType": "retrieve_fact", "subject": "Hypertension", "relation": "treated_by"}
//! {"queryType": "retrieve_fact_reverse", "object": "ACE Inhibitor", "relation": "treated_by"}
//! ```
//!
//! Every outcome is an in-band JSON value, either a `{"response": [...]}`
//! result or an `{"error": ...}` payload. Nothing here is fatal to the
//! caller: undecodable input and bad requests come back as error payloads,
//! and a query that matches nothing is a success with an empty `response`
//! array.

use serde_json::{json, Value as JsonValue};
use skein::FactGraph;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Request-level failures, reported in-band.
///
/// The `Display` strings are the wire-level `error` messages, so adding a
/// variant here is adding to the wire contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Invalid JSON input.")]
    InvalidJson { details: String },
    #[error("For a forward query, 'subject' and 'relation' are required.")]
    MissingForwardFields,
    #[error("For a reverse query, 'object' and 'relation' are required.")]
    MissingReverseFields,
    #[error("Unsupported queryType provided.")]
    UnsupportedQueryType,
}

impl QueryError {
    /// The structured error payload for this failure.
    pub fn to_response(&self) -> JsonValue {
        match self {
            QueryError::InvalidJson { details } => {
                json!({ "error": self.to_string(), "details": details })
            }
            _ => json!({ "error": self.to_string() }),
        }
    }
}

// ---------------------------------------------------------------------------
// Request processing
// ---------------------------------------------------------------------------

/// Process one raw JSON query against the store.
///
/// Never fails at the Rust level; every path returns a JSON value ready
/// to print or send.
pub fn process_query(graph: &FactGraph, raw: &str) -> JsonValue {
    let request: JsonValue = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            return QueryError::InvalidJson {
                details: err.to_string(),
            }
            .to_response()
        }
    };

    match answer(graph, &request) {
        Ok(results) => json!({ "response": results }),
        Err(err) => err.to_response(),
    }
}

/// Dispatch a decoded request to the matching store query.
pub fn answer(graph: &FactGraph, request: &JsonValue) -> Result<Vec<String>, QueryError> {
    match request.get("queryType").and_then(JsonValue::as_str) {
        Some("retrieve_fact") => {
            let subject =
                required_field(request, "subject").ok_or(QueryError::MissingForwardFields)?;
            let relation =
                required_field(request, "relation").ok_or(QueryError::MissingForwardFields)?;
            Ok(owned(graph.objects_of(subject, relation)))
        }
        Some("retrieve_fact_reverse") => {
            let object =
                required_field(request, "object").ok_or(QueryError::MissingReverseFields)?;
            let relation =
                required_field(request, "relation").ok_or(QueryError::MissingReverseFields)?;
            Ok(owned(graph.subjects_of(object, relation)))
        }
        _ => Err(QueryError::UnsupportedQueryType),
    }
}

// An absent field, a non-string, and "" all count as missing.
fn required_field<'a>(request: &'a JsonValue, name: &str) -> Option<&'a str> {
    request
        .get(name)
        .and_then(JsonValue::as_str)
        .filter(|value| !value.is_empty())
}

fn owned(results: Vec<&str>) -> Vec<String> {
    results.into_iter().map(str::to_owned).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_graph() -> FactGraph {
        let mut graph = FactGraph::new();
        graph.add_fact("Hypertension", "treated_by", "ACE Inhibitor");
        graph.add_fact("Hypertension", "treated_by", "Diuretic");
        graph.add_fact("Hypertension", "diagnosed_with", "Sphygmomanometer");
        graph
    }

    #[test]
    fn forward_query_returns_objects_in_order() {
        let graph = sample_graph();
        let out = process_query(
            &graph,
            r#"{"queryType": "retrieve_fact", "subject": "Hypertension", "relation": "treated_by"}"#,
        );
        assert_eq!(out, json!({ "response": ["ACE Inhibitor", "Diuretic"] }));
    }

    #[test]
    fn reverse_query_returns_subjects() {
        let graph = sample_graph();
        let out = process_query(
            &graph,
            r#"{"queryType": "retrieve_fact_reverse", "object": "ACE Inhibitor", "relation": "treated_by"}"#,
        );
        assert_eq!(out, json!({ "response": ["Hypertension"] }));
    }

    #[test]
    fn unknown_node_is_an_empty_response_not_an_error() {
        let graph = sample_graph();
        let out = process_query(
            &graph,
            r#"{"queryType": "retrieve_fact", "subject": "Diabetes", "relation": "treated_by"}"#,
        );
        assert_eq!(out, json!({ "response": [] }));
    }

    #[test]
    fn missing_relation_yields_missing_field_error() {
        let graph = sample_graph();
        let out = process_query(
            &graph,
            r#"{"queryType": "retrieve_fact", "subject": "Hypertension"}"#,
        );
        assert_eq!(
            out["error"],
            "For a forward query, 'subject' and 'relation' are required."
        );
        assert!(out.get("details").is_none());
    }

    #[test]
    fn empty_string_field_counts_as_missing() {
        let graph = sample_graph();
        let out = process_query(
            &graph,
            r#"{"queryType": "retrieve_fact_reverse", "object": "", "relation": "treated_by"}"#,
        );
        assert_eq!(
            out["error"],
            "For a reverse query, 'object' and 'relation' are required."
        );
    }

    #[test]
    fn unknown_query_type_is_rejected() {
        let graph = sample_graph();
        let out = process_query(
            &graph,
            r#"{"queryType": "find_path", "subject": "a", "relation": "b"}"#,
        );
        assert_eq!(out, json!({ "error": "Unsupported queryType provided." }));
    }

    #[test]
    fn missing_query_type_is_rejected() {
        let graph = sample_graph();
        let out = process_query(&graph, r#"{"subject": "a", "relation": "b"}"#);
        assert_eq!(out, json!({ "error": "Unsupported queryType provided." }));
    }

    #[test]
    fn non_object_request_is_rejected_without_panicking() {
        let graph = sample_graph();
        let out = process_query(&graph, r#"["not", "an", "object"]"#);
        assert_eq!(out, json!({ "error": "Unsupported queryType provided." }));
    }

    #[test]
    fn truncated_payload_reports_decoder_details() {
        let graph = sample_graph();
        let out = process_query(&graph, r#"{"queryType": "retrieve_fact", "subj"#);
        assert_eq!(out["error"], "Invalid JSON input.");
        assert!(
            out["details"].as_str().is_some_and(|d| !d.is_empty()),
            "decoder message should be carried in 'details'"
        );
    }
}
