//! Network description: variables, their opaque payloads, and directed edges.
//!
//! The layout matches the JSON produced by the network editor:
//!
//! ```json
//! {
//!   "nodes": [{"id": 0, "name": "Rain", "fields": [{"name": "yes", "value": 0.2}]}],
//!   "edges": [{"id": "edge-1", "from": 0, "to": 1}]
//! }
//! ```
//!
//! Field payloads (priors and conditional-probability rows) are carried
//! through the pipeline untouched; no stage reads them.

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::error::JunctionError;

/// Variable identifier. Assumed equal to the variable's list position by
/// consumers of the result, but the pipeline only requires uniqueness.
pub type VarId = u32;

/// A complete network description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkDescription {
    #[serde(default)]
    pub nodes: Vec<Variable>,
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

/// A random variable in the network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub id: VarId,
    #[serde(default)]
    pub name: String,
    /// Editor canvas position; irrelevant to the pipeline.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    #[serde(default)]
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One state of a variable.
///
/// Root variables carry a prior in `value`; children carry one
/// [`ConditionalEntry`] per parent-state combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default)]
    pub conditional_probabilities: Vec<ConditionalEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalEntry {
    pub value: f64,
    /// Parent state names, in parent order.
    pub parent_combination: Vec<String>,
}

/// Directed dependency `from -> to`: `to` is a child of `from`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub from: VarId,
    pub to: VarId,
}

impl EdgeSpec {
    #[must_use]
    pub const fn new(from: VarId, to: VarId) -> Self {
        Self { id: None, from, to }
    }
}

impl Variable {
    /// A variable with no fields, named after its id.
    #[must_use]
    pub fn bare(id: VarId) -> Self {
        Self {
            id,
            name: format!("Node {id}"),
            position: None,
            fields: Vec::new(),
        }
    }
}

impl NetworkDescription {
    /// Build a payload-free description from ids and `(from, to)` pairs.
    #[must_use]
    pub fn from_edges(ids: impl IntoIterator<Item = VarId>, edges: &[(VarId, VarId)]) -> Self {
        Self {
            nodes: ids.into_iter().map(Variable::bare).collect(),
            edges: edges
                .iter()
                .map(|&(from, to)| EdgeSpec::new(from, to))
                .collect(),
        }
    }

    /// Parse a description from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`JunctionError::Parse`] if the document is not valid JSON or
    /// does not have the expected shape.
    pub fn from_json_str(json: &str) -> Result<Self, JunctionError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a description from a reader.
    ///
    /// # Errors
    ///
    /// Returns [`JunctionError::Parse`] on I/O or decoding failure.
    pub fn from_reader(reader: impl Read) -> Result<Self, JunctionError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EDITOR_JSON: &str = r#"{
        "nodes": [
            {"id": 0, "name": "Rain", "position": {"x": 100, "y": 100},
             "fields": [{"name": "yes", "value": 0.2, "conditionalProbabilities": []},
                        {"name": "no", "value": 0.8, "conditionalProbabilities": []}]},
            {"id": 1, "name": "Wet", "position": {"x": 200, "y": 100},
             "fields": [{"name": "yes", "conditionalProbabilities": [
                 {"parentCombination": ["yes"], "value": 0.9},
                 {"parentCombination": ["no"], "value": 0.1}]}]}
        ],
        "edges": [{"id": "edge-1", "from": 0, "to": 1}]
    }"#;

    #[test]
    fn parses_editor_layout() {
        let net = NetworkDescription::from_json_str(EDITOR_JSON).expect("parse");
        assert_eq!(net.nodes.len(), 2);
        assert_eq!(net.edges, vec![EdgeSpec {
            id: Some("edge-1".to_string()),
            from: 0,
            to: 1
        }]);

        let wet = &net.nodes[1];
        assert_eq!(wet.name, "Wet");
        assert_eq!(wet.fields[0].value, None);
        assert_eq!(wet.fields[0].conditional_probabilities.len(), 2);
        assert_eq!(
            wet.fields[0].conditional_probabilities[0].parent_combination,
            vec!["yes".to_string()]
        );
    }

    #[test]
    fn missing_sections_default_to_empty() {
        let net = NetworkDescription::from_json_str("{}").expect("parse");
        assert!(net.nodes.is_empty());
        assert!(net.edges.is_empty());
    }

    #[test]
    fn edge_without_endpoint_is_rejected() {
        let err = NetworkDescription::from_json_str(r#"{"nodes": [], "edges": [{"from": 1}]}"#)
            .expect_err("missing `to`");
        assert!(matches!(err, JunctionError::Parse(_)));
    }

    #[test]
    fn from_edges_builds_bare_variables() {
        let net = NetworkDescription::from_edges([1, 2], &[(1, 2)]);
        assert_eq!(net.nodes[0].name, "Node 1");
        assert!(net.nodes[1].fields.is_empty());
        assert_eq!(net.edges[0], EdgeSpec::new(1, 2));
    }
}
