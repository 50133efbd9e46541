//! Exchange format
//!
//! Graphs arrive as a JSON payload of nodes and relationships, the shape a graph database
//! export produces:
//!
//! ```json
//! {
//!   "nodes": [{ "identity": 1, "labels": ["Person"], "properties": { "name": "Ann" } }],
//!   "rels":  [{ "identity": 7, "start": 1, "end": 2, "type": "Has_Phone", "properties": {} }]
//! }
//! ```
//!
//! A document becomes either one directed multigraph of everything, or one undirected layer
//! per relationship type with every node present in every layer.

use crate::algo::MultiplexNetwork;
use crate::config::{EndpointPolicy, GraphConfig, ProfileConfig};
use crate::graph::{
    property_map_from_json, DirectedMultigraph, GraphResult, Label, Node, Relationship,
    RelationshipType, UndirectedMultigraph,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::io::{BufReader, Read};
use std::path::Path;

type JsonObject = serde_json::Map<String, serde_json::Value>;

/// A node as exchanged
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeNode {
    pub identity: i64,
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub properties: JsonObject,
}

impl ExchangeNode {
    pub fn to_node(&self) -> Node {
        Node::with_properties(
            self.identity,
            self.labels.iter().map(Label::new).collect(),
            property_map_from_json(self.properties.clone()),
        )
    }
}

/// A relationship as exchanged; it carries exactly one type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRelationship {
    pub identity: i64,
    pub start: i64,
    pub end: i64,
    #[serde(rename = "type")]
    pub rel_type: String,
    #[serde(default)]
    pub properties: JsonObject,
}

impl ExchangeRelationship {
    pub fn to_relationship(&self) -> Relationship {
        Relationship::new(self.identity, self.start, self.end)
            .with_type(self.rel_type.as_str())
            .with_properties(property_map_from_json(self.properties.clone()))
    }
}

/// A whole exchange payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExchangeDocument {
    #[serde(default)]
    pub nodes: Vec<ExchangeNode>,
    #[serde(default)]
    pub rels: Vec<ExchangeRelationship>,
}

impl ExchangeDocument {
    pub fn from_json_str(text: &str) -> GraphResult<Self> {
        let doc: Self = serde_json::from_str(text)?;
        doc.log_summary();
        Ok(doc)
    }

    pub fn from_reader<R: Read>(reader: R) -> GraphResult<Self> {
        let doc: Self = serde_json::from_reader(reader)?;
        doc.log_summary();
        Ok(doc)
    }

    pub fn from_path(path: impl AsRef<Path>) -> GraphResult<Self> {
        let file = std::fs::File::open(path.as_ref())?;
        tracing::debug!("reading exchange payload from {:?}", path.as_ref());
        Self::from_reader(BufReader::new(file))
    }

    /// Number of nodes carrying each label
    pub fn label_counts(&self) -> BTreeMap<&str, usize> {
        let mut counts = BTreeMap::new();
        for node in &self.nodes {
            for label in &node.labels {
                *counts.entry(label.as_str()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Distinct relationship types, sorted
    pub fn relationship_types(&self) -> Vec<RelationshipType> {
        let mut types: Vec<RelationshipType> =
            self.rels.iter().map(|rel| RelationshipType::new(rel.rel_type.as_str())).collect();
        types.sort();
        types.dedup();
        types
    }

    fn log_summary(&self) {
        tracing::info!(
            nodes = self.nodes.len(),
            relationships = self.rels.len(),
            "loaded exchange payload"
        );
        for (label, count) in self.label_counts() {
            tracing::info!("label {}: {} node(s)", label, count);
        }
        for rel_type in self.relationship_types() {
            tracing::info!("relationship type {}", rel_type);
        }
    }

    /// Every node and relationship in one directed multigraph
    pub fn into_directed(&self, config: &GraphConfig) -> GraphResult<DirectedMultigraph> {
        let mut graph = DirectedMultigraph::with_config(config.clone());
        for node in &self.nodes {
            graph.add_node(node.to_node());
        }
        for rel in &self.rels {
            graph.add_relationship(rel.to_relationship())?;
        }
        Ok(graph)
    }

    /// Endpoint ids that no declared node carries, in ascending order
    pub fn undeclared_endpoints(&self) -> BTreeSet<i64> {
        let declared: BTreeSet<i64> = self.nodes.iter().map(|node| node.identity).collect();
        self.rels
            .iter()
            .flat_map(|rel| [rel.start, rel.end])
            .filter(|id| !declared.contains(id))
            .collect()
    }

    /// One undirected layer per relationship type, each holding every node.
    ///
    /// Under the lenient policy an endpoint without a declared node is added to every
    /// layer as a bare node, so the layers always share one node set.
    pub fn layers_by_type(
        &self,
        config: &GraphConfig,
    ) -> GraphResult<BTreeMap<RelationshipType, UndirectedMultigraph>> {
        let mut layers: BTreeMap<RelationshipType, UndirectedMultigraph> = BTreeMap::new();

        let undeclared = match config.endpoint_policy {
            EndpointPolicy::Lenient => self.undeclared_endpoints(),
            EndpointPolicy::Strict => BTreeSet::new(),
        };
        if !undeclared.is_empty() {
            tracing::warn!(
                "{} relationship endpoint(s) without a node record: {:?}",
                undeclared.len(),
                undeclared
            );
        }

        for rel_type in self.relationship_types() {
            let mut layer = UndirectedMultigraph::with_config(config.clone());
            for node in &self.nodes {
                layer.add_node(node.to_node());
            }
            for &id in &undeclared {
                layer.add_node(Node::new(id));
            }
            layers.insert(rel_type, layer);
        }

        for rel in &self.rels {
            if let Some(layer) = layers.get_mut(&RelationshipType::new(rel.rel_type.as_str())) {
                layer.add_relationship(rel.to_relationship())?;
            }
        }

        Ok(layers)
    }

    /// Weighted multiplex of the selected relationship types (every type when `selected`
    /// is empty), weights taken from `profile`.
    pub fn multiplex(
        &self,
        graph: &GraphConfig,
        profile: &ProfileConfig,
        selected: &[RelationshipType],
    ) -> GraphResult<MultiplexNetwork> {
        let mut network = MultiplexNetwork::new();
        for (rel_type, layer) in self.layers_by_type(graph)? {
            if !selected.is_empty() && !selected.contains(&rel_type) {
                continue;
            }
            let weight = profile.weight_for(&rel_type);
            network.add_layer(rel_type.as_str(), layer, weight);
        }
        Ok(network)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GraphError, NodeId, PropertyValue};

    const PAYLOAD: &str = r#"{
        "nodes": [
            { "identity": 1, "labels": ["Person"], "properties": { "name": "Ann", "age": 41 } },
            { "identity": 2, "labels": ["Person"], "properties": {} },
            { "identity": 3, "labels": ["Phone"], "properties": { "number": "555" } }
        ],
        "rels": [
            { "identity": 10, "start": 1, "end": 3, "type": "Has_Phone", "properties": {} },
            { "identity": 11, "start": 2, "end": 3, "type": "Has_Phone", "properties": {} },
            { "identity": 12, "start": 1, "end": 2, "type": "Knows", "properties": { "since": 2.5 } }
        ]
    }"#;

    #[test]
    fn test_parse_payload() {
        let doc = ExchangeDocument::from_json_str(PAYLOAD).unwrap();

        assert_eq!(doc.nodes.len(), 3);
        assert_eq!(doc.rels[2].rel_type, "Knows");
        assert_eq!(doc.label_counts().get("Person"), Some(&2));
        assert_eq!(
            doc.relationship_types(),
            vec![RelationshipType::new("Has_Phone"), RelationshipType::new("Knows")]
        );
    }

    #[test]
    fn test_properties_are_converted() {
        let doc = ExchangeDocument::from_json_str(PAYLOAD).unwrap();
        let graph = doc.into_directed(&GraphConfig::default()).unwrap();

        let ann = graph.node(NodeId::new(1)).unwrap();
        assert_eq!(ann.get_property("age"), Some(&PropertyValue::Integer(41)));
        assert!(ann.has_label("Person"));

        let knows = &graph.relationships_between(NodeId::new(1), NodeId::new(2))[0];
        assert_eq!(knows.get_property("since"), Some(&PropertyValue::Float(2.5)));
        assert!(knows.has_type("Knows"));
    }

    #[test]
    fn test_layers_hold_every_node() {
        let doc = ExchangeDocument::from_json_str(PAYLOAD).unwrap();
        let layers = doc.layers_by_type(&GraphConfig::default()).unwrap();

        assert_eq!(layers.len(), 2);
        for layer in layers.values() {
            assert_eq!(layer.node_count(), 3);
        }
        assert_eq!(layers[&RelationshipType::new("Has_Phone")].relationship_count(), 2);
        assert_eq!(layers[&RelationshipType::new("Knows")].relationship_count(), 1);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let doc = ExchangeDocument::from_json_str("{}").unwrap();
        assert_eq!(doc, ExchangeDocument::default());
    }

    #[test]
    fn test_strict_rejects_dangling_relationship() {
        let payload = r#"{ "nodes": [{ "identity": 1 }],
                          "rels": [{ "identity": 1, "start": 1, "end": 9, "type": "T" }] }"#;
        let doc = ExchangeDocument::from_json_str(payload).unwrap();

        assert!(doc.into_directed(&GraphConfig::default()).is_ok());
        assert!(matches!(
            doc.into_directed(&GraphConfig::strict()),
            Err(GraphError::MissingEndNode { .. })
        ));
    }

    #[test]
    fn test_bad_json() {
        let err = ExchangeDocument::from_json_str("{ \"nodes\": 3 }").unwrap_err();
        assert!(matches!(err, GraphError::Json(_)));
    }

    #[test]
    fn test_multiplex_selection_and_weights() {
        let doc = ExchangeDocument::from_json_str(PAYLOAD).unwrap();
        let mut profile = ProfileConfig::default();
        profile.layer_weights.insert("Knows".to_string(), -1.0);

        let all = doc.multiplex(&GraphConfig::default(), &profile, &[]).unwrap();
        assert_eq!(all.depth(), 2);
        assert_eq!(all.weights(), vec![1.0, -1.0]);

        let one = doc
            .multiplex(&GraphConfig::default(), &profile, &[RelationshipType::new("Knows")])
            .unwrap();
        assert_eq!(one.depth(), 1);
        assert_eq!(one.layers()[0].name, "Knows");
    }
}
