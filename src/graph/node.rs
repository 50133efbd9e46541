//! Node (entity) implementation

use super::property::{PropertyMap, PropertyValue};
use super::types::{Label, NodeId};
use multigraph_algorithms::GraphNode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An entity of the multigraph
///
/// Labels and properties are opaque payload; the graph only reads the id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Caller-assigned identifier, unique within a graph
    pub id: NodeId,

    /// Labels in the order they were given
    pub labels: Vec<Label>,

    /// Properties associated with this node
    pub properties: PropertyMap,
}

impl Node {
    /// Create a bare node with no labels or properties
    pub fn new(id: impl Into<NodeId>) -> Self {
        Node {
            id: id.into(),
            labels: Vec::new(),
            properties: PropertyMap::new(),
        }
    }

    /// Create a node with labels
    pub fn with_labels<L: Into<Label>>(id: impl Into<NodeId>, labels: impl IntoIterator<Item = L>) -> Self {
        Node {
            id: id.into(),
            labels: labels.into_iter().map(Into::into).collect(),
            properties: PropertyMap::new(),
        }
    }

    /// Create a node with labels and properties
    pub fn with_properties(id: impl Into<NodeId>, labels: Vec<Label>, properties: PropertyMap) -> Self {
        Node {
            id: id.into(),
            labels,
            properties,
        }
    }

    /// Set a property value
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Option<PropertyValue> {
        self.properties.insert(key.into(), value.into())
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Check if node has a specific label
    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l.as_str() == label)
    }

    /// Labels joined the way a Cypher pattern writes them
    pub fn label_string(&self) -> String {
        self.labels.iter().map(Label::as_str).collect::<Vec<_>>().join(":")
    }

    /// Get number of properties
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }
}

/// `<id><labels>`, e.g. `7Person:Employee`
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.id.as_i64(), self.label_string())
    }
}

impl GraphNode for Node {
    fn node_id(&self) -> i64 {
        self.id.as_i64()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node {}

impl std::hash::Hash for Node {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_bare_node() {
        let node = Node::new(1);
        assert_eq!(node.id, NodeId::new(1));
        assert!(node.labels.is_empty());
        assert_eq!(node.property_count(), 0);
    }

    #[test]
    fn test_labels_keep_order() {
        let node = Node::with_labels(2, ["Person", "Employee"]);

        assert_eq!(node.labels, vec![Label::new("Person"), Label::new("Employee")]);
        assert!(node.has_label("Employee"));
        assert!(!node.has_label("Company"));
        assert_eq!(node.to_string(), "2Person:Employee");
    }

    #[test]
    fn test_node_properties() {
        let mut node = Node::new(4);
        node.set_property("name", "Alice");
        node.set_property("age", 30i64);

        assert_eq!(node.get_property("name").unwrap().as_string(), Some("Alice"));
        assert_eq!(node.get_property("age").unwrap().as_integer(), Some(30));
        assert_eq!(node.property_count(), 2);

        let old = node.set_property("age", 31i64);
        assert_eq!(old, Some(PropertyValue::Integer(30)));
    }

    #[test]
    fn test_node_equality_is_by_id() {
        let node1 = Node::with_labels(7, ["Person"]);
        let node2 = Node::with_labels(7, ["Company"]);
        let node3 = Node::with_labels(8, ["Person"]);

        assert_eq!(node1, node2);
        assert_ne!(node1, node3);
        assert_eq!(node1.node_id(), 7);
    }
}
