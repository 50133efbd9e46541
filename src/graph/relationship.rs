//! Relationship (edge) implementation
//!
//! Relationships are directed by construction. Several may join the same ordered pair of
//! nodes; only the id tells them apart.

use super::property::{PropertyMap, PropertyValue};
use super::types::{NodeId, RelationshipId, RelationshipType};
use multigraph_algorithms::GraphLine;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A directed relationship between two nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    /// Caller-assigned identifier, unique within a graph
    pub id: RelationshipId,

    /// Node the relationship starts at
    pub start: NodeId,

    /// Node the relationship ends at
    pub end: NodeId,

    /// Relationship types in the order they were given
    pub types: Vec<RelationshipType>,

    /// Properties associated with this relationship
    pub properties: PropertyMap,
}

impl Relationship {
    /// Create an untyped relationship from `start` to `end`
    pub fn new(id: impl Into<RelationshipId>, start: impl Into<NodeId>, end: impl Into<NodeId>) -> Self {
        Relationship {
            id: id.into(),
            start: start.into(),
            end: end.into(),
            types: Vec::new(),
            properties: PropertyMap::new(),
        }
    }

    /// Append a type
    pub fn with_type(mut self, rel_type: impl Into<RelationshipType>) -> Self {
        self.types.push(rel_type.into());
        self
    }

    /// Replace the properties
    pub fn with_properties(mut self, properties: PropertyMap) -> Self {
        self.properties = properties;
        self
    }

    /// Set a property value
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Option<PropertyValue> {
        self.properties.insert(key.into(), value.into())
    }

    /// Get a property value
    pub fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    /// Check if relationship has a specific type
    pub fn has_type(&self, rel_type: &str) -> bool {
        self.types.iter().any(|t| t.as_str() == rel_type)
    }

    /// Check if this relationship touches a node at either end
    pub fn touches(&self, node: NodeId) -> bool {
        self.start == node || self.end == node
    }

    /// Same relationship seen from its other end: endpoints swapped, id kept.
    pub fn reversed(&self) -> Self {
        Relationship {
            id: self.id,
            start: self.end,
            end: self.start,
            types: self.types.clone(),
            properties: self.properties.clone(),
        }
    }

    /// Endpoints swapped and id negated, so the reversal can live next to the original
    /// in a structure keyed by line id.
    pub fn reversed_line(&self) -> Self {
        Relationship {
            id: RelationshipId::new(-self.id.as_i64()),
            ..self.reversed()
        }
    }

    /// Types joined the way a Cypher pattern writes them
    pub fn type_string(&self) -> String {
        self.types.iter().map(RelationshipType::as_str).collect::<Vec<_>>().join(":")
    }
}

impl fmt::Display for Relationship {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.type_string())
    }
}

impl GraphLine for Relationship {
    fn line_id(&self) -> i64 {
        self.id.as_i64()
    }

    fn from_id(&self) -> i64 {
        self.start.as_i64()
    }

    fn to_id(&self) -> i64 {
        self.end.as_i64()
    }

    fn reversed(&self) -> Self {
        Relationship::reversed(self)
    }
}

impl PartialEq for Relationship {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Relationship {}

impl std::hash::Hash for Relationship {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_relationship() {
        let rel = Relationship::new(1, 1, 2).with_type("KNOWS");

        assert_eq!(rel.id, RelationshipId::new(1));
        assert_eq!(rel.start, NodeId::new(1));
        assert_eq!(rel.end, NodeId::new(2));
        assert!(rel.has_type("KNOWS"));
        assert_eq!(rel.to_string(), "KNOWS");
    }

    #[test]
    fn test_reversal_keeps_id() {
        let mut rel = Relationship::new(5, 10, 20).with_type("FOLLOWS");
        rel.set_property("since", 2020i64);

        let back = rel.reversed();
        assert_eq!(back.id, rel.id);
        assert_eq!(back.start, NodeId::new(20));
        assert_eq!(back.end, NodeId::new(10));
        assert_eq!(back.get_property("since"), rel.get_property("since"));
        assert_eq!(back.types, rel.types);
    }

    #[test]
    fn test_line_reversal_negates_id() {
        let rel = Relationship::new(5, 10, 20);
        let line = rel.reversed_line();

        assert_eq!(line.id, RelationshipId::new(-5));
        assert_eq!(line.start, NodeId::new(20));
        assert_eq!(line.end, NodeId::new(10));
    }

    #[test]
    fn test_graph_line_capability() {
        let rel = Relationship::new(3, 1, 2);
        let back = GraphLine::reversed(&rel);

        assert_eq!(rel.line_id(), 3);
        assert_eq!((rel.from_id(), rel.to_id()), (1, 2));
        assert_eq!((back.from_id(), back.to_id()), (2, 1));
    }

    #[test]
    fn test_multiple_relationships_between_nodes() {
        let rel1 = Relationship::new(1, 100, 200).with_type("KNOWS");
        let rel2 = Relationship::new(2, 100, 200).with_type("KNOWS");

        assert_ne!(rel1, rel2);
        assert!(rel1.touches(NodeId::new(200)));
        assert!(!rel1.touches(NodeId::new(300)));
    }

    #[test]
    fn test_multiple_types_display() {
        let rel = Relationship::new(1, 1, 2).with_type("A").with_type("B");
        assert_eq!(rel.to_string(), "A:B");
    }
}
