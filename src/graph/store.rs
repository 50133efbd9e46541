//! In-memory record storage shared by both multigraph kinds
//!
//! Holds the node and relationship records, keyed by id in insertion order, next to the
//! adjacency that indexes them. Only direction differs between the directed and the
//! undirected graph, and that lives entirely in [`MultiAdjacency`].

use super::adjacency::MultiAdjacency;
use super::error::{GraphError, GraphResult};
use super::node::Node;
use super::relationship::Relationship;
use super::types::{NodeId, RelationshipId};
use crate::config::{EndpointPolicy, GraphConfig};
use indexmap::{IndexMap, IndexSet};

#[derive(Debug, Clone)]
pub(crate) struct GraphStore {
    nodes: IndexMap<NodeId, Node>,
    relationships: IndexMap<RelationshipId, Relationship>,
    adjacency: MultiAdjacency,
    config: GraphConfig,
}

impl GraphStore {
    pub(crate) fn new(adjacency: MultiAdjacency, config: GraphConfig) -> Self {
        GraphStore {
            nodes: IndexMap::new(),
            relationships: IndexMap::new(),
            adjacency,
            config,
        }
    }

    pub(crate) fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Insert or overwrite a node. Incident relationships are left alone.
    pub(crate) fn add_node(&mut self, node: Node) {
        self.adjacency.add_node(node.id);
        self.nodes.insert(node.id, node);
    }

    pub(crate) fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub(crate) fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub(crate) fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Ids of every stored node plus any dangling endpoint known to the adjacency
    pub(crate) fn node_ids(&self) -> Vec<NodeId> {
        self.adjacency.node_ids()
    }

    /// Remove a node after every relationship that touches it
    pub(crate) fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        if !self.nodes.contains_key(&id) && !self.adjacency.contains_node(id) {
            return None;
        }

        let mut incident: IndexSet<RelationshipId> = IndexSet::new();
        for successor in self.adjacency.from(id) {
            incident.extend(self.adjacency.lines(id, successor));
        }
        for predecessor in self.adjacency.to(id) {
            incident.extend(self.adjacency.lines(predecessor, id));
        }

        tracing::debug!(
            "removing {} with {} incident relationship(s)",
            id,
            incident.len()
        );
        for rel_id in incident {
            self.remove_relationship(rel_id);
        }

        self.adjacency.remove_node(id);
        self.nodes.shift_remove(&id)
    }

    /// Node records for a list of adjacency ids; dangling ids become bare nodes
    pub(crate) fn resolve(&self, ids: Vec<NodeId>) -> Vec<Node> {
        ids.into_iter()
            .map(|id| self.nodes.get(&id).cloned().unwrap_or_else(|| Node::new(id)))
            .collect()
    }

    pub(crate) fn from(&self, id: NodeId) -> Vec<Node> {
        self.resolve(self.adjacency.from(id))
    }

    pub(crate) fn to(&self, id: NodeId) -> Vec<Node> {
        self.resolve(self.adjacency.to(id))
    }

    /// Insert or overwrite a relationship and register its adjacency edge
    pub(crate) fn add_relationship(&mut self, rel: Relationship) -> GraphResult<()> {
        self.check_endpoints(&rel)?;

        if let Some(old) = self.relationships.get(&rel.id) {
            let (start, end, id) = (old.start, old.end, old.id);
            self.adjacency.remove_line(start, end, id);
            self.prune_dangling(start);
            self.prune_dangling(end);
        }

        self.adjacency.set_line(rel.start, rel.end, rel.id);
        self.relationships.insert(rel.id, rel);
        Ok(())
    }

    fn check_endpoints(&self, rel: &Relationship) -> GraphResult<()> {
        let start_missing = !self.nodes.contains_key(&rel.start);
        let end_missing = !self.nodes.contains_key(&rel.end);

        match self.config.endpoint_policy {
            EndpointPolicy::Strict if start_missing => Err(GraphError::MissingStartNode {
                relationship: rel.id,
                node: rel.start,
            }),
            EndpointPolicy::Strict if end_missing => Err(GraphError::MissingEndNode {
                relationship: rel.id,
                node: rel.end,
            }),
            EndpointPolicy::Lenient if start_missing || end_missing => {
                tracing::warn!(
                    "{} admitted with dangling endpoint ({} -> {})",
                    rel.id,
                    rel.start,
                    rel.end
                );
                Ok(())
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn relationship(&self, id: RelationshipId) -> Option<&Relationship> {
        self.relationships.get(&id)
    }

    /// Relationships registered from `u` to `v`; both directions when undirected
    pub(crate) fn relationships_between(&self, u: NodeId, v: NodeId) -> Vec<&Relationship> {
        self.adjacency
            .lines(u, v)
            .into_iter()
            .filter_map(|id| self.relationships.get(&id))
            .collect()
    }

    pub(crate) fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.relationships.values()
    }

    pub(crate) fn relationship_count(&self) -> usize {
        self.relationships.len()
    }

    pub(crate) fn contains_relationship(&self, id: RelationshipId) -> bool {
        self.relationships.contains_key(&id)
    }

    pub(crate) fn remove_relationship(&mut self, id: RelationshipId) -> Option<Relationship> {
        let rel = self.relationships.shift_remove(&id)?;
        self.adjacency.remove_line(rel.start, rel.end, rel.id);
        self.prune_dangling(rel.start);
        self.prune_dangling(rel.end);
        Some(rel)
    }

    /// Forget an endpoint without a node record once no line reaches it
    fn prune_dangling(&mut self, id: NodeId) {
        if !self.nodes.contains_key(&id)
            && self.adjacency.from(id).is_empty()
            && self.adjacency.to(id).is_empty()
        {
            self.adjacency.remove_node(id);
        }
    }

    /// Same records over a fresh adjacency
    pub(crate) fn rebuild(&self, adjacency: MultiAdjacency) -> Self {
        let mut store = GraphStore {
            nodes: self.nodes.clone(),
            relationships: self.relationships.clone(),
            adjacency,
            config: self.config.clone(),
        };
        for id in self.adjacency.node_ids() {
            store.adjacency.add_node(id);
        }
        for rel in self.relationships.values() {
            store.adjacency.set_line(rel.start, rel.end, rel.id);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directed() -> GraphStore {
        GraphStore::new(MultiAdjacency::directed(), GraphConfig::default())
    }

    #[test]
    fn test_overwrite_moves_adjacency() {
        let mut store = directed();
        store.add_node(Node::new(1));
        store.add_node(Node::new(2));
        store.add_node(Node::new(3));

        store.add_relationship(Relationship::new(7, 1, 2)).unwrap();
        store.add_relationship(Relationship::new(7, 1, 3)).unwrap();

        assert!(store.relationships_between(NodeId::new(1), NodeId::new(2)).is_empty());
        assert_eq!(store.relationships_between(NodeId::new(1), NodeId::new(3)).len(), 1);
        assert_eq!(store.relationship_count(), 1);
    }

    #[test]
    fn test_overwrite_forgets_old_dangling_endpoint() {
        let mut store = directed();
        store.add_node(Node::new(1));
        store.add_node(Node::new(2));

        store.add_relationship(Relationship::new(7, 1, 9)).unwrap();
        assert_eq!(store.node_ids(), vec![NodeId::new(1), NodeId::new(2), NodeId::new(9)]);

        store.add_relationship(Relationship::new(7, 1, 2)).unwrap();
        assert_eq!(store.node_ids(), vec![NodeId::new(1), NodeId::new(2)]);
        assert!(store.to(NodeId::new(9)).is_empty());
    }

    #[test]
    fn test_node_overwrite_keeps_relationships() {
        let mut store = directed();
        store.add_node(Node::new(1));
        store.add_node(Node::new(2));
        store.add_relationship(Relationship::new(1, 1, 2)).unwrap();

        store.add_node(Node::with_labels(1, ["Person"]));

        assert!(store.node(NodeId::new(1)).unwrap().has_label("Person"));
        assert_eq!(store.relationships_between(NodeId::new(1), NodeId::new(2)).len(), 1);
    }

    #[test]
    fn test_dangling_endpoint_resolves_to_bare_node() {
        let mut store = directed();
        store.add_node(Node::with_labels(1, ["Person"]));
        store.add_relationship(Relationship::new(1, 1, 9)).unwrap();

        let successors = store.from(NodeId::new(1));
        assert_eq!(successors.len(), 1);
        assert_eq!(successors[0].id, NodeId::new(9));
        assert!(successors[0].labels.is_empty());
        assert_eq!(store.node_ids(), vec![NodeId::new(1), NodeId::new(9)]);

        store.remove_relationship(RelationshipId::new(1));
        assert_eq!(store.node_ids(), vec![NodeId::new(1)]);
    }

    #[test]
    fn test_strict_rejects_without_inserting() {
        let mut store = GraphStore::new(MultiAdjacency::directed(), GraphConfig::strict());
        store.add_node(Node::new(1));

        let err = store.add_relationship(Relationship::new(4, 1, 2)).unwrap_err();
        assert!(matches!(err, GraphError::MissingEndNode { node, .. } if node == NodeId::new(2)));
        assert_eq!(store.relationship_count(), 0);
        assert!(store.from(NodeId::new(1)).is_empty());
    }

    #[test]
    fn test_rebuild_undirected() {
        let mut store = directed();
        store.add_node(Node::new(1));
        store.add_node(Node::new(2));
        store.add_relationship(Relationship::new(5, 1, 2)).unwrap();

        let undirected = store.rebuild(MultiAdjacency::undirected());

        assert_eq!(undirected.relationships_between(NodeId::new(2), NodeId::new(1)).len(), 1);
        assert_eq!(undirected.to(NodeId::new(1)), undirected.from(NodeId::new(1)));
        assert_eq!(undirected.relationship(RelationshipId::new(5)).unwrap().start, NodeId::new(1));
    }
}
