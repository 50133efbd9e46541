//! Undirected multigraph
//!
//! Relationship records keep the start and end they were given, but adjacency is
//! symmetric: a relationship is reachable from both of its endpoints.

use super::adjacency::MultiAdjacency;
use super::error::GraphResult;
use super::node::Node;
use super::relationship::Relationship;
use super::store::GraphStore;
use super::types::{NodeId, RelationshipId};
use crate::config::GraphConfig;

/// An undirected multigraph of [`Node`]s and [`Relationship`]s
#[derive(Debug, Clone)]
pub struct UndirectedMultigraph {
    store: GraphStore,
}

impl UndirectedMultigraph {
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        UndirectedMultigraph {
            store: GraphStore::new(MultiAdjacency::undirected(), config),
        }
    }

    pub(crate) fn from_store(store: GraphStore) -> Self {
        UndirectedMultigraph { store }
    }

    pub fn config(&self) -> &GraphConfig {
        self.store.config()
    }

    pub fn add_node(&mut self, node: Node) {
        self.store.add_node(node);
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.store.node(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.store.nodes()
    }

    pub fn node_count(&self) -> usize {
        self.store.node_count()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.store.contains_node(id)
    }

    /// Remove a node together with every relationship touching it, whichever end it is.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        self.store.remove_node(id)
    }

    /// Neighbours of a node
    pub fn from(&self, id: NodeId) -> Vec<Node> {
        self.store.from(id)
    }

    /// Neighbours of a node; identical to [`from`](Self::from)
    pub fn to(&self, id: NodeId) -> Vec<Node> {
        self.store.to(id)
    }

    pub fn add_relationship(&mut self, rel: Relationship) -> GraphResult<()> {
        self.store.add_relationship(rel)
    }

    pub fn relationship(&self, id: RelationshipId) -> Option<&Relationship> {
        self.store.relationship(id)
    }

    /// Relationships joining `u` and `v`, in either stored direction
    pub fn relationships_between(&self, u: NodeId, v: NodeId) -> Vec<&Relationship> {
        self.store.relationships_between(u, v)
    }

    pub fn relationships(&self) -> impl Iterator<Item = &Relationship> {
        self.store.relationships()
    }

    pub fn relationship_count(&self) -> usize {
        self.store.relationship_count()
    }

    pub fn contains_relationship(&self, id: RelationshipId) -> bool {
        self.store.contains_relationship(id)
    }

    pub fn remove_relationship(&mut self, id: RelationshipId) -> Option<Relationship> {
        self.store.remove_relationship(id)
    }

    /// Connected components, each ordered by id, the components ordered by their ids
    pub fn connected_components(&self) -> Vec<Vec<Node>> {
        let view = crate::algo::build_view(self);
        multigraph_algorithms::connected_components(&view)
            .into_iter()
            .map(|ids| self.store.resolve(ids.into_iter().map(NodeId::new).collect()))
            .collect()
    }

    pub(crate) fn node_ids(&self) -> Vec<NodeId> {
        self.store.node_ids()
    }
}

impl Default for UndirectedMultigraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(id: i64) -> NodeId {
        NodeId::new(id)
    }

    #[test]
    fn test_traversal_is_symmetric() {
        let mut graph = UndirectedMultigraph::new();
        graph.add_node(Node::new(1));
        graph.add_node(Node::new(2));
        graph.add_relationship(Relationship::new(5, 1, 2).with_type("Knows")).unwrap();

        assert_eq!(graph.from(n(2)), vec![Node::new(1)]);
        assert_eq!(graph.from(n(1)), graph.to(n(1)));

        let back = graph.relationships_between(n(2), n(1));
        assert_eq!(back.len(), 1);
        assert_eq!((back[0].start, back[0].end), (n(1), n(2)));
    }

    #[test]
    fn test_remove_node_only_seen_as_end() {
        let mut graph = UndirectedMultigraph::new();
        for id in 1..=3 {
            graph.add_node(Node::new(id));
        }
        graph.add_relationship(Relationship::new(10, 1, 3)).unwrap();
        graph.add_relationship(Relationship::new(11, 2, 3)).unwrap();
        graph.add_relationship(Relationship::new(12, 1, 2)).unwrap();

        graph.remove_node(n(3));

        assert_eq!(graph.relationship_count(), 1);
        assert!(graph.relationships().all(|rel| !rel.touches(n(3))));
        assert!(graph.relationships_between(n(1), n(3)).is_empty());
        assert_eq!(graph.from(n(1)), vec![Node::new(2)]);
    }

    #[test]
    fn test_connected_components() {
        let mut graph = UndirectedMultigraph::new();
        for id in [4, 1, 2, 3, 5] {
            graph.add_node(Node::new(id));
        }
        graph.add_relationship(Relationship::new(1, 2, 1)).unwrap();
        graph.add_relationship(Relationship::new(2, 4, 5)).unwrap();

        let components: Vec<Vec<i64>> = graph
            .connected_components()
            .iter()
            .map(|c| c.iter().map(|node| node.id.as_i64()).collect())
            .collect();

        assert_eq!(components, vec![vec![1, 2], vec![3], vec![4, 5]]);
    }

    #[test]
    fn test_self_loop_removed_by_cascade() {
        let mut graph = UndirectedMultigraph::new();
        graph.add_node(Node::new(1));
        graph.add_relationship(Relationship::new(1, 1, 1)).unwrap();

        assert_eq!(graph.from(n(1)), vec![Node::new(1)]);
        graph.remove_node(n(1));
        assert_eq!(graph.relationship_count(), 0);
        assert_eq!(graph.node_count(), 0);
    }
}
