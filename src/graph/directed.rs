//! Directed multigraph
//!
//! Several relationships may join the same ordered pair of nodes. Removing a node first
//! removes every relationship that starts or ends at it, so no relationship record is ever
//! left pointing at a node the graph has dropped.

use super::adjacency::MultiAdjacency;
use super::error::{GraphError, GraphResult};
use super::node::Node;
use super::relationship::Relationship;
use super::store::GraphStore;
use super::types::{NodeId, RelationshipId};
use super::undirected::UndirectedMultigraph;
use crate::config::GraphConfig;
use multigraph_algorithms::AlgoError;

/// A directed multigraph of [`Node`]s and [`Relationship`]s
#[derive(Debug, Clone)]
pub struct DirectedMultigraph {
    store: GraphStore,
}

impl DirectedMultigraph {
    /// Create an empty graph with the default (lenient) configuration
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        DirectedMultigraph {
            store: GraphStore::new(MultiAdjacency::directed(), config),
        }
    }

    pub fn config(&self) -> &GraphConfig {
        self.store.config()
    }

    /// Insert a node, replacing any node with the same id
    pub fn add_node(&mut self, node: Node) {
        self.store.add_node(node);
    }

    /// The node with this id, if stored
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.store.node(id)
    }

    /// All stored nodes, in insertion order
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.store.nodes()
    }

    pub fn node_count(&self) -> usize {
        self.store.node_count()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.store.contains_node(id)
    }

    /// Remove a node together with every relationship starting or ending at it.
    ///
    /// Returns the removed node, or `None` (and changes nothing) if it was not stored.
    pub fn remove_node(&mut self, id: NodeId) -> Option<Node> {
        self.store.remove_node(id)
    }

    /// Direct successors of a node
    pub fn from(&self, id: NodeId) -> Vec<Node> {
        self.store.from(id)
    }

    /// Direct predecessors of a node
    pub fn to(&self, id: NodeId) -> Vec<Node> {
        self.store.to(id)
    }

    /// Insert a relationship, replacing any relationship with the same id.
    ///
    /// Under [`EndpointPolicy::Strict`](crate::config::EndpointPolicy::Strict) a missing
    /// endpoint is an error and nothing is inserted.
    pub fn add_relationship(&mut self, rel: Relationship) -> GraphResult<()> {
        self.store.add_relationship(rel)
    }

    pub fn relationship(&self, id: RelationshipId) -> Option<&Relationship> {
        self.store.relationship(id)
    }

    /// Relationships starting at `u` and ending at `v`
    pub fn relationships_between(&self, u: NodeId, v: NodeId) -> Vec<&Relationship> {
        self.store.relationships_between(u, v)
    }

    /// All stored relationships, in insertion order
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

    /// Nodes in topological order; ties go to the smaller id.
    ///
    /// Fails with [`GraphError::CycleDetected`] if the relationships contain a directed cycle.
    pub fn sort(&self) -> GraphResult<Vec<Node>> {
        let view = crate::algo::build_view(self);
        match multigraph_algorithms::topological_sort(&view) {
            Ok(order) => Ok(self.store.resolve(order.into_iter().map(NodeId::new).collect())),
            Err(AlgoError::Unorderable(components)) => Err(GraphError::CycleDetected {
                cycles: components
                    .into_iter()
                    .map(|ids| ids.into_iter().map(NodeId::new).collect())
                    .collect(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Same nodes and relationships with symmetric adjacency.
    ///
    /// Relationship records keep their start and end.
    pub fn as_undirected(&self) -> UndirectedMultigraph {
        tracing::debug!(
            "converting {} node(s) and {} relationship(s) to undirected",
            self.node_count(),
            self.relationship_count()
        );
        UndirectedMultigraph::from_store(self.store.rebuild(MultiAdjacency::undirected()))
    }

    pub(crate) fn node_ids(&self) -> Vec<NodeId> {
        self.store.node_ids()
    }
}

impl Default for DirectedMultigraph {
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

    fn chain() -> DirectedMultigraph {
        let mut graph = DirectedMultigraph::new();
        graph.add_node(Node::with_labels(1, ["A"]));
        graph.add_node(Node::with_labels(2, ["B"]));
        graph.add_node(Node::with_labels(3, ["C"]));
        graph.add_relationship(Relationship::new(10, 1, 2)).unwrap();
        graph.add_relationship(Relationship::new(11, 2, 3)).unwrap();
        graph
    }

    fn ids(nodes: &[Node]) -> Vec<i64> {
        nodes.iter().map(|node| node.id.as_i64()).collect()
    }

    #[test]
    fn test_sort_chain() {
        let order = chain().sort().unwrap();
        assert_eq!(ids(&order), vec![1, 2, 3]);
        assert!(order[0].has_label("A"));
    }

    #[test]
    fn test_sort_detects_cycle() {
        let mut graph = chain();
        graph.add_relationship(Relationship::new(12, 3, 1)).unwrap();

        match graph.sort() {
            Err(GraphError::CycleDetected { cycles }) => {
                assert_eq!(cycles, vec![vec![n(1), n(2), n(3)]]);
            }
            other => panic!("expected a cycle, got {:?}", other),
        }
    }

    #[test]
    fn test_from_and_to() {
        let graph = chain();

        assert_eq!(ids(&graph.from(n(2))), vec![3]);
        assert_eq!(ids(&graph.to(n(2))), vec![1]);
        assert!(graph.from(n(3)).is_empty());
        assert!(graph.to(n(1)).is_empty());
        assert!(graph.from(n(42)).is_empty());
    }

    #[test]
    fn test_remove_node_cascades() {
        let mut graph = chain();
        let removed = graph.remove_node(n(2)).unwrap();

        assert!(removed.has_label("B"));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.relationship_count(), 0);
        assert!(graph.from(n(1)).is_empty());
        assert!(graph.to(n(3)).is_empty());
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut graph = chain();

        assert!(graph.remove_node(n(99)).is_none());
        assert!(graph.remove_relationship(RelationshipId::new(99)).is_none());
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.relationship_count(), 2);
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let mut graph = DirectedMultigraph::new();
        graph.add_node(Node::new(1));
        graph.add_relationship(Relationship::new(1, 1, 1)).unwrap();

        assert!(matches!(graph.sort(), Err(GraphError::CycleDetected { .. })));

        graph.remove_node(n(1));
        assert_eq!(graph.relationship_count(), 0);
    }

    #[test]
    fn test_as_undirected_preserves_counts() {
        let graph = chain();
        let undirected = graph.as_undirected();

        assert_eq!(undirected.node_count(), 3);
        assert_eq!(undirected.relationship_count(), 2);
        assert_eq!(undirected.relationships_between(n(2), n(1)).len(), 1);
        // the source graph is untouched
        assert!(graph.relationships_between(n(2), n(1)).is_empty());
    }
}
