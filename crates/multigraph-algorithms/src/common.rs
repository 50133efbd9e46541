//! Shared utilities for graph algorithms
//!
//! Defines the capabilities a graph must expose to be handed to the algorithms in this
//! crate, and a read-only, dense view of its topology used while they run.

use std::collections::HashMap;

/// Node Identifier type (i64)
pub type NodeId = i64;

/// A node only needs a stable integer identity.
pub trait GraphNode {
    fn node_id(&self) -> NodeId;
}

/// A line joins two nodes. Several lines may join the same pair; they are told apart
/// by `line_id` alone.
pub trait GraphLine: Sized {
    fn line_id(&self) -> i64;

    fn from_id(&self) -> NodeId;

    fn to_id(&self) -> NodeId;

    /// The same line seen from its other end.
    fn reversed(&self) -> Self;
}

/// A graph that can be projected into a [`GraphView`].
pub trait Topology {
    type Line: GraphLine;

    /// Ids of the nodes held by the graph.
    fn node_ids(&self) -> Vec<NodeId>;

    /// Every line of the graph, each reported once.
    fn lines(&self) -> Vec<Self::Line>;

    /// Undirected graphs contribute every line in both directions.
    fn is_directed(&self) -> bool;
}

/// Sort nodes by ascending id.
pub fn sort_by_id<N: GraphNode>(nodes: &mut [N]) {
    nodes.sort_by_key(|n| n.node_id());
}

/// Sort every community by id, then order the communities lexicographically by their ids.
pub fn sort_communities<N: GraphNode>(communities: &mut [Vec<N>]) {
    for community in communities.iter_mut() {
        sort_by_id(community);
    }
    communities.sort_by(|a, b| {
        let a = a.iter().map(GraphNode::node_id);
        let b = b.iter().map(GraphNode::node_id);
        a.cmp(b)
    });
}

impl GraphNode for NodeId {
    fn node_id(&self) -> NodeId {
        *self
    }
}

/// A dense, integer-indexed view of the graph topology using Compressed Sparse Row (CSR) format.
///
/// Dense indices follow ascending node id, so every algorithm built on the view
/// visits nodes in a deterministic order.
#[derive(Debug, Clone)]
pub struct GraphView {
    /// Number of nodes
    pub node_count: usize,
    /// Mapping from dense index (0..N) back to NodeId
    pub index_to_node: Vec<NodeId>,
    /// Mapping from NodeId to dense index
    pub node_to_index: HashMap<NodeId, usize>,

    /// Outgoing edges CSR structure
    /// Offsets into `out_targets`. Size = node_count + 1
    pub out_offsets: Vec<usize>,
    /// Contiguous array of target node indices
    pub out_targets: Vec<usize>,

    /// Incoming edges CSR structure (Compressed Sparse Column effectively)
    /// Offsets into `in_sources`. Size = node_count + 1
    pub in_offsets: Vec<usize>,
    /// Contiguous array of source node indices
    pub in_sources: Vec<usize>,

    /// Edge weights: aligned with `out_targets`
    pub weights: Option<Vec<f64>>,

    /// Whether lines were projected one way only
    pub directed: bool,
}

impl GraphView {
    /// Project any [`Topology`] into a view.
    ///
    /// Ids referenced by a line but missing from `node_ids` still become nodes of the view.
    /// Parallel lines are kept as repeated targets.
    pub fn from_topology<T: Topology>(graph: &T) -> Self {
        let lines = graph.lines();
        let directed = graph.is_directed();

        let mut ids = graph.node_ids();
        for line in &lines {
            ids.push(line.from_id());
            ids.push(line.to_id());
        }
        ids.sort_unstable();
        ids.dedup();

        let node_to_index: HashMap<NodeId, usize> =
            ids.iter().enumerate().map(|(idx, &id)| (id, idx)).collect();
        let node_count = ids.len();

        let mut outgoing = vec![Vec::new(); node_count];
        let mut incoming = vec![Vec::new(); node_count];

        let mut project = |from: NodeId, to: NodeId| {
            let u = node_to_index[&from];
            let v = node_to_index[&to];
            outgoing[u].push(v);
            incoming[v].push(u);
        };

        for line in &lines {
            project(line.from_id(), line.to_id());
            if !directed {
                let back = line.reversed();
                project(back.from_id(), back.to_id());
            }
        }

        let mut view =
            Self::from_adjacency_list(node_count, ids, node_to_index, outgoing, incoming, None);
        view.directed = directed;
        view
    }

    /// Get the out-degree of a node (by index)
    pub fn out_degree(&self, idx: usize) -> usize {
        self.out_offsets[idx + 1] - self.out_offsets[idx]
    }

    /// Get the in-degree of a node (by index)
    pub fn in_degree(&self, idx: usize) -> usize {
        self.in_offsets[idx + 1] - self.in_offsets[idx]
    }

    /// Get outgoing neighbors (successors) of a node
    pub fn successors(&self, idx: usize) -> &[usize] {
        let start = self.out_offsets[idx];
        let end = self.out_offsets[idx + 1];
        &self.out_targets[start..end]
    }

    /// Get incoming neighbors (predecessors) of a node
    pub fn predecessors(&self, idx: usize) -> &[usize] {
        let start = self.in_offsets[idx];
        let end = self.in_offsets[idx + 1];
        &self.in_sources[start..end]
    }

    /// Get weights for outgoing edges of a node
    pub fn weights(&self, idx: usize) -> Option<&[f64]> {
        self.weights.as_ref().map(|w| {
            let start = self.out_offsets[idx];
            let end = self.out_offsets[idx + 1];
            &w[start..end]
        })
    }

    /// Weight of the `pos`-th outgoing edge of a node, 1.0 when the view is unweighted
    pub fn weight_at(&self, idx: usize, pos: usize) -> f64 {
        self.weights(idx).map_or(1.0, |w| w[pos])
    }

    /// Helper to create GraphView from adjacency lists
    pub fn from_adjacency_list(
        node_count: usize,
        index_to_node: Vec<NodeId>,
        node_to_index: HashMap<NodeId, usize>,
        outgoing: Vec<Vec<usize>>,
        incoming: Vec<Vec<usize>>,
        weights: Option<Vec<Vec<f64>>>,
    ) -> Self {
        let mut out_offsets = Vec::with_capacity(node_count + 1);
        let mut out_targets = Vec::new();
        let mut in_offsets = Vec::with_capacity(node_count + 1);
        let mut in_sources = Vec::new();
        let mut flat_weights = if weights.is_some() { Some(Vec::new()) } else { None };

        out_offsets.push(0);
        for (i, neighbors) in outgoing.into_iter().enumerate() {
            out_targets.extend(neighbors);
            out_offsets.push(out_targets.len());

            if let Some(ref mut w_flat) = flat_weights {
                if let Some(w_row) = weights.as_ref().map(|w| &w[i]) {
                    w_flat.extend(w_row.iter());
                }
            }
        }

        in_offsets.push(0);
        for sources in incoming {
            in_sources.extend(sources);
            in_offsets.push(in_sources.len());
        }

        GraphView {
            node_count,
            index_to_node,
            node_to_index,
            out_offsets,
            out_targets,
            in_offsets,
            in_sources,
            weights: flat_weights,
            directed: true,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[derive(Clone, Copy)]
    pub(crate) struct TestLine(pub i64, pub NodeId, pub NodeId);

    impl GraphLine for TestLine {
        fn line_id(&self) -> i64 {
            self.0
        }
        fn from_id(&self) -> NodeId {
            self.1
        }
        fn to_id(&self) -> NodeId {
            self.2
        }
        fn reversed(&self) -> Self {
            TestLine(self.0, self.2, self.1)
        }
    }

    pub(crate) struct TestGraph {
        pub nodes: Vec<NodeId>,
        pub lines: Vec<TestLine>,
        pub directed: bool,
    }

    impl TestGraph {
        pub(crate) fn directed(nodes: &[NodeId], edges: &[(NodeId, NodeId)]) -> Self {
            Self::build(nodes, edges, true)
        }

        pub(crate) fn undirected(nodes: &[NodeId], edges: &[(NodeId, NodeId)]) -> Self {
            Self::build(nodes, edges, false)
        }

        fn build(nodes: &[NodeId], edges: &[(NodeId, NodeId)], directed: bool) -> Self {
            let lines = edges
                .iter()
                .enumerate()
                .map(|(i, &(u, v))| TestLine(i as i64, u, v))
                .collect();
            TestGraph { nodes: nodes.to_vec(), lines, directed }
        }
    }

    impl Topology for TestGraph {
        type Line = TestLine;

        fn node_ids(&self) -> Vec<NodeId> {
            self.nodes.clone()
        }
        fn lines(&self) -> Vec<TestLine> {
            self.lines.clone()
        }
        fn is_directed(&self) -> bool {
            self.directed
        }
    }

    #[test]
    fn test_directed_projection() {
        // 30 -> 10, 10 -> 20, 10 -> 20 (parallel)
        let g = TestGraph::directed(&[30, 10, 20], &[(30, 10), (10, 20), (10, 20)]);
        let view = GraphView::from_topology(&g);

        assert_eq!(view.node_count, 3);
        assert_eq!(view.index_to_node, vec![10, 20, 30]);
        assert_eq!(view.successors(0), &[1, 1]);
        assert_eq!(view.successors(2), &[0]);
        assert_eq!(view.in_degree(1), 2);
        assert_eq!(view.out_degree(1), 0);
        assert!(view.directed);
    }

    #[test]
    fn test_undirected_projection_is_symmetric() {
        let g = TestGraph::undirected(&[1, 2], &[(1, 2)]);
        let view = GraphView::from_topology(&g);

        assert_eq!(view.successors(0), &[1]);
        assert_eq!(view.successors(1), &[0]);
        assert!(!view.directed);
    }

    #[test]
    fn test_dangling_line_endpoint_becomes_node() {
        let g = TestGraph::directed(&[1], &[(1, 5)]);
        let view = GraphView::from_topology(&g);

        assert_eq!(view.index_to_node, vec![1, 5]);
        assert_eq!(view.node_to_index[&5], 1);
    }

    #[test]
    fn test_sort_communities() {
        let mut communities: Vec<Vec<NodeId>> = vec![vec![5, 3], vec![2, 9], vec![2, 1]];
        sort_communities(&mut communities);
        assert_eq!(communities, vec![vec![1, 2], vec![2, 9], vec![3, 5]]);
    }
}
