//! Graph algorithms module
//!
//! Algorithms are implemented in the `multigraph-algorithms` crate and only see the
//! capabilities of `Topology`, `GraphNode` and `GraphLine`. This module provides the
//! integration/adapter layer: trait impls for the multigraphs, view building, and the
//! multiplex network used for community profiling.

use crate::config::ProfileConfig;
use crate::graph::{
    DirectedMultigraph, GraphResult, Node, NodeId, Relationship, UndirectedMultigraph,
};
use multigraph_algorithms::{
    modular_multiplex_score, profile, q_multiplex, sort_communities, GraphView, MultiplexLayers,
    Topology,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

// Re-export algorithms
pub use multigraph_algorithms::{
    connected_components, strongly_connected_components, topological_sort, AlgoError,
    AlgoResult, Interval,
};

impl Topology for DirectedMultigraph {
    type Line = Relationship;

    fn node_ids(&self) -> Vec<i64> {
        DirectedMultigraph::node_ids(self).into_iter().map(|id| id.as_i64()).collect()
    }

    fn lines(&self) -> Vec<Relationship> {
        self.relationships().cloned().collect()
    }

    fn is_directed(&self) -> bool {
        true
    }
}

impl Topology for UndirectedMultigraph {
    type Line = Relationship;

    fn node_ids(&self) -> Vec<i64> {
        UndirectedMultigraph::node_ids(self).into_iter().map(|id| id.as_i64()).collect()
    }

    fn lines(&self) -> Vec<Relationship> {
        self.relationships().cloned().collect()
    }

    fn is_directed(&self) -> bool {
        false
    }
}

/// Build a GraphView from a multigraph for algorithm execution
pub fn build_view<T: Topology>(graph: &T) -> GraphView {
    GraphView::from_topology(graph)
}

/// One named layer of a [`MultiplexNetwork`]
#[derive(Debug, Clone)]
pub struct Layer {
    pub name: String,
    pub graph: UndirectedMultigraph,
    pub weight: f64,
}

/// A partition found over a resolution range
#[derive(Debug, Clone, Serialize)]
pub struct Partition {
    /// Lowest resolution yielding this partition
    pub low: f64,
    /// Highest resolution yielding this partition
    pub high: f64,
    /// Best summed multiplex modularity seen inside the range
    pub score: f64,
    /// Summed multiplex modularity at `low`
    pub modularity: f64,
    /// Communities ordered by their smallest ids, members by id
    pub communities: Vec<Vec<Node>>,
}

impl Partition {
    /// Member ids of every community
    pub fn community_ids(&self) -> Vec<Vec<i64>> {
        self.communities
            .iter()
            .map(|c| c.iter().map(|node| node.id.as_i64()).collect())
            .collect()
    }
}

/// Weighted undirected layers over one shared node set
#[derive(Debug, Clone, Default)]
pub struct MultiplexNetwork {
    layers: Vec<Layer>,
}

impl MultiplexNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a layer. Node sets are compared when the network is analysed.
    pub fn add_layer(&mut self, name: impl Into<String>, graph: UndirectedMultigraph, weight: f64) {
        self.layers.push(Layer {
            name: name.into(),
            graph,
            weight,
        });
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    pub fn weights(&self) -> Vec<f64> {
        self.layers.iter().map(|layer| layer.weight).collect()
    }

    /// Views of every layer, checked for a shared node set.
    ///
    /// Fails with the collaborator's `LayerMismatch` when the layers hold different node ids.
    pub fn multiplex_layers(&self) -> GraphResult<MultiplexLayers> {
        let views: Vec<GraphView> = self.layers.iter().map(|layer| build_view(&layer.graph)).collect();
        Ok(MultiplexLayers::new(&views)?)
    }

    /// Summed weighted modularity of a partition at one resolution
    pub fn modularity(&self, communities: &[Vec<Node>], resolution: f64) -> GraphResult<f64> {
        let layers = self.multiplex_layers()?;
        let ids: Vec<Vec<i64>> = communities
            .iter()
            .map(|c| c.iter().map(|node| node.id.as_i64()).collect())
            .collect();
        let q = q_multiplex(&layers, &ids, &self.weights(), &[resolution])?;
        Ok(q.iter().sum())
    }

    /// Sweep the resolution range and report every distinct partition.
    pub fn community_profile(&self, config: &ProfileConfig) -> GraphResult<Vec<Partition>> {
        let layers = self.multiplex_layers()?;
        let weights = self.weights();
        let rng = StdRng::seed_from_u64(config.seed);

        tracing::info!(
            layers = self.depth(),
            nodes = layers.node_ids().len(),
            "profiling communities over [{}, {}]",
            config.low,
            config.high
        );

        let score = modular_multiplex_score(
            &layers,
            &weights,
            config.all_communities,
            config.effort,
            rng,
        );
        let intervals = profile(score, config.log_scale, config.grain, config.low, config.high)?;

        intervals
            .into_iter()
            .map(|interval| -> GraphResult<Partition> {
                let modularity: f64 =
                    q_multiplex(&layers, &interval.communities, &weights, &[interval.low])?
                        .iter()
                        .sum();
                let mut communities: Vec<Vec<Node>> = interval
                    .communities
                    .iter()
                    .map(|ids| ids.iter().map(|&id| self.resolve(id)).collect())
                    .collect();
                sort_communities(&mut communities);

                Ok(Partition {
                    low: interval.low,
                    high: interval.high,
                    score: interval.score,
                    modularity,
                    communities,
                })
            })
            .collect()
    }

    fn resolve(&self, id: i64) -> Node {
        let id = NodeId::new(id);
        self.layers
            .iter()
            .find_map(|layer| layer.graph.node(id))
            .cloned()
            .unwrap_or_else(|| Node::new(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphError;

    fn layer(nodes: &[i64], edges: &[(i64, i64)]) -> UndirectedMultigraph {
        let mut graph = UndirectedMultigraph::new();
        for &id in nodes {
            graph.add_node(Node::new(id));
        }
        for (i, &(u, v)) in edges.iter().enumerate() {
            graph.add_relationship(Relationship::new(i as i64, u, v)).unwrap();
        }
        graph
    }

    #[test]
    fn test_directed_view() {
        let mut graph = DirectedMultigraph::new();
        graph.add_node(Node::new(2));
        graph.add_node(Node::new(1));
        graph.add_relationship(Relationship::new(1, 1, 2)).unwrap();
        graph.add_relationship(Relationship::new(2, 1, 2)).unwrap();

        let view = build_view(&graph);
        assert_eq!(view.index_to_node, vec![1, 2]);
        assert_eq!(view.out_degree(0), 2);
        assert_eq!(view.in_degree(0), 0);
    }

    #[test]
    fn test_undirected_view_is_symmetric() {
        let graph = layer(&[1, 2], &[(1, 2)]);
        let view = build_view(&graph);

        assert_eq!(view.out_degree(0), 1);
        assert_eq!(view.out_degree(1), 1);
    }

    #[test]
    fn test_layer_mismatch_is_propagated() {
        let mut network = MultiplexNetwork::new();
        network.add_layer("a", layer(&[1, 2], &[(1, 2)]), 1.0);
        network.add_layer("b", layer(&[1, 2, 3], &[(1, 3)]), 1.0);

        let err = network.community_profile(&ProfileConfig::default()).unwrap_err();
        assert!(err.is_layer_mismatch());
        assert!(matches!(err, GraphError::Algorithm(AlgoError::LayerMismatch)));
    }

    #[test]
    fn test_modularity_of_split() {
        let mut network = MultiplexNetwork::new();
        network.add_layer("a", layer(&[1, 2, 3, 4], &[(1, 2), (3, 4)]), 1.0);

        let split = vec![
            vec![Node::new(1), Node::new(2)],
            vec![Node::new(3), Node::new(4)],
        ];
        // Each side holds one of two lines and half the degree: 2 * (1/2 - 1/4)
        let q = network.modularity(&split, 1.0).unwrap();
        assert!((q - 0.5).abs() < 1e-12);
    }
}
