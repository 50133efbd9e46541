//! Graph ordering algorithms
//!
//! Topological sort (Kahn's algorithm) with a cycle report on failure.

use super::common::{GraphView, NodeId};
use super::community::cyclic_components;
use super::error::{AlgoError, AlgoResult};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Topological sort
///
/// Returns node ids such that every edge `u -> v` has `u` before `v`. Among nodes that are
/// ready at the same time the smallest id goes first, so the order is deterministic.
///
/// Fails with [`AlgoError::Unorderable`] listing the cyclic components when the graph has
/// a directed cycle (self-loops included).
pub fn topological_sort(view: &GraphView) -> AlgoResult<Vec<NodeId>> {
    let n = view.node_count;
    let mut in_degree: Vec<usize> = (0..n).map(|idx| view.in_degree(idx)).collect();

    // Dense indices follow id order, so a min-heap on the index is a min-heap on the id
    let mut ready: BinaryHeap<Reverse<usize>> = in_degree
        .iter()
        .enumerate()
        .filter(|(_, &d)| d == 0)
        .map(|(idx, _)| Reverse(idx))
        .collect();

    let mut order = Vec::with_capacity(n);
    while let Some(Reverse(u)) = ready.pop() {
        order.push(view.index_to_node[u]);
        for &v in view.successors(u) {
            in_degree[v] -= 1;
            if in_degree[v] == 0 {
                ready.push(Reverse(v));
            }
        }
    }

    if order.len() < n {
        let cycles = cyclic_components(view);
        tracing::debug!(cycles = cycles.len(), "topological sort found cycles");
        return Err(AlgoError::Unorderable(cycles));
    }

    Ok(order)
}
