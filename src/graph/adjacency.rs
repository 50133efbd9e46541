//! Id-keyed multi-adjacency
//!
//! Pure bookkeeping of which relationship ids join which node ids. Records live in the
//! graph; this structure is only mutated through the graph's own methods.

use super::types::{NodeId, RelationshipId};
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap;

/// Neighbour -> ids of the lines to it, in insertion order
type Lines = IndexMap<NodeId, IndexSet<RelationshipId>>;

#[derive(Debug, Clone, Default)]
pub(crate) struct MultiAdjacency {
    directed: bool,
    /// Lines leaving each node. Undirected: every line, registered at both ends.
    successors: FxHashMap<NodeId, Lines>,
    /// Lines entering each node. Empty when undirected.
    predecessors: FxHashMap<NodeId, Lines>,
}

impl MultiAdjacency {
    pub(crate) fn directed() -> Self {
        MultiAdjacency {
            directed: true,
            ..Default::default()
        }
    }

    pub(crate) fn undirected() -> Self {
        MultiAdjacency::default()
    }

    pub(crate) fn add_node(&mut self, id: NodeId) {
        self.successors.entry(id).or_default();
        if self.directed {
            self.predecessors.entry(id).or_default();
        }
    }

    pub(crate) fn contains_node(&self, id: NodeId) -> bool {
        self.successors.contains_key(&id)
    }

    /// Every node id known to the adjacency, ascending
    pub(crate) fn node_ids(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.successors.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Register line `rel` from `from` to `to`. Unknown endpoints are added.
    pub(crate) fn set_line(&mut self, from: NodeId, to: NodeId, rel: RelationshipId) {
        self.add_node(from);
        self.add_node(to);

        insert(&mut self.successors, from, to, rel);
        if self.directed {
            insert(&mut self.predecessors, to, from, rel);
        } else {
            insert(&mut self.successors, to, from, rel);
        }
    }

    pub(crate) fn remove_line(&mut self, from: NodeId, to: NodeId, rel: RelationshipId) {
        remove(&mut self.successors, from, to, rel);
        if self.directed {
            remove(&mut self.predecessors, to, from, rel);
        } else {
            remove(&mut self.successors, to, from, rel);
        }
    }

    /// Drop a node and any line still attached to it
    pub(crate) fn remove_node(&mut self, id: NodeId) {
        if let Some(out) = self.successors.remove(&id) {
            let back = if self.directed {
                &mut self.predecessors
            } else {
                &mut self.successors
            };
            for neighbour in out.keys() {
                if let Some(lines) = back.get_mut(neighbour) {
                    lines.shift_remove(&id);
                }
            }
        }

        if let Some(incoming) = self.predecessors.remove(&id) {
            for neighbour in incoming.keys() {
                if let Some(lines) = self.successors.get_mut(neighbour) {
                    lines.shift_remove(&id);
                }
            }
        }
    }

    /// Nodes reachable over one line leaving `id`
    pub(crate) fn from(&self, id: NodeId) -> Vec<NodeId> {
        neighbours(&self.successors, id)
    }

    /// Nodes with a line entering `id`; same as `from` when undirected
    pub(crate) fn to(&self, id: NodeId) -> Vec<NodeId> {
        if self.directed {
            neighbours(&self.predecessors, id)
        } else {
            neighbours(&self.successors, id)
        }
    }

    /// Ids of the lines from `u` to `v`
    pub(crate) fn lines(&self, u: NodeId, v: NodeId) -> Vec<RelationshipId> {
        self.successors
            .get(&u)
            .and_then(|out| out.get(&v))
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }
}

fn insert(map: &mut FxHashMap<NodeId, Lines>, u: NodeId, v: NodeId, rel: RelationshipId) {
    map.entry(u).or_default().entry(v).or_default().insert(rel);
}

fn remove(map: &mut FxHashMap<NodeId, Lines>, u: NodeId, v: NodeId, rel: RelationshipId) {
    if let Some(out) = map.get_mut(&u) {
        if let Some(ids) = out.get_mut(&v) {
            ids.shift_remove(&rel);
            if ids.is_empty() {
                out.shift_remove(&v);
            }
        }
    }
}

fn neighbours(map: &FxHashMap<NodeId, Lines>, id: NodeId) -> Vec<NodeId> {
    map.get(&id)
        .map(|out| out.keys().copied().collect())
        .unwrap_or_default()
}
