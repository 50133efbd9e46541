//! Graph algorithms consumed by the multigraph data layer.
//!
//! Every algorithm runs over a [`GraphView`], a dense projection of any graph that
//! implements [`Topology`]. Nodes and lines only need the capabilities of [`GraphNode`]
//! and [`GraphLine`], so the algorithms never see the caller's concrete types.

pub mod common;
pub mod community;
pub mod error;
pub mod multiplex;
pub mod profile;
pub mod topology;

pub use common::{sort_by_id, sort_communities, GraphLine, GraphNode, GraphView, NodeId, Topology};
pub use community::{
    connected_components, cyclic_components, strongly_connected_components,
    weakly_connected_components, WccResult,
};
pub use error::{AlgoError, AlgoResult};
pub use multiplex::{modular_multiplex_score, modularize_multiplex, q_multiplex, MultiplexLayers, Scored};
pub use profile::{profile, Interval};
pub use topology::topological_sort;
