//! Errors that can occur during graph operations

use super::types::{NodeId, RelationshipId};
use multigraph_algorithms::AlgoError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    /// The relationships contain a directed cycle, so there is no topological order
    #[error("cycle detected among {} component(s): {cycles:?}", cycles.len())]
    CycleDetected { cycles: Vec<Vec<NodeId>> },

    #[error("relationship {relationship} starts at missing node {node}")]
    MissingStartNode {
        relationship: RelationshipId,
        node: NodeId,
    },

    #[error("relationship {relationship} ends at missing node {node}")]
    MissingEndNode {
        relationship: RelationshipId,
        node: NodeId,
    },

    /// Failure of a delegated algorithm, passed through as is
    #[error(transparent)]
    Algorithm(#[from] AlgoError),

    #[error("invalid exchange payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GraphError {
    /// True for the layer mismatch reported by the community collaborator
    pub fn is_layer_mismatch(&self) -> bool {
        matches!(self, GraphError::Algorithm(AlgoError::LayerMismatch))
    }
}

pub type GraphResult<T> = Result<T, GraphError>;
