//! Errors raised by the algorithms

use crate::common::NodeId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AlgoError {
    /// The graph has no topological order. Carries every strongly connected
    /// component that contains a cycle.
    #[error("graph is not a DAG: {} cyclic component(s)", .0.len())]
    Unorderable(Vec<Vec<NodeId>>),

    #[error("multiplex layers do not share the same node id set")]
    LayerMismatch,

    #[error("expected {layers} layer weights, got {weights}")]
    WeightMismatch { layers: usize, weights: usize },

    #[error("expected 1 or {layers} resolutions, got {resolutions}")]
    ResolutionMismatch { layers: usize, resolutions: usize },

    #[error("invalid resolution range [{low}, {high}]")]
    InvalidRange { low: f64, high: f64 },
}

pub type AlgoResult<T> = Result<T, AlgoError>;
