//! Multigraph
//!
//! In-memory property multigraphs: any number of typed relationships may join the same pair
//! of nodes, told apart only by their ids. Graphs come in a directed and an undirected
//! flavour, remove nodes with cascading deletion of their relationships, and hand
//! themselves to the algorithms of `multigraph-algorithms` through small capability traits.
//!
//! # Modules
//!
//! - [`graph`]: nodes, relationships, property values and the two multigraphs
//! - [`algo`]: adapter to the algorithms crate and multiplex community profiling
//! - [`exchange`]: JSON exchange payloads and per-type layer construction
//! - [`export`]: Graphviz DOT rendering
//! - [`config`]: graph and profiling configuration
//!
//! ## Example Usage
//!
//! ```rust
//! use multigraph::graph::{DirectedMultigraph, Node, NodeId, Relationship};
//!
//! let mut graph = DirectedMultigraph::new();
//! graph.add_node(Node::with_labels(1, ["Person"]));
//! graph.add_node(Node::with_labels(2, ["Person"]));
//! graph.add_node(Node::with_labels(3, ["Phone"]));
//!
//! // Two relationships between the same pair
//! graph.add_relationship(Relationship::new(10, 1, 2).with_type("KNOWS")).unwrap();
//! graph.add_relationship(Relationship::new(11, 1, 2).with_type("WORKS_WITH")).unwrap();
//! graph.add_relationship(Relationship::new(12, 2, 3).with_type("HAS_PHONE")).unwrap();
//!
//! assert_eq!(graph.relationships_between(NodeId::new(1), NodeId::new(2)).len(), 2);
//!
//! let order: Vec<i64> = graph.sort().unwrap().iter().map(|n| n.id.as_i64()).collect();
//! assert_eq!(order, vec![1, 2, 3]);
//!
//! // Removing a node removes its relationships first
//! graph.remove_node(NodeId::new(2));
//! assert_eq!(graph.relationship_count(), 0);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod config;
pub mod exchange;
pub mod export;
pub mod graph;

// Re-export main types for convenience
pub use graph::{
    DirectedMultigraph, GraphError, GraphResult, Label, Node, NodeId, PropertyMap,
    PropertyValue, Relationship, RelationshipId, RelationshipType, UndirectedMultigraph,
};

pub use algo::{MultiplexNetwork, Partition};

pub use config::{Config, EndpointPolicy, GraphConfig, ProfileConfig};

pub use exchange::ExchangeDocument;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
