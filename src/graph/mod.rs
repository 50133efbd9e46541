//! Property multigraph data model
//!
//! - Nodes with ordered labels and properties
//! - Directed relationships with ordered types and properties
//! - Any number of relationships between the same pair of nodes, told apart by id
//! - Directed and undirected graphs with cascading node removal

mod adjacency;
pub mod directed;
pub mod error;
pub mod node;
pub mod property;
pub mod relationship;
mod store;
pub mod types;
pub mod undirected;

// Re-export main types
pub use directed::DirectedMultigraph;
pub use error::{GraphError, GraphResult};
pub use node::Node;
pub use property::{property_map_from_json, PropertyMap, PropertyValue};
pub use relationship::Relationship;
pub use types::{Label, NodeId, RelationshipId, RelationshipType};
pub use undirected::UndirectedMultigraph;
