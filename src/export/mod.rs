//! Visualization export

pub mod dot;

pub use dot::{render_dot, write_dot, CommunityGrouping};
