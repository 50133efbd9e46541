//! Configuration
//!
//! Every section has a `Default`, so a YAML file only needs the keys it changes:
//!
//! ```yaml
//! graph:
//!   endpoint_policy: strict
//! profile:
//!   seed: 42
//!   layer_weights:
//!     Has_Phone: 2.0
//! ```

use crate::graph::{GraphResult, RelationshipType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// What `add_relationship` does when an endpoint has no node record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointPolicy {
    /// Accept the relationship; the endpoint may be added later
    #[default]
    Lenient,
    /// Reject the relationship with a missing-node error
    Strict,
}

/// Graph behaviour switches
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub endpoint_policy: EndpointPolicy,
}

impl GraphConfig {
    /// Config that rejects relationships with missing endpoints
    pub fn strict() -> Self {
        GraphConfig {
            endpoint_policy: EndpointPolicy::Strict,
        }
    }
}

/// Parameters of the multiplex community sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    /// Seed of the random source, so runs are reproducible
    pub seed: u64,
    /// Modularization attempts per resolution; the best is kept
    pub effort: usize,
    /// Consider every community when moving a node (needed with negative weights)
    pub all_communities: bool,
    /// Bisect the resolution range on a log scale
    pub log_scale: bool,
    /// Narrowest resolution interval worth splitting
    pub grain: f64,
    /// Lowest resolution
    pub low: f64,
    /// Highest resolution
    pub high: f64,
    /// Weight per layer, by relationship type
    pub layer_weights: BTreeMap<String, f64>,
    /// Weight of any layer not listed in `layer_weights`
    pub default_weight: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            effort: 10,
            all_communities: true,
            log_scale: true,
            grain: 1e-3,
            low: 0.1,
            high: 10.0,
            layer_weights: BTreeMap::new(),
            default_weight: 1.0,
        }
    }
}

impl ProfileConfig {
    /// Weight for the layer built from one relationship type
    pub fn weight_for(&self, rel_type: &RelationshipType) -> f64 {
        self.layer_weights
            .get(rel_type.as_str())
            .copied()
            .unwrap_or(self.default_weight)
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub graph: GraphConfig,
    pub profile: ProfileConfig,
}

impl Config {
    pub fn from_yaml_str(text: &str) -> GraphResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> GraphResult<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!("loaded configuration from {:?}", path.as_ref());
        Self::from_yaml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_run() {
        let config = Config::default();

        assert_eq!(config.graph.endpoint_policy, EndpointPolicy::Lenient);
        assert_eq!(config.profile.seed, 1);
        assert_eq!(config.profile.effort, 10);
        assert!(config.profile.all_communities);
        assert!(config.profile.log_scale);
        assert_eq!(config.profile.grain, 1e-3);
        assert_eq!((config.profile.low, config.profile.high), (0.1, 10.0));
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = "
graph:
  endpoint_policy: strict
profile:
  seed: 42
  layer_weights:
    Has_Phone: 2.0
";
        let config = Config::from_yaml_str(yaml).unwrap();

        assert_eq!(config.graph, GraphConfig::strict());
        assert_eq!(config.profile.seed, 42);
        assert_eq!(config.profile.effort, 10);
        assert_eq!(config.profile.weight_for(&"Has_Phone".into()), 2.0);
        assert_eq!(config.profile.weight_for(&"Has_Bank".into()), 1.0);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(Config::from_yaml_str("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_bad_yaml() {
        let err = Config::from_yaml_str("graph:\n  endpoint_policy: sometimes\n").unwrap_err();
        assert!(matches!(err, crate::graph::GraphError::Config(_)));
    }
}
