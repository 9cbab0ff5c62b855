//! # Node Configuration
//!
//! Environment-driven settings for the dev node. A richer configuration
//! layer (files, profiles) stays outside the core on purpose.

use std::env;

/// Dev-node configuration.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// This validator's identifier.
    pub node_id: String,
    /// Every validator id in the cluster, local node included.
    pub cluster_nodes: Vec<String>,
    /// PBFT fault tolerance `f`; quorum is `2f + 1`.
    pub fault_tolerance: usize,
    /// Data directory for persistent storage; in-memory when unset.
    pub data_dir: Option<String>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            node_id: "node-1".to_string(),
            cluster_nodes: vec!["node-1".to_string()],
            fault_tolerance: 0,
            data_dir: None,
        }
    }
}

impl NodeConfig {
    /// Read configuration from the environment, falling back to defaults.
    ///
    /// - `SL_NODE_ID` — validator id
    /// - `SL_CLUSTER_NODES` — comma-separated validator ids
    /// - `SL_FAULT_TOLERANCE` — `f`, a small non-negative integer
    /// - `SL_DATA_DIR` — storage path; empty/unset selects in-memory
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let node_id = env::var("SL_NODE_ID")
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.node_id);

        let cluster_nodes = env::var("SL_CLUSTER_NODES")
            .ok()
            .map(|raw| {
                raw.split(',')
                    .map(|part| part.trim().to_string())
                    .filter(|part| !part.is_empty())
                    .collect::<Vec<_>>()
            })
            .filter(|nodes| !nodes.is_empty())
            .unwrap_or_else(|| vec![node_id.clone()]);

        let fault_tolerance = env::var("SL_FAULT_TOLERANCE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.fault_tolerance);

        let data_dir = env::var("SL_DATA_DIR").ok().filter(|v| !v.is_empty());

        Self {
            node_id,
            cluster_nodes,
            fault_tolerance,
            data_dir,
        }
    }

    /// Cluster ids other than the local node.
    pub fn remote_nodes(&self) -> Vec<String> {
        self.cluster_nodes
            .iter()
            .filter(|id| **id != self.node_id)
            .cloned()
            .collect()
    }
}
