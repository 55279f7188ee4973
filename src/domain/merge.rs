/*
Copyright 2024 San Francisco Compute Company

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

//! Utilization merger: joins per-lab simulation statistics onto the node
//! collection.
//!
//! Merges for different labs are independent and commute, and re-applying
//! the same payload is idempotent (attach/overwrite, never duplicate).

use crate::domain::{Node, SimulationStats};
use log::debug;
use std::collections::HashMap;

/// Attach simulation utilization to the matching nodes.
///
/// Entries whose node id is not present in `nodes` are dropped: the node may
/// belong to a lab outside the current action set, or the stats may be
/// stale. That consistency gap is accepted, not a fault.
pub fn apply_simulation_stats(nodes: &mut HashMap<String, Node>, stats: &SimulationStats) {
    for (node_id, utilization) in &stats.nodes {
        match nodes.get_mut(node_id) {
            Some(node) => node.utilization = Some(utilization.clone()),
            None => debug!("dropping utilization for unknown node {}", node_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NodeState, NodeUtilization};

    fn node(id: &str) -> Node {
        Node {
            id: id.to_string(),
            label: format!("R-{}", id),
            node_definition: "iosv".to_string(),
            state: NodeState::Booted,
            cpus: Some(1),
            ram: Some(512),
            utilization: None,
        }
    }

    fn stats_for(node_id: &str, cpu: f64, ram: f64) -> SimulationStats {
        serde_json::from_value(serde_json::json!({
            "nodes": { node_id: { "cpu_usage": cpu, "ram_usage": ram } }
        }))
        .unwrap()
    }

    #[test]
    fn test_merge_attaches_utilization() {
        let mut nodes = HashMap::from([("n1".to_string(), node("n1"))]);
        apply_simulation_stats(&mut nodes, &stats_for("n1", 12.5, 30.0));

        let util = nodes["n1"].utilization.as_ref().unwrap();
        assert_eq!(util.cpu_usage, 12.5);
        assert_eq!(util.ram_usage, 30.0);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let mut nodes = HashMap::from([("n1".to_string(), node("n1"))]);
        let stats = stats_for("n1", 12.5, 30.0);

        apply_simulation_stats(&mut nodes, &stats);
        let first: Option<NodeUtilization> = nodes["n1"].utilization.clone();
        apply_simulation_stats(&mut nodes, &stats);

        assert_eq!(nodes["n1"].utilization, first);
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_merge_overwrites_refreshed_values() {
        let mut nodes = HashMap::from([("n1".to_string(), node("n1"))]);
        apply_simulation_stats(&mut nodes, &stats_for("n1", 12.5, 30.0));
        apply_simulation_stats(&mut nodes, &stats_for("n1", 50.0, 60.0));

        assert_eq!(nodes["n1"].utilization.as_ref().unwrap().cpu_usage, 50.0);
    }

    #[test]
    fn test_merge_drops_unknown_node_ids() {
        let mut nodes = HashMap::from([("n1".to_string(), node("n1"))]);
        apply_simulation_stats(&mut nodes, &stats_for("ghost", 99.0, 99.0));

        assert_eq!(nodes.len(), 1);
        assert!(nodes["n1"].utilization.is_none());
    }

    #[test]
    fn test_merge_with_empty_stats_is_noop() {
        let mut nodes = HashMap::from([("n1".to_string(), node("n1"))]);
        apply_simulation_stats(&mut nodes, &SimulationStats::default());

        assert_eq!(nodes.len(), 1);
        assert!(nodes["n1"].utilization.is_none());
    }
}
