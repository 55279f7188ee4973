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

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Lifecycle state of a lab as reported by the controller.
///
/// Unknown states decode into `Other` so a newer controller cannot break
/// deserialization; reports only distinguish `Started` from everything else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LabState {
    Started,
    Stopped,
    DefinedOnCore,
    Other(String),
}

impl LabState {
    /// Whether the lab is currently running a simulation.
    pub fn is_running(&self) -> bool {
        matches!(self, LabState::Started)
    }
}

impl From<String> for LabState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "STARTED" => LabState::Started,
            "STOPPED" => LabState::Stopped,
            "DEFINED_ON_CORE" => LabState::DefinedOnCore,
            _ => LabState::Other(s),
        }
    }
}

impl From<LabState> for String {
    fn from(state: LabState) -> Self {
        state.to_string()
    }
}

impl fmt::Display for LabState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabState::Started => write!(f, "STARTED"),
            LabState::Stopped => write!(f, "STOPPED"),
            LabState::DefinedOnCore => write!(f, "DEFINED_ON_CORE"),
            LabState::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Lifecycle state of a node; reports distinguish `Booted` from the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NodeState {
    Booted,
    Started,
    Stopped,
    DefinedOnCore,
    Other(String),
}

impl NodeState {
    pub fn is_booted(&self) -> bool {
        matches!(self, NodeState::Booted)
    }
}

impl From<String> for NodeState {
    fn from(s: String) -> Self {
        match s.as_str() {
            "BOOTED" => NodeState::Booted,
            "STARTED" => NodeState::Started,
            "STOPPED" => NodeState::Stopped,
            "DEFINED_ON_CORE" => NodeState::DefinedOnCore,
            _ => NodeState::Other(s),
        }
    }
}

impl From<NodeState> for String {
    fn from(state: NodeState) -> Self {
        state.to_string()
    }
}

impl fmt::Display for NodeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeState::Booted => write!(f, "BOOTED"),
            NodeState::Started => write!(f, "STARTED"),
            NodeState::Stopped => write!(f, "STOPPED"),
            NodeState::DefinedOnCore => write!(f, "DEFINED_ON_CORE"),
            NodeState::Other(s) => write!(f, "{}", s),
        }
    }
}

/// A saved topology lab on the controller.
///
/// Built from one detail response per lab; the fetcher attaches `node_ids`
/// and `link_ids` from the two per-lab listing endpoints, after which the
/// record is immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lab {
    /// Controller-assigned lab identifier (unique within one fetch)
    #[serde(default)]
    pub id: String,
    /// Lab title
    #[serde(rename = "lab_title")]
    pub title: String,
    /// Username of the lab owner
    #[serde(rename = "owner_username")]
    pub owner: String,
    /// Current lab state
    pub state: LabState,
    /// Number of nodes in the topology
    #[serde(default)]
    pub node_count: u32,
    /// Number of links in the topology
    #[serde(default)]
    pub link_count: u32,
    /// Identifiers of the lab's nodes, in topology order
    #[serde(rename = "lab_nodes", default)]
    pub node_ids: Vec<String>,
    /// Identifiers of the lab's links, in topology order
    #[serde(rename = "lab_links", default)]
    pub link_ids: Vec<String>,
}

/// A simulated device instance within a lab.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    /// Controller-assigned node identifier
    pub id: String,
    /// Display label
    #[serde(default)]
    pub label: String,
    /// Device-type tag (e.g. "iosv")
    #[serde(default)]
    pub node_definition: String,
    /// Current node state
    pub state: NodeState,
    /// Requested CPU count
    #[serde(default)]
    pub cpus: Option<u32>,
    /// Requested RAM in MB
    #[serde(default)]
    pub ram: Option<u64>,
    /// Observed utilization, attached by the merger for running labs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub utilization: Option<NodeUtilization>,
}

/// Live per-node utilization from a running simulation.
///
/// Additional simulator-reported fields are preserved verbatim in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeUtilization {
    #[serde(default)]
    pub cpu_usage: f64,
    #[serde(default)]
    pub ram_usage: f64,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Per-lab simulation statistics: a mapping from node id to utilization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SimulationStats {
    #[serde(default)]
    pub nodes: HashMap<String, NodeUtilization>,
}

/// License pool usage on the controller.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Licensing {
    /// Total license count
    #[serde(default)]
    pub quota: u32,
    /// Licenses currently in use
    #[serde(default)]
    pub started: u32,
}

/// Aggregate CPU/memory/disk health of one compute host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputeHost {
    pub hostname: String,
    pub stats: HostStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostStats {
    #[serde(default)]
    pub cpu: CpuStats,
    #[serde(default)]
    pub memory: ByteStats,
    #[serde(default)]
    pub disk: ByteStats,
}

/// CPU count and 1/5/15-minute load averages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CpuStats {
    #[serde(default)]
    pub count: u32,
    #[serde(default)]
    pub load: [f64; 3],
}

/// Total/free/used byte counts for a memory or disk pool.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ByteStats {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub free: u64,
    #[serde(default)]
    pub used: u64,
}

impl ByteStats {
    /// Used fraction as a percentage; zero-capacity pools report 0.0.
    pub fn used_percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.used as f64 / self.total as f64 * 100.0
        }
    }
}

/// Response shape of the controller's system-stats endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SystemStats {
    #[serde(default)]
    pub computes: BTreeMap<String, ComputeHost>,
}

/// Licensing plus the compute-host pool, combined from two independent calls.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SystemSnapshot {
    pub licensing: Option<Licensing>,
    #[serde(default)]
    pub computes: BTreeMap<String, ComputeHost>,
}
