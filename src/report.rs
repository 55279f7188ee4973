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

//! Report builders: pure transformations from the merged in-memory model to
//! console tables. Nothing here performs I/O; the orchestrator prints.

use crate::domain::{format_load, format_pool, Lab, Node, SystemSnapshot};
use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::collections::HashMap;

fn base_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
                .collect::<Vec<_>>(),
        );
    table
}

/// Summary line printed above the labs table.
pub fn labs_total_line(count: usize) -> String {
    format!("Total topology labs: {}", count)
}

/// One row per lab, in fetch order. Running labs get a green state cell.
pub fn labs_summary(server: &str, labs: &[Lab]) -> Table {
    let server_column = format!("Labs on {}", server);
    let mut table = base_table(&[
        server_column.as_str(),
        "State",
        "Lab Title",
        "Owner",
        "# Nodes",
        "# Links",
    ]);

    for lab in labs {
        let state_color = if lab.state.is_running() {
            Color::Green
        } else {
            Color::Cyan
        };
        table.add_row(vec![
            Cell::new(&lab.id),
            Cell::new(lab.state.to_string()).fg(state_color),
            Cell::new(&lab.title),
            Cell::new(&lab.owner),
            Cell::new(lab.node_count),
            Cell::new(lab.link_count),
        ]);
    }
    table
}

/// Heading printed above each per-lab detail table.
pub fn lab_heading(lab: &Lab) -> String {
    format!("Lab {} - {}", lab.id, lab.title)
}

/// One row per node of the lab, in the lab's topology order.
///
/// Nodes with no attached utilization render 0.0 for both usage columns. A
/// node id missing from the node collection is a lookup gap, rendered as a
/// placeholder row rather than a fault.
pub fn lab_detail(lab: &Lab, nodes: &HashMap<String, Node>) -> Table {
    let mut table = base_table(&[
        "NodeID",
        "Label",
        "Node Definition",
        "State",
        "CPU REQ",
        "RAM REQ",
        "CPU use",
        "RAM use",
    ]);

    for node_id in &lab.node_ids {
        match nodes.get(node_id) {
            Some(node) => {
                let (cpu_use, ram_use) = node
                    .utilization
                    .as_ref()
                    .map(|util| (util.cpu_usage, util.ram_usage))
                    .unwrap_or((0.0, 0.0));
                let state_color = if node.state.is_booted() {
                    Color::Green
                } else {
                    Color::Cyan
                };
                table.add_row(vec![
                    Cell::new(&node.id),
                    Cell::new(&node.label),
                    Cell::new(&node.node_definition),
                    Cell::new(node.state.to_string()).fg(state_color),
                    Cell::new(node.cpus.unwrap_or(0)),
                    Cell::new(node.ram.unwrap_or(0)),
                    Cell::new(cpu_use),
                    Cell::new(ram_use),
                ]);
            }
            None => {
                table.add_row(vec![
                    Cell::new(node_id),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new(0),
                    Cell::new(0),
                    Cell::new(0.0),
                    Cell::new(0.0),
                ]);
            }
        }
    }
    table
}

/// License quota vs. in-use summary line.
pub fn licensing_line(system: &SystemSnapshot) -> String {
    let licensing = system.licensing.unwrap_or_default();
    format!(
        "Licenses (total / used): {} / {}",
        licensing.quota, licensing.started
    )
}

/// One row per compute host: CPU count, load averages, memory and disk
/// pools with byte counts converted to the largest readable unit.
pub fn system_health(system: &SystemSnapshot) -> Table {
    let mut table = base_table(&[
        "Hostname",
        "# CPUs",
        "CPU Load Avg\n(1min / 5min / 15min)",
        "Memory\nTotal / Free / Used %",
        "Disk Space\nTotal / Free / Used %",
    ]);

    for host in system.computes.values() {
        let memory = &host.stats.memory;
        let disk = &host.stats.disk;
        table.add_row(vec![
            Cell::new(&host.hostname),
            Cell::new(host.stats.cpu.count),
            Cell::new(format_load(&host.stats.cpu.load)),
            Cell::new(format_pool(memory.total, memory.free, memory.used_percent())),
            Cell::new(format_pool(disk.total, disk.free, disk.used_percent())),
        ]);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{apply_simulation_stats, SimulationStats};

    fn demo_lab() -> Lab {
        let mut lab: Lab = serde_json::from_value(serde_json::json!({
            "state": "STARTED",
            "lab_title": "demo",
            "owner_username": "admin",
            "node_count": 1,
            "link_count": 0
        }))
        .unwrap();
        lab.id = "lab1".to_string();
        lab.node_ids = serde_json::from_value(serde_json::json!(["n1"])).unwrap();
        lab
    }

    fn demo_nodes() -> HashMap<String, Node> {
        let node: Node = serde_json::from_value(serde_json::json!({
            "id": "n1",
            "label": "R1",
            "node_definition": "iosv",
            "state": "BOOTED",
            "cpus": 1,
            "ram": 512
        }))
        .unwrap();
        HashMap::from([(node.id.clone(), node)])
    }

    #[test]
    fn test_labs_summary_scenario() {
        let labs = vec![demo_lab()];
        let table = labs_summary("192.0.2.1", &labs);

        let rows: Vec<Vec<String>> = table
            .row_iter()
            .map(|row| row.cell_iter().map(|cell| cell.content()).collect())
            .collect();
        assert_eq!(
            rows,
            vec![vec!["lab1", "STARTED", "demo", "admin", "1", "0"]]
        );
        assert!(table.to_string().contains("Labs on 192.0.2.1"));
        assert_eq!(labs_total_line(labs.len()), "Total topology labs: 1");
    }

    #[test]
    fn test_lab_detail_scenario_with_merged_utilization() {
        let lab = demo_lab();
        let mut nodes = demo_nodes();
        let stats: SimulationStats = serde_json::from_value(serde_json::json!({
            "nodes": { "n1": { "cpu_usage": 12.5, "ram_usage": 30.0 } }
        }))
        .unwrap();
        apply_simulation_stats(&mut nodes, &stats);

        let rendered = lab_detail(&lab, &nodes).to_string();
        assert!(rendered.contains("n1"));
        assert!(rendered.contains("R1"));
        assert!(rendered.contains("iosv"));
        assert!(rendered.contains("12.5"));
        assert!(rendered.contains("30"));
    }

    #[test]
    fn test_lab_detail_defaults_missing_utilization_to_zero() {
        let lab = demo_lab();
        let nodes = demo_nodes();

        let table = lab_detail(&lab, &nodes);
        let rendered = table.to_string();
        assert!(rendered.contains("0"));
        assert_eq!(table.row_iter().count(), 1);
    }

    #[test]
    fn test_lab_detail_with_zero_nodes_has_no_rows() {
        let mut lab = demo_lab();
        lab.node_ids.clear();

        let table = lab_detail(&lab, &demo_nodes());
        assert_eq!(table.row_iter().count(), 0);
    }

    #[test]
    fn test_lab_detail_renders_lookup_gap_as_placeholder() {
        let mut lab = demo_lab();
        lab.node_ids.push("ghost".to_string());

        let table = lab_detail(&lab, &demo_nodes());
        assert_eq!(table.row_iter().count(), 2);
        assert!(table.to_string().contains("ghost"));
    }

    #[test]
    fn test_system_health_report() {
        let system: SystemSnapshot = serde_json::from_value(serde_json::json!({
            "licensing": { "quota": 20, "started": 5 },
            "computes": {
                "c1": {
                    "hostname": "compute-1",
                    "stats": {
                        "cpu": { "count": 16, "load": [1.25, 0.80, 0.50] },
                        "memory": { "total": 2147483648u64, "free": 1073741824u64, "used": 1073741824u64 },
                        "disk": { "total": 1099511627776u64, "free": 549755813888u64, "used": 549755813888u64 }
                    }
                }
            }
        }))
        .unwrap();

        assert_eq!(licensing_line(&system), "Licenses (total / used): 20 / 5");

        let rendered = system_health(&system).to_string();
        assert!(rendered.contains("compute-1"));
        assert!(rendered.contains("16"));
        assert!(rendered.contains("2.0 GB"));
        assert!(rendered.contains("1.0 TB"));
        assert!(rendered.contains("50.0%"));
    }

    #[test]
    fn test_licensing_line_defaults_when_fetch_failed() {
        let system = SystemSnapshot::default();
        assert_eq!(licensing_line(&system), "Licenses (total / used): 0 / 0");
    }
}
