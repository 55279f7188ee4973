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

//! Orchestrator: resolves the requested action set, sequences fetch, merge,
//! report, and export, and reduces the run to an exit status.

use crate::client::ControllerClient;
use crate::domain::{apply_simulation_stats, FetchError, Fetched, SystemSnapshot};
use crate::{export, report};
use log::warn;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;

/// A requested action on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Health,
    Labs,
    All,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "health" => Ok(Action::Health),
            "labs" => Ok(Action::Labs),
            "all" => Ok(Action::All),
            _ => Err("Action must be one of 'health', 'labs', or 'all'".to_string()),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Action::Health => write!(f, "health"),
            Action::Labs => write!(f, "labs"),
            Action::All => write!(f, "all"),
        }
    }
}

/// The two independent report branches implied by the requested actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSet {
    pub health: bool,
    pub labs: bool,
}

impl ActionSet {
    /// Resolve a list of requested actions; `all` implies both branches,
    /// and an empty list defaults to everything.
    pub fn from_actions(actions: &[Action]) -> Self {
        if actions.is_empty() {
            return ActionSet {
                health: true,
                labs: true,
            };
        }
        let mut set = ActionSet {
            health: false,
            labs: false,
        };
        for action in actions {
            match action {
                Action::Health => set.health = true,
                Action::Labs => set.labs = true,
                Action::All => {
                    set.health = true;
                    set.labs = true;
                }
            }
        }
        set
    }
}

/// What a completed run looked like, for exit-code mapping.
#[derive(Debug, Clone, Copy)]
pub struct RunStatus {
    /// At least one fetch came back partial or failed
    pub degraded: bool,
}

/// Execute the requested branches against one controller.
///
/// Authenticates once; an authentication failure is returned as `Err` and
/// nothing else is attempted. The health and lab branches are independent
/// and run concurrently when both are requested. Reports always render
/// whatever was collected; export, if requested, captures the populated
/// collections (empty defaults for skipped branches).
pub async fn run(
    client: &mut ControllerClient,
    username: &str,
    password: &str,
    actions: ActionSet,
    export_data: bool,
) -> Result<RunStatus, FetchError> {
    client.authenticate(username, password).await?;
    let client = &*client;

    let (lab_branch, system_outcome) = tokio::join!(
        async {
            if !actions.labs {
                return None;
            }
            let labs = client.fetch_labs().await;
            let nodes = match labs.data() {
                Some(labs) if !labs.is_empty() => client.fetch_nodes().await,
                _ => Fetched::Complete(HashMap::new()),
            };
            Some((labs, nodes))
        },
        async {
            if !actions.health {
                return None;
            }
            Some(client.fetch_system().await)
        },
    );

    let mut degraded = false;

    let system = match system_outcome {
        Some(outcome) => {
            degraded |= outcome.is_degraded();
            let system = outcome.into_data_or_default();
            println!();
            println!("{}", report::licensing_line(&system));
            println!("{}", report::system_health(&system));
            system
        }
        None => SystemSnapshot::default(),
    };

    let (labs, nodes) = match lab_branch {
        Some((labs_outcome, nodes_outcome)) => {
            degraded |= labs_outcome.is_degraded() || nodes_outcome.is_degraded();
            let labs = labs_outcome.into_data_or_default();
            let mut nodes = nodes_outcome.into_data_or_default();

            for lab in &labs {
                if let Some(stats) = client.fetch_simulation_stats(&lab.id).await {
                    apply_simulation_stats(&mut nodes, &stats);
                }
            }

            println!();
            println!("{}", report::labs_total_line(labs.len()));
            println!("{}", report::labs_summary(client.base_url(), &labs));
            for lab in &labs {
                println!();
                println!("{}", report::lab_heading(lab));
                println!("{}", report::lab_detail(lab, &nodes));
            }
            (labs, nodes)
        }
        None => (Vec::new(), HashMap::new()),
    };

    if export_data {
        let failures = export::export_all(Path::new("."), &labs, &nodes, &system).await;
        if !failures.is_empty() {
            warn!("{} export file(s) failed to write", failures.len());
        }
    }

    Ok(RunStatus { degraded })
}
