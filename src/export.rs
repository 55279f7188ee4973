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

//! JSON export of the fetched collections.
//!
//! Each file is an independent unit of work: a failed write is logged and
//! recorded, and the remaining files are still attempted.

use crate::domain::{ExportError, Lab, Node, SystemSnapshot};
use log::{error, info};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

pub const LABS_FILE: &str = "labs.json";
pub const NODES_FILE: &str = "nodes.json";
pub const SYSTEM_FILE: &str = "system.json";

/// Serialize one collection to a pretty-printed JSON file.
async fn write_json<T: Serialize>(dir: &Path, file: &str, data: &T) -> Result<(), ExportError> {
    let json = serde_json::to_string_pretty(data).map_err(|e| ExportError::Serialize {
        file: file.to_string(),
        reason: e.to_string(),
    })?;

    fs::write(dir.join(file), json)
        .await
        .map_err(|e| ExportError::Write {
            file: file.to_string(),
            reason: e.to_string(),
        })?;

    info!("exported {}", file);
    Ok(())
}

/// Write `labs.json`, `nodes.json`, and `system.json` into `dir`.
///
/// Skipped branches export their empty defaults, which still produce valid
/// JSON documents. Returns the failures that occurred, one per file at most.
pub async fn export_all(
    dir: &Path,
    labs: &[Lab],
    nodes: &HashMap<String, Node>,
    system: &SystemSnapshot,
) -> Vec<ExportError> {
    let mut failures = Vec::new();

    if let Err(e) = write_json(dir, LABS_FILE, &labs).await {
        error!("{}", e);
        failures.push(e);
    }
    if let Err(e) = write_json(dir, NODES_FILE, &nodes).await {
        error!("{}", e);
        failures.push(e);
    }
    if let Err(e) = write_json(dir, SYSTEM_FILE, &system).await {
        error!("{}", e);
        failures.push(e);
    }

    failures
}
