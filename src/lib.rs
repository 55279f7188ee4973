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

//! Lab Report Library
//!
//! Queries a network-simulation controller's REST API for lab topology,
//! node, and compute-host health data, merges per-lab simulation statistics
//! onto the node collection, and renders console reports with optional JSON
//! export.
//!
//! # Architecture
//!
//! - **Domain**: entities, fetch outcomes, the utilization merger, and
//!   formatting helpers; pure and independently testable
//! - **Client**: the authenticated REST client and resource fetchers
//! - **Report**: pure builders from the merged model to console tables
//! - **Export**: JSON serialization of the fetched collections
//! - **App**: the orchestrator sequencing the above
//!
//! # Usage
//!
//! ```rust,no_run
//! use lab_report::{app, ControllerClient};
//! use std::time::Duration;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = ControllerClient::new("192.0.2.1", Duration::from_secs(30))?;
//!     let actions = app::ActionSet { health: true, labs: true };
//!     let status = app::run(&mut client, "admin", "secret", actions, false).await?;
//!     if status.degraded {
//!         eprintln!("some collections are incomplete");
//!     }
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod client;
pub mod domain;
pub mod export;
pub mod report;

pub use client::ControllerClient;
pub use domain::{
    apply_simulation_stats, format_bytes, ComputeHost, ExportError, FetchError, Fetched, Lab,
    LabState, Licensing, Node, NodeState, NodeUtilization, SimulationStats, SystemSnapshot,
};
