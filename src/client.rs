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

//! REST client for the simulation controller.
//!
//! One authentication call yields a bearer token; every later call presents
//! it verbatim in the `Authorization` header. Fetchers never propagate
//! request failures as `Err`; each one returns a [`Fetched`] outcome so the
//! orchestrator can tell a degraded collection from an empty one.

use crate::domain::{
    Fetched, FetchError, Lab, Licensing, Node, SimulationStats, SystemSnapshot, SystemStats,
};
use log::{debug, error, warn};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

/// Versioned path prefix of the controller API.
pub const API_VERSION: &str = "/v0";

/// HTTP client bound to one controller, carrying the bearer token after
/// authentication.
pub struct ControllerClient {
    base_url: String,
    token: String,
    client: reqwest::Client,
}

impl ControllerClient {
    /// Create a client for `server` (host or IP).
    ///
    /// Certificate validation is disabled: controllers commonly run with
    /// self-signed certificates. Every request is bounded by `timeout`.
    pub fn new(server: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| FetchError::Http {
                url: server.to_string(),
                reason: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(ControllerClient {
            base_url: format!("https://{}/api{}", server, API_VERSION),
            token: String::new(),
            client,
        })
    }

    /// The controller API root this client talks to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Exchange credentials for a bearer token.
    ///
    /// Any failure here is fatal to the run: without a token no other call
    /// can be made, so callers must not proceed on `Err`.
    pub async fn authenticate(&mut self, username: &str, password: &str) -> Result<(), FetchError> {
        let url = format!("{}/authenticate", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&serde_json::json!({
                "username": username,
                "password": password,
            }))
            .send()
            .await
            .map_err(|e| FetchError::AuthFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(FetchError::AuthFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        self.token = response
            .json::<String>()
            .await
            .map_err(|e| FetchError::AuthFailed(format!("unexpected token response: {}", e)))?;
        Ok(())
    }

    /// GET a path below the API prefix and decode the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .send()
            .await
            .map_err(|e| FetchError::Http {
                url: url.clone(),
                reason: e.to_string(),
            })?;

        if !response.status().is_success() {
            return Err(FetchError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        response.json::<T>().await.map_err(|e| FetchError::Decode {
            url,
            reason: e.to_string(),
        })
    }

    /// Fetch every lab on the controller, including non-owned ones.
    ///
    /// Lists lab ids first, then pulls detail plus node/link id lists per
    /// lab. The three per-lab requests run concurrently; labs themselves
    /// iterate sequentially, which bounds in-flight requests to three. A lab
    /// whose detail call fails is dropped and recorded; failed node/link
    /// listings degrade to empty lists.
    pub async fn fetch_labs(&self) -> Fetched<Vec<Lab>> {
        let ids: Vec<String> = match self.get_json("/labs?show_all=true").await {
            Ok(ids) => ids,
            Err(e) => {
                error!("failed to list labs: {}", e);
                return Fetched::Failed(e);
            }
        };

        let mut labs = Vec::with_capacity(ids.len());
        let mut errors = Vec::new();
        for id in ids {
            let detail_path = format!("/labs/{}", id);
            let nodes_path = format!("/labs/{}/nodes", id);
            let links_path = format!("/labs/{}/links", id);
            let (detail, node_ids, link_ids) = tokio::join!(
                self.get_json::<Lab>(&detail_path),
                self.get_json::<Vec<String>>(&nodes_path),
                self.get_json::<Vec<String>>(&links_path),
            );

            let mut lab = match detail {
                Ok(lab) => lab,
                Err(e) => {
                    error!("failed to fetch lab {}: {}", id, e);
                    errors.push(e);
                    continue;
                }
            };
            lab.id = id;
            lab.node_ids = node_ids.unwrap_or_else(|e| {
                warn!("failed to fetch node list for lab {}: {}", lab.id, e);
                errors.push(e);
                Vec::new()
            });
            lab.link_ids = link_ids.unwrap_or_else(|e| {
                warn!("failed to fetch link list for lab {}: {}", lab.id, e);
                errors.push(e);
                Vec::new()
            });
            labs.push(lab);
        }

        Fetched::from_parts(labs, errors)
    }

    /// Fetch all nodes across all labs, re-keyed by node id.
    pub async fn fetch_nodes(&self) -> Fetched<HashMap<String, Node>> {
        match self.get_json::<Vec<Node>>("/nodes/").await {
            Ok(nodes) => Fetched::Complete(
                nodes
                    .into_iter()
                    .map(|node| (node.id.clone(), node))
                    .collect(),
            ),
            Err(e) => {
                error!("failed to fetch nodes: {}", e);
                Fetched::Failed(e)
            }
        }
    }

    /// Fetch licensing and per-host resource stats into one snapshot.
    ///
    /// The two calls are independent; either may fail without taking the
    /// other down.
    pub async fn fetch_system(&self) -> Fetched<SystemSnapshot> {
        let (licensing, stats) = tokio::join!(
            self.get_json::<Licensing>("/diagnostics/licensing"),
            self.get_json::<SystemStats>("/system_stats"),
        );

        let mut errors = Vec::new();
        let licensing = match licensing {
            Ok(licensing) => Some(licensing),
            Err(e) => {
                error!("failed to fetch licensing: {}", e);
                errors.push(e);
                None
            }
        };
        let computes = match stats {
            Ok(stats) => stats.computes,
            Err(e) => {
                error!("failed to fetch system stats: {}", e);
                errors.push(e);
                Default::default()
            }
        };

        if licensing.is_none() && computes.is_empty() && errors.len() == 2 {
            return Fetched::Failed(errors.remove(0));
        }
        Fetched::from_parts(SystemSnapshot { licensing, computes }, errors)
    }

    /// Fetch live simulation statistics for one lab.
    ///
    /// Stats are only meaningful for started labs; callers treat a failure
    /// here as "no simulation data", not as a degraded run.
    pub async fn fetch_simulation_stats(&self, lab_id: &str) -> Option<SimulationStats> {
        match self
            .get_json::<SimulationStats>(&format!("/labs/{}/simulation_stats", lab_id))
            .await
        {
            Ok(stats) => Some(stats),
            Err(e) => {
                debug!("no simulation stats for lab {}: {}", lab_id, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_carries_api_prefix() {
        let client = ControllerClient::new("192.0.2.1", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url, "https://192.0.2.1/api/v0");
    }

    #[tokio::test]
    async fn test_authenticate_failure_yields_auth_error() {
        // Nothing listens on this port; the credential exchange must come
        // back as AuthFailed, never as a usable empty token.
        let mut client = ControllerClient::new("127.0.0.1:1", Duration::from_secs(5)).unwrap();
        let result = client.authenticate("admin", "admin").await;
        assert!(matches!(result, Err(FetchError::AuthFailed(_))));
        assert!(client.token.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_labs_failure_is_failed_outcome() {
        let client = ControllerClient::new("127.0.0.1:1", Duration::from_secs(5)).unwrap();
        let outcome = client.fetch_labs().await;
        assert!(outcome.is_degraded());
        assert!(outcome.data().is_none());
    }
}
