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

use thiserror::Error;

/// Errors raised at the fetch boundary.
///
/// `AuthFailed` is fatal to a run; the other variants degrade the affected
/// collection and are carried inside a [`crate::domain::Fetched`] outcome
/// instead of aborting the pipeline.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// Credential exchange failed; no token is available
    #[error("Authentication failed: {0}")]
    AuthFailed(String),
    /// Network-level failure (connect, timeout, TLS)
    #[error("Request to {url} failed: {reason}")]
    Http { url: String, reason: String },
    /// The controller answered with a non-2xx status
    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    /// The response body did not match the expected schema
    #[error("Malformed response from {url}: {reason}")]
    Decode { url: String, reason: String },
}

/// Errors raised while writing export files.
///
/// Each export file is an independent unit of work; a failure on one file
/// never prevents the others from being written.
#[derive(Debug, Clone, Error)]
pub enum ExportError {
    /// Serialization to JSON failed
    #[error("JSON serialization failed for {file}: {reason}")]
    Serialize { file: String, reason: String },
    /// The file could not be written
    #[error("Failed to write {file}: {reason}")]
    Write { file: String, reason: String },
}
