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

//! Core domain model: controller entities, fetch outcomes, the utilization
//! merger, and formatting helpers.
//!
//! Everything here is pure and independently testable; network and file I/O
//! live in the client and exporter modules.

pub mod entities;
pub mod errors;
pub mod fetch;
pub mod format;
pub mod merge;

pub use entities::*;
pub use errors::*;
pub use fetch::*;
pub use format::*;
pub use merge::*;
