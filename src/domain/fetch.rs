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

//! Explicit fetch outcomes, so "no data" stays distinguishable from
//! "fetch failed" all the way to the exit code.

use crate::domain::FetchError;

/// Outcome of fetching one collection from the controller.
#[derive(Debug, Clone)]
pub enum Fetched<T> {
    /// Every request behind the collection succeeded. The collection may
    /// still be legitimately empty.
    Complete(T),
    /// The collection is usable but at least one request failed, so entries
    /// may be missing.
    Partial(T, Vec<FetchError>),
    /// Nothing usable was fetched.
    Failed(FetchError),
}

impl<T> Fetched<T> {
    /// Build an outcome from a collection and the errors recorded while
    /// assembling it.
    pub fn from_parts(data: T, errors: Vec<FetchError>) -> Self {
        if errors.is_empty() {
            Fetched::Complete(data)
        } else {
            Fetched::Partial(data, errors)
        }
    }

    /// The fetched data, if any arrived.
    pub fn data(&self) -> Option<&T> {
        match self {
            Fetched::Complete(data) | Fetched::Partial(data, _) => Some(data),
            Fetched::Failed(_) => None,
        }
    }

    /// Mutable access to the fetched data, if any arrived.
    pub fn data_mut(&mut self) -> Option<&mut T> {
        match self {
            Fetched::Complete(data) | Fetched::Partial(data, _) => Some(data),
            Fetched::Failed(_) => None,
        }
    }

    /// True unless every request behind the collection succeeded.
    pub fn is_degraded(&self) -> bool {
        !matches!(self, Fetched::Complete(_))
    }

    /// The errors recorded for this outcome.
    pub fn errors(&self) -> Vec<&FetchError> {
        match self {
            Fetched::Complete(_) => Vec::new(),
            Fetched::Partial(_, errors) => errors.iter().collect(),
            Fetched::Failed(error) => vec![error],
        }
    }
}

impl<T: Default> Fetched<T> {
    /// The fetched data, or the empty default when the fetch failed.
    pub fn into_data_or_default(self) -> T {
        match self {
            Fetched::Complete(data) | Fetched::Partial(data, _) => data,
            Fetched::Failed(_) => T::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_error() -> FetchError {
        FetchError::Status {
            url: "https://cml/api/v0/labs".to_string(),
            status: 500,
        }
    }

    #[test]
    fn test_from_parts_without_errors_is_complete() {
        let outcome = Fetched::from_parts(vec![1, 2], Vec::new());
        assert!(!outcome.is_degraded());
        assert_eq!(outcome.data(), Some(&vec![1, 2]));
        assert!(outcome.errors().is_empty());
    }

    #[test]
    fn test_from_parts_with_errors_is_partial() {
        let outcome = Fetched::from_parts(vec![1], vec![status_error()]);
        assert!(outcome.is_degraded());
        assert_eq!(outcome.data(), Some(&vec![1]));
        assert_eq!(outcome.errors().len(), 1);
    }

    #[test]
    fn test_failed_defaults_to_empty() {
        let outcome: Fetched<Vec<u32>> = Fetched::Failed(status_error());
        assert!(outcome.is_degraded());
        assert!(outcome.data().is_none());
        assert!(outcome.into_data_or_default().is_empty());
    }
}
