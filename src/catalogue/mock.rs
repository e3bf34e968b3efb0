//! Mock catalogue for testing purposes.

use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

use crate::catalogue::{Catalogue, FetchError};
use crate::models::{AggregatedResult, Record, SearchCriteria};

/// A catalogue that returns a predefined result and records what it was asked.
#[derive(Debug, Default)]
pub struct MockCatalogue {
    response: Mutex<Option<Result<AggregatedResult, FetchError>>>,
    calls: Mutex<Vec<SearchCriteria>>,
}

impl MockCatalogue {
    /// Create a mock that answers every query with an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the result to return.
    pub fn set_response(&self, response: AggregatedResult) {
        *lock(&self.response) = Some(Ok(response));
    }

    /// Make every fetch fail with `error`.
    pub fn set_error(&self, error: FetchError) {
        *lock(&self.response) = Some(Err(error));
    }

    /// Clear the configured response.
    pub fn clear_response(&self) {
        *lock(&self.response) = None;
    }

    /// Criteria of every fetch so far, oldest first.
    pub fn calls(&self) -> Vec<SearchCriteria> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl Catalogue for MockCatalogue {
    fn name(&self) -> &str {
        "Mock Catalogue"
    }

    async fn fetch(&self, criteria: &SearchCriteria) -> Result<AggregatedResult, FetchError> {
        lock(&self.calls).push(criteria.clone());
        match &*lock(&self.response) {
            Some(response) => response.clone(),
            None => Ok(AggregatedResult::default()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Helper function to create a record for testing.
pub fn make_record(uuid: &str, name: &str) -> Record {
    let mut record = Record::new();
    record.insert("uuid".to_string(), uuid.into());
    record.insert("name".to_string(), name.into());
    record
}
