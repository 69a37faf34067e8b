//! Keyed store of published job results.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use incident_map_analytics_models::JobResult;

use crate::StoreError;

/// Store of consolidated pipeline outputs, keyed by job identifier.
///
/// `post` has overwrite semantics (last writer wins), which is what makes
/// duplicate delivery of a job harmless: re-running the pipeline just
/// replaces the entry with an identical value.
#[derive(Debug, Default)]
pub struct ResultStore {
    results: RwLock<HashMap<String, JobResult>>,
}

impl ResultStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes the result for `job_id`, replacing any previous entry.
    pub fn post(&self, job_id: &str, result: JobResult) {
        log::info!("Posting result for job {job_id}");
        self.write().insert(job_id.to_string(), result);
    }

    /// Returns the published result for `job_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ResultNotFound`] if nothing has been
    /// published yet.
    pub fn get(&self, job_id: &str) -> Result<JobResult, StoreError> {
        self.read()
            .get(job_id)
            .cloned()
            .ok_or_else(|| StoreError::ResultNotFound(job_id.to_string()))
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, JobResult>> {
        self.results.read().expect("result store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, JobResult>> {
        self.results.write().expect("result store lock poisoned")
    }
}
