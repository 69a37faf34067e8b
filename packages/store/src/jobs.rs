//! Keyed store of job descriptors.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use incident_map_jobs_models::{AnalysisRequest, DateRange, JobDescriptor, JobStatus};
use uuid::Uuid;

use crate::StoreError;

/// Canonical store of job descriptors.
///
/// Owns the only durable copy of each descriptor; workers read and
/// advance it through here. Reads always return exactly the last write.
#[derive(Debug, Default)]
pub struct JobStore {
    jobs: RwLock<HashMap<String, JobDescriptor>>,
}

impl JobStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mints a fresh job with a UUID identifier and status `Submitted`,
    /// persists it, and returns the descriptor.
    pub fn create(&self, range: DateRange, request: AnalysisRequest) -> JobDescriptor {
        let descriptor = JobDescriptor {
            id: Uuid::new_v4().to_string(),
            status: JobStatus::Submitted,
            range,
            request,
        };
        log::info!("Created job {id}", id = descriptor.id);
        self.write()
            .insert(descriptor.id.clone(), descriptor.clone());
        descriptor
    }

    /// Returns the descriptor stored under `id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::JobNotFound`] for an unknown identifier.
    pub fn get(&self, id: &str) -> Result<JobDescriptor, StoreError> {
        self.read()
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::JobNotFound(id.to_string()))
    }

    /// Advances the status of job `id`.
    ///
    /// Status only ever moves forward: a write that would regress it
    /// (a re-delivered job that already completed, say) is ignored, which
    /// keeps the observed status monotonic.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::JobNotFound`] for an unknown identifier —
    /// never a silent no-op.
    pub fn set_status(&self, id: &str, status: JobStatus) -> Result<(), StoreError> {
        let mut jobs = self.write();
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| StoreError::JobNotFound(id.to_string()))?;

        if status >= job.status {
            log::debug!("Job {id} status: {old} -> {status}", old = job.status);
            job.status = status;
        } else {
            log::warn!(
                "Ignoring status regression {old} -> {status} for job {id}",
                old = job.status
            );
        }
        Ok(())
    }

    /// Returns every known descriptor, in no particular order.
    #[must_use]
    pub fn list(&self) -> Vec<JobDescriptor> {
        self.read().values().cloned().collect()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, JobDescriptor>> {
        self.jobs.read().expect("job store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, JobDescriptor>> {
        self.jobs.write().expect("job store lock poisoned")
    }
}
