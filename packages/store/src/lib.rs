#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Concurrent keyed stores and the work queue for analysis jobs.
//!
//! Four logically separate stores back the job system: incident records
//! (read-only to workers), job descriptors, published results, and the
//! queue of job identifiers awaiting a worker. All of them are safe for
//! concurrent multi-writer access across the submission surface and the
//! worker pool; conflict resolution is last-write-wins with no
//! cross-field transactions.

pub mod jobs;
pub mod queue;
pub mod records;
pub mod results;

pub use jobs::JobStore;
pub use queue::WorkQueue;
pub use records::RecordStore;
pub use results::ResultStore;

use thiserror::Error;

/// Errors surfaced by the stores.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No job descriptor exists under this identifier.
    #[error("unknown job ID: {0}")]
    JobNotFound(String),

    /// No result has been published under this identifier. Before a job
    /// completes this means "not yet available", which the query surface
    /// distinguishes from a missing job by checking status first.
    #[error("no result for job ID: {0}")]
    ResultNotFound(String),
}
