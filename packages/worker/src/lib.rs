#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Worker pool that drains the job queue and runs the analysis pipeline.
//!
//! Each worker is an independent task looping on a blocking dequeue:
//! accept a job identifier, mark the job in progress, run the requested
//! stages over a record snapshot, publish the consolidated result, mark
//! the job complete, repeat. A fault inside the pipeline degrades that
//! one job and never takes the worker loop down; duplicate delivery of
//! an identifier is harmless because processing is idempotent.

use std::sync::Arc;

use incident_map_analytics::filter::filter_records;
use incident_map_analytics::{AnalyticsError, stages};
use incident_map_analytics_models::{JobResult, PipelineResult, StageOutput};
use incident_map_jobs_models::{JobDescriptor, JobStatus};
use incident_map_store::{JobStore, RecordStore, ResultStore, WorkQueue};

/// Shared handles a worker needs to process jobs.
///
/// Cloning is cheap; every clone operates on the same underlying stores
/// and queue.
#[derive(Clone)]
pub struct Dispatcher {
    records: Arc<RecordStore>,
    jobs: Arc<JobStore>,
    results: Arc<ResultStore>,
    queue: WorkQueue,
}

impl Dispatcher {
    /// Bundles the stores and queue into a dispatcher.
    #[must_use]
    pub const fn new(
        records: Arc<RecordStore>,
        jobs: Arc<JobStore>,
        results: Arc<ResultStore>,
        queue: WorkQueue,
    ) -> Self {
        Self {
            records,
            jobs,
            results,
            queue,
        }
    }

    /// Runs the worker loop: block on the queue, process, repeat, until
    /// the queue is closed and drained.
    pub async fn run(&self) {
        while let Some(job_id) = self.queue.dequeue().await {
            self.process(&job_id);
        }
        log::info!("Work queue closed; worker exiting");
    }

    /// Processes one queued job identifier end to end.
    ///
    /// An identifier with no descriptor behind it is logged and skipped.
    /// Everything else finishes `Complete`: either with the full pipeline
    /// tuple or, when a stage faults, with a degraded placeholder result.
    pub fn process(&self, job_id: &str) {
        let descriptor = match self.jobs.get(job_id) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                log::warn!("Skipping queued job: {e}");
                return;
            }
        };

        if let Err(e) = self.jobs.set_status(job_id, JobStatus::InProgress) {
            log::warn!("Job {job_id} vanished before processing: {e}");
            return;
        }
        log::info!("Worker accepted job {job_id}");

        let result = match self.run_pipeline(&descriptor) {
            Ok(pipeline) => JobResult::Analysis(pipeline),
            Err(e) => {
                log::warn!("Job {job_id} degraded: {e}");
                JobResult::Degraded {
                    message: format!("Data processing was unsuccessful: {e}"),
                }
            }
        };

        self.results.post(job_id, result);
        if let Err(e) = self.jobs.set_status(job_id, JobStatus::Complete) {
            log::warn!("Could not mark job {job_id} complete: {e}");
        }
        log::info!("Worker finished job {job_id}");
    }

    /// Runs the requested stages over a point-in-time record snapshot.
    ///
    /// The filter runs once; the summary stage always runs; the other
    /// three run only when their flag is set, leaving the not-requested
    /// sentinel otherwise.
    fn run_pipeline(&self, job: &JobDescriptor) -> Result<PipelineResult, AnalyticsError> {
        let snapshot = self.records.all();
        let incidents = filter_records(&job.range, &snapshot)?;

        let summary = stages::summarize(&job.range, &incidents);

        let map_dataset = if job.request.map {
            StageOutput::Produced(stages::map_dataset(&job.range, &incidents))
        } else {
            StageOutput::NotRequested
        };

        let chart = if job.request.chart {
            StageOutput::Produced(stages::chart_buckets(&job.range, &incidents))
        } else {
            StageOutput::NotRequested
        };

        let regional_report = if job.request.report {
            StageOutput::Produced(stages::regional_report(&job.range, &incidents))
        } else {
            StageOutput::NotRequested
        };

        Ok(PipelineResult {
            summary,
            map_dataset,
            chart,
            regional_report,
        })
    }
}

/// Pool of worker tasks draining the work queue.
///
/// Workers share no memory beyond the stores and queue inside their
/// dispatcher; jobs complete in no particular order across workers.
pub struct WorkerPool {
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `size` workers onto the current runtime.
    #[must_use]
    pub fn spawn(size: usize, dispatcher: &Dispatcher) -> Self {
        let handles = (0..size)
            .map(|index| {
                let dispatcher = dispatcher.clone();
                tokio::spawn(async move {
                    log::debug!("Worker {index} started");
                    dispatcher.run().await;
                })
            })
            .collect();
        log::info!("Spawned {size} workers");
        Self { handles }
    }

    /// Number of workers in the pool.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Returns `true` if the pool has no workers.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits for every worker to exit. Close the queue first, or this
    /// waits forever.
    pub async fn join(self) {
        for handle in self.handles {
            handle.await.ok();
        }
    }
}
