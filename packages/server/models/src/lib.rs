#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the incident map server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the store-level types to allow independent evolution of the API
//! contract.

use incident_map_jobs_models::JobStatus;
use serde::{Deserialize, Serialize};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Body of a job submission.
///
/// Dates are accepted as `MM/DD/YYYY` (the upstream dataset format) or
/// ISO `YYYY-MM-DD`. Omitted flags default to off.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobRequest {
    /// First day of the analysis window.
    pub start_date: String,
    /// Last day of the analysis window.
    pub end_date: String,
    /// Request the spatial map dataset.
    #[serde(default)]
    pub want_map: bool,
    /// Request the temporal chart breakdown.
    #[serde(default)]
    pub want_chart: bool,
    /// Request the regional distribution report.
    #[serde(default)]
    pub want_report: bool,
}

/// Outcome of a bulk data import.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Records written by this import.
    pub imported: usize,
    /// Records in the store after the import.
    pub total: usize,
}

/// Payload returned from the results endpoint while a job has not yet
/// completed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingResult {
    /// The job's current status.
    pub status: JobStatus,
    /// Human-readable explanation.
    pub message: String,
}
