#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Date-range filtering and the four pure analysis stages.
//!
//! Every stage is a pure function with the uniform signature
//! `(range, incidents) → artifact`, operating on a pre-filtered snapshot
//! slice. The worker runs [`filter::filter_records`] once per job and
//! feeds the same slice to each requested stage, so stages never touch a
//! live store and a job's result is fully determined by the snapshot.

pub mod filter;
pub mod stages;

use thiserror::Error;

/// Errors that can occur while preparing records for analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    /// A stored record carries a published date the parser does not
    /// understand. This aborts the job's remaining stages; the worker
    /// publishes a degraded result in place of the tuple.
    #[error("unparseable published date '{value}' on record {id}")]
    BadPublishedDate {
        /// Identifier of the offending record.
        id: String,
        /// The raw date string that failed to parse.
        value: String,
    },
}
