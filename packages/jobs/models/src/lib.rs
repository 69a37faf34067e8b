#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Analysis job descriptor, status, and date range types.
//!
//! A job is a single client-submitted analysis request over an inclusive
//! calendar date range, with selectable output stages. These types are the
//! canonical shapes shared by the job store, the worker pool, and the HTTP
//! surface.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;

/// Lifecycle status of an analysis job.
///
/// Transitions are monotonic: `Submitted` → `InProgress` → `Complete`.
/// Variant order defines the ordering used to reject regressions.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum JobStatus {
    /// Created and queued, not yet picked up by a worker.
    Submitted,
    /// A worker has accepted the job and is running the pipeline.
    InProgress,
    /// Terminal: the result (possibly degraded) has been published.
    Complete,
}

/// Error returned when a submitted date string cannot be parsed as a
/// calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed date '{value}': expected MM/DD/YYYY or YYYY-MM-DD")]
pub struct MalformedDate {
    /// The rejected input.
    pub value: String,
}

/// An inclusive calendar date range.
///
/// A range whose start is after its end is tolerated and contains nothing;
/// the upstream submission surface does not reject it, and every pipeline
/// stage degrades cleanly on an empty window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    /// First day of the window.
    pub start: NaiveDate,
    /// Last day of the window.
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range from two dates.
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Parses a range from two client-supplied date strings.
    ///
    /// Each date is tried as `MM/DD/YYYY` (the upstream dataset format)
    /// and then as ISO `YYYY-MM-DD`. Validation happens here, at
    /// submission time — the pipeline never sees an unparsed range.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedDate`] for the first date that matches neither
    /// format.
    pub fn parse(start: &str, end: &str) -> Result<Self, MalformedDate> {
        Ok(Self {
            start: parse_date(start)?,
            end: parse_date(end)?,
        })
    }

    /// Returns `true` if `date` lies within the inclusive range.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, MalformedDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%m/%d/%Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .map_err(|_| MalformedDate {
            value: s.to_string(),
        })
}

/// The output stages a job asks for.
///
/// The summary stage always runs and has no flag here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// Produce the spatial map dataset.
    pub map: bool,
    /// Produce the temporal chart breakdown.
    pub chart: bool,
    /// Produce the regional distribution report.
    pub report: bool,
}

impl AnalysisRequest {
    /// Request with every optional stage enabled.
    #[must_use]
    pub const fn all() -> Self {
        Self {
            map: true,
            chart: true,
            report: true,
        }
    }
}

/// Canonical descriptor of an analysis job, owned by the job store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDescriptor {
    /// Opaque unique identifier, minted at submission.
    pub id: String,
    /// Latest lifecycle status.
    pub status: JobStatus,
    /// The inclusive date window to analyze.
    pub range: DateRange,
    /// Which optional stages to run.
    pub request: AnalysisRequest,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_ordering_is_monotonic() {
        assert!(JobStatus::Submitted < JobStatus::InProgress);
        assert!(JobStatus::InProgress < JobStatus::Complete);
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&JobStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(JobStatus::Complete.to_string(), "complete");
    }

    #[test]
    fn parses_upstream_date_format() {
        let range = DateRange::parse("01/15/2022", "01/20/2022").unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2022, 1, 15).unwrap());
        assert_eq!(range.end, NaiveDate::from_ymd_opt(2022, 1, 20).unwrap());
    }

    #[test]
    fn parses_iso_date_format() {
        let range = DateRange::parse("2022-01-15", "2022-01-20").unwrap();
        assert_eq!(range.start, NaiveDate::from_ymd_opt(2022, 1, 15).unwrap());
    }

    #[test]
    fn rejects_malformed_dates() {
        let err = DateRange::parse("January 15", "01/20/2022").unwrap_err();
        assert_eq!(err.value, "January 15");
        assert!(DateRange::parse("01/15/2022", "2022-13-99").is_err());
    }

    #[test]
    fn contains_is_inclusive_on_both_ends() {
        let range = DateRange::parse("01/15/2022", "01/20/2022").unwrap();
        assert!(range.contains(NaiveDate::from_ymd_opt(2022, 1, 15).unwrap()));
        assert!(range.contains(NaiveDate::from_ymd_opt(2022, 1, 20).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2022, 1, 21).unwrap()));
        assert!(!range.contains(NaiveDate::from_ymd_opt(2022, 1, 14).unwrap()));
    }

    #[test]
    fn inverted_range_contains_nothing() {
        let range = DateRange::parse("01/20/2022", "01/15/2022").unwrap();
        assert!(!range.contains(NaiveDate::from_ymd_opt(2022, 1, 17).unwrap()));
    }
}
