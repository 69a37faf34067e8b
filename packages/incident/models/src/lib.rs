#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Traffic incident record types and published-date parsing.
//!
//! Incidents are stored exactly as they arrive from the upstream export:
//! the published date stays in its source string form and is parsed on
//! read by the analysis pipeline, so a malformed date only surfaces when
//! a job actually touches the record.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A single traffic incident as held in the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentRecord {
    /// Unique report identifier from the upstream dataset.
    pub traffic_report_id: String,
    /// Published date in source format, e.g. `01/15/2022 10:30:00 AM +0000`.
    /// The time-of-day component is optional.
    pub published_date: String,
    /// Latitude in WGS84 degrees.
    pub latitude: f64,
    /// Longitude in WGS84 degrees (west-negative).
    pub longitude: f64,
    /// Street address of the incident.
    pub address: String,
}

/// Parses an upstream published date string.
///
/// Tries the full `MM/DD/YYYY hh:mm:ss AM/PM ±zzzz` timestamp first (the
/// offset is always `+0000` in the export, so the result is kept naive),
/// then the same without an offset, then date-only `MM/DD/YYYY`, then
/// ISO `YYYY-MM-DD`. Date-only forms resolve to midnight.
#[must_use]
pub fn parse_published_date(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_str(s, "%m/%d/%Y %I:%M:%S %p %z") {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%m/%d/%Y %I:%M:%S %p") {
        return Some(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%m/%d/%Y") {
        return date.and_hms_opt(0, 0, 0);
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    None
}
