//! The shared date-range filter every stage runs behind.

use chrono::NaiveDateTime;
use incident_map_incident_models::{IncidentRecord, parse_published_date};
use incident_map_jobs_models::DateRange;

use crate::AnalyticsError;

/// An incident that passed the date filter, with its published date
/// parsed once so stages don't re-parse.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredIncident {
    /// Parsed published timestamp (midnight when the source had no
    /// time-of-day).
    pub published: NaiveDateTime,
    /// Latitude in WGS84 degrees.
    pub latitude: f64,
    /// Longitude in WGS84 degrees (west-negative).
    pub longitude: f64,
    /// Street address.
    pub address: String,
}

/// Selects every record whose published calendar date lies in the
/// inclusive range, preserving input order.
///
/// Filtering compares dates only — time-of-day never affects membership,
/// even though it is carried through for the hour-granularity chart.
///
/// # Errors
///
/// Returns [`AnalyticsError::BadPublishedDate`] on the first record whose
/// published date cannot be parsed.
pub fn filter_records(
    range: &DateRange,
    records: &[IncidentRecord],
) -> Result<Vec<FilteredIncident>, AnalyticsError> {
    let mut filtered = Vec::new();

    for record in records {
        let published = parse_published_date(&record.published_date).ok_or_else(|| {
            AnalyticsError::BadPublishedDate {
                id: record.traffic_report_id.clone(),
                value: record.published_date.clone(),
            }
        })?;

        if range.contains(published.date()) {
            filtered.push(FilteredIncident {
                published,
                latitude: record.latitude,
                longitude: record.longitude,
                address: record.address.clone(),
            });
        }
    }

    log::debug!(
        "Filtered {kept} of {total} records into {start}..={end}",
        kept = filtered.len(),
        total = records.len(),
        start = range.start,
        end = range.end,
    );

    Ok(filtered)
}
