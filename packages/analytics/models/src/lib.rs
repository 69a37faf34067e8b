#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Analysis stage artifact types and the consolidated job result.
//!
//! Each of the four pipeline stages produces one of the artifact types in
//! this crate. The worker assembles them into a [`PipelineResult`] and
//! publishes a [`JobResult`] to the result store, where optional stages
//! that were not requested appear as [`StageOutput::NotRequested`]
//! sentinels rather than being omitted.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Granularity of the temporal chart, chosen by the span of the job's
/// date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeGranularity {
    /// Four fixed hour-of-day buckets, for a single-day range.
    Hour,
    /// One bucket per calendar day, for a single-month range.
    Day,
    /// One bucket per month, for a single-year range.
    Month,
    /// One bucket per year, for anything longer.
    Year,
}

impl std::fmt::Display for TimeGranularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hour => write!(f, "hour"),
            Self::Day => write!(f, "day"),
            Self::Month => write!(f, "month"),
            Self::Year => write!(f, "year"),
        }
    }
}

/// Average incident location over the filtered window.
///
/// The averages are `None` when no incidents matched — an empty window is
/// a degraded-but-valid summary, not a fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Number of incidents in the window.
    pub incident_count: u64,
    /// Arithmetic mean latitude of the matching incidents.
    pub average_latitude: Option<f64>,
    /// Arithmetic mean longitude of the matching incidents.
    pub average_longitude: Option<f64>,
}

/// Raw plotting data for the incident map.
///
/// The three sequences are index-aligned, one entry per matching incident,
/// in stable input order with no deduplication.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDataset {
    /// Incident latitudes.
    pub latitudes: Vec<f64>,
    /// Incident longitudes.
    pub longitudes: Vec<f64>,
    /// Incident street addresses.
    pub addresses: Vec<String>,
}

/// A single labeled chart bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeBucket {
    /// Bucket label: a fixed period name for hour granularity, an ISO
    /// period (`2022-01-15`, `2022-01`, `2022`) otherwise.
    pub label: String,
    /// Incident count in this bucket.
    pub count: u64,
}

/// The temporal chart breakdown.
///
/// Buckets cover the whole declared range in chronological order and are
/// pre-initialized to zero, so empty periods are explicit zeros rather
/// than absent entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBuckets {
    /// Bucket granularity chosen for the range.
    pub granularity: TimeGranularity,
    /// All buckets in the range, in chronological order.
    pub buckets: Vec<TimeBucket>,
}

impl ChartBuckets {
    /// Total incidents across every bucket.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

/// One of the nine regions relative to the downtown reference point.
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
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Region {
    /// Within the tolerance band on both axes.
    Downtown,
    /// North of the band, same longitude band.
    North,
    /// South of the band, same longitude band.
    South,
    /// East of the band, same latitude band.
    East,
    /// West of the band, same latitude band.
    West,
    /// North and east of the bands.
    Northeast,
    /// North and west of the bands.
    Northwest,
    /// South and east of the bands.
    Southeast,
    /// South and west of the bands.
    Southwest,
}

impl Region {
    /// All nine regions, in report order.
    pub const ALL: [Self; 9] = [
        Self::Downtown,
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::Northeast,
        Self::Northwest,
        Self::Southeast,
        Self::Southwest,
    ];
}

/// Incident count for a single region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionCount {
    /// The region label.
    pub region: Region,
    /// Number of incidents classified into it.
    pub count: u64,
}

/// Regional distribution of the filtered incidents.
///
/// Every region is always present, zero-defaulted, in [`Region::ALL`]
/// order; the nine counts sum to the filtered incident total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalReport {
    /// Per-region tallies.
    pub regions: Vec<RegionCount>,
}

impl RegionalReport {
    /// Count for one region, zero if somehow absent.
    #[must_use]
    pub fn count_for(&self, region: Region) -> u64 {
        self.regions
            .iter()
            .find(|r| r.region == region)
            .map_or(0, |r| r.count)
    }

    /// Total incidents across every region.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.regions.iter().map(|r| r.count).sum()
    }
}

/// A stage slot in the pipeline result: either the computed artifact or a
/// marker that the job did not request this output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "state", content = "data")]
pub enum StageOutput<T> {
    /// The stage ran and produced this artifact.
    Produced(T),
    /// The job's request flags excluded this stage.
    NotRequested,
}

impl<T> StageOutput<T> {
    /// Returns the artifact if the stage produced one.
    #[must_use]
    pub const fn produced(&self) -> Option<&T> {
        match self {
            Self::Produced(artifact) => Some(artifact),
            Self::NotRequested => None,
        }
    }

    /// Returns `true` for the not-requested sentinel.
    #[must_use]
    pub const fn is_not_requested(&self) -> bool {
        matches!(self, Self::NotRequested)
    }
}

/// The consolidated output of one pipeline run.
///
/// The summary always runs; the other three slots carry sentinels when
/// their request flag was off.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineResult {
    /// Average location and incident count.
    pub summary: Summary,
    /// Spatial map dataset, if requested.
    pub map_dataset: StageOutput<MapDataset>,
    /// Temporal chart breakdown, if requested.
    pub chart: StageOutput<ChartBuckets>,
    /// Regional distribution report, if requested.
    pub regional_report: StageOutput<RegionalReport>,
}

/// The value published to the result store for a finished job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum JobResult {
    /// The pipeline ran to completion.
    Analysis(PipelineResult),
    /// A stage faulted; this best-effort placeholder replaces the tuple.
    Degraded {
        /// Human-readable description of what went wrong.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_all_covers_nine_labels() {
        assert_eq!(Region::ALL.len(), 9);
        assert_eq!(Region::North.to_string(), "NORTH");
        assert_eq!("SOUTHWEST".parse::<Region>().unwrap(), Region::Southwest);
    }

    #[test]
    fn stage_output_sentinel_serializes_with_state_tag() {
        let sentinel: StageOutput<MapDataset> = StageOutput::NotRequested;
        assert_eq!(
            serde_json::to_string(&sentinel).unwrap(),
            "{\"state\":\"notRequested\"}"
        );
        assert!(sentinel.is_not_requested());
        assert!(sentinel.produced().is_none());
    }

    #[test]
    fn degraded_result_round_trips() {
        let result = JobResult::Degraded {
            message: "Data processing was unsuccessful".to_string(),
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"kind\":\"degraded\""));
        let back: JobResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn report_helpers_sum_counts() {
        let report = RegionalReport {
            regions: Region::ALL
                .iter()
                .map(|r| RegionCount {
                    region: *r,
                    count: u64::from(*r == Region::Downtown),
                })
                .collect(),
        };
        assert_eq!(report.count_for(Region::Downtown), 1);
        assert_eq!(report.count_for(Region::Northwest), 0);
        assert_eq!(report.total(), 1);
    }
}
