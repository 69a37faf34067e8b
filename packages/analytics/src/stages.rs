//! The four analysis stages.
//!
//! Each stage is a pure function `(range, incidents) → artifact` over the
//! filtered snapshot produced by [`crate::filter::filter_records`]. None
//! of them can fail: an empty slice degrades to zero counts, `None`
//! averages, and zero-filled buckets.

use chrono::{Datelike as _, NaiveDateTime, Timelike as _};
use incident_map_analytics_models::{
    ChartBuckets, MapDataset, Region, RegionCount, RegionalReport, Summary, TimeBucket,
    TimeGranularity,
};
use incident_map_jobs_models::DateRange;

use crate::filter::FilteredIncident;

/// Downtown reference latitude for the regional report.
pub const REFERENCE_LATITUDE: f64 = 30.2672;
/// Downtown reference longitude (west-negative) for the regional report.
pub const REFERENCE_LONGITUDE: f64 = -97.7431;
/// Tolerance band, in degrees, applied independently on each axis.
pub const REGION_TOLERANCE: f64 = 0.01;

/// Computes the average incident location and count over the window.
///
/// An empty window yields count zero with `None` averages instead of a
/// division fault.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(_range: &DateRange, incidents: &[FilteredIncident]) -> Summary {
    if incidents.is_empty() {
        return Summary {
            incident_count: 0,
            average_latitude: None,
            average_longitude: None,
        };
    }

    let count = incidents.len();
    let latitude_sum: f64 = incidents.iter().map(|i| i.latitude).sum();
    let longitude_sum: f64 = incidents.iter().map(|i| i.longitude).sum();

    Summary {
        incident_count: count as u64,
        average_latitude: Some(latitude_sum / count as f64),
        average_longitude: Some(longitude_sum / count as f64),
    }
}

/// Collects the filtered latitude/longitude/address triples in stable
/// input order, without deduplication.
#[must_use]
pub fn map_dataset(_range: &DateRange, incidents: &[FilteredIncident]) -> MapDataset {
    MapDataset {
        latitudes: incidents.iter().map(|i| i.latitude).collect(),
        longitudes: incidents.iter().map(|i| i.longitude).collect(),
        addresses: incidents.iter().map(|i| i.address.clone()).collect(),
    }
}

/// Buckets the filtered incidents over time.
///
/// Granularity follows the elapsed span of the declared range: a
/// single-day range gets the four fixed hour-of-day buckets, a
/// single-month range one bucket per calendar day, a single-year range
/// one per month, anything longer one per year. Every bucket in the span
/// is pre-initialized to zero before counting.
#[must_use]
pub fn chart_buckets(range: &DateRange, incidents: &[FilteredIncident]) -> ChartBuckets {
    let granularity = granularity_for(range);

    let mut buckets: Vec<TimeBucket> = bucket_labels(range, granularity)
        .into_iter()
        .map(|label| TimeBucket { label, count: 0 })
        .collect();

    for incident in incidents {
        let label = bucket_label(granularity, incident.published);
        if let Some(bucket) = buckets.iter_mut().find(|b| b.label == label) {
            bucket.count += 1;
        }
    }

    ChartBuckets {
        granularity,
        buckets,
    }
}

fn granularity_for(range: &DateRange) -> TimeGranularity {
    if range.start == range.end {
        TimeGranularity::Hour
    } else if range.start.year() == range.end.year() && range.start.month() == range.end.month() {
        TimeGranularity::Day
    } else if range.start.year() == range.end.year() {
        TimeGranularity::Month
    } else {
        TimeGranularity::Year
    }
}

/// Hour-of-day bucket names, in display order.
const HOUR_LABELS: [&str; 4] = ["Morning", "Afternoon", "Evening", "Late Night"];

fn bucket_labels(range: &DateRange, granularity: TimeGranularity) -> Vec<String> {
    // An inverted range is an empty window: no buckets to declare.
    if range.start > range.end {
        return Vec::new();
    }

    match granularity {
        TimeGranularity::Hour => HOUR_LABELS.iter().map(ToString::to_string).collect(),
        TimeGranularity::Day => range
            .start
            .iter_days()
            .take_while(|day| *day <= range.end)
            .map(|day| day.format("%Y-%m-%d").to_string())
            .collect(),
        TimeGranularity::Month => {
            let mut labels = Vec::new();
            let (mut year, mut month) = (range.start.year(), range.start.month());
            loop {
                labels.push(format!("{year:04}-{month:02}"));
                if year == range.end.year() && month == range.end.month() {
                    break;
                }
                month += 1;
                if month > 12 {
                    month = 1;
                    year += 1;
                }
            }
            labels
        }
        TimeGranularity::Year => (range.start.year()..=range.end.year())
            .map(|year| format!("{year:04}"))
            .collect(),
    }
}

fn bucket_label(granularity: TimeGranularity, published: NaiveDateTime) -> String {
    match granularity {
        TimeGranularity::Hour => hour_label(published.hour()).to_string(),
        TimeGranularity::Day => published.format("%Y-%m-%d").to_string(),
        TimeGranularity::Month => published.format("%Y-%m").to_string(),
        TimeGranularity::Year => published.format("%Y").to_string(),
    }
}

/// Maps an hour of day onto its fixed bucket. Boundaries belong to the
/// bucket they open: 12:00 is Afternoon, 17:00 is Evening.
const fn hour_label(hour: u32) -> &'static str {
    match hour {
        6..=11 => "Morning",
        12..=16 => "Afternoon",
        17..=21 => "Evening",
        _ => "Late Night",
    }
}

/// Tallies the filtered incidents into the nine fixed regions around the
/// downtown reference point.
///
/// Every region is present in the output, zero-defaulted, so the report
/// always partitions the filtered set.
#[must_use]
pub fn regional_report(_range: &DateRange, incidents: &[FilteredIncident]) -> RegionalReport {
    let mut regions: Vec<RegionCount> = Region::ALL
        .iter()
        .map(|region| RegionCount {
            region: *region,
            count: 0,
        })
        .collect();

    for incident in incidents {
        let region = classify(incident.latitude, incident.longitude);
        if let Some(entry) = regions.iter_mut().find(|r| r.region == region) {
            entry.count += 1;
        }
    }

    RegionalReport { regions }
}

enum LatitudeBand {
    North,
    Same,
    South,
}

enum LongitudeBand {
    East,
    Same,
    West,
}

/// Classifies a point against the reference location. The signed
/// difference on each axis is compared against the tolerance band
/// independently; the same rule applies to both axes.
#[must_use]
pub fn classify(latitude: f64, longitude: f64) -> Region {
    let delta_latitude = latitude - REFERENCE_LATITUDE;
    let delta_longitude = longitude - REFERENCE_LONGITUDE;

    let ns = if delta_latitude > REGION_TOLERANCE {
        LatitudeBand::North
    } else if delta_latitude < -REGION_TOLERANCE {
        LatitudeBand::South
    } else {
        LatitudeBand::Same
    };

    let ew = if delta_longitude > REGION_TOLERANCE {
        LongitudeBand::East
    } else if delta_longitude < -REGION_TOLERANCE {
        LongitudeBand::West
    } else {
        LongitudeBand::Same
    };

    match (ns, ew) {
        (LatitudeBand::Same, LongitudeBand::Same) => Region::Downtown,
        (LatitudeBand::North, LongitudeBand::Same) => Region::North,
        (LatitudeBand::South, LongitudeBand::Same) => Region::South,
        (LatitudeBand::Same, LongitudeBand::East) => Region::East,
        (LatitudeBand::Same, LongitudeBand::West) => Region::West,
        (LatitudeBand::North, LongitudeBand::East) => Region::Northeast,
        (LatitudeBand::North, LongitudeBand::West) => Region::Northwest,
        (LatitudeBand::South, LongitudeBand::East) => Region::Southeast,
        (LatitudeBand::South, LongitudeBand::West) => Region::Southwest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::filter_records;
    use incident_map_incident_models::IncidentRecord;

    fn incident(published: &str, latitude: f64, longitude: f64, address: &str) -> FilteredIncident {
        FilteredIncident {
            published: incident_map_incident_models::parse_published_date(published).unwrap(),
            latitude,
            longitude,
            address: address.to_string(),
        }
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::parse(start, end).unwrap()
    }

    #[test]
    fn summary_of_empty_window_is_degraded_not_a_fault() {
        let summary = summarize(&range("01/15/2022", "01/20/2022"), &[]);
        assert_eq!(summary.incident_count, 0);
        assert!(summary.average_latitude.is_none());
        assert!(summary.average_longitude.is_none());
    }

    #[test]
    fn summary_of_single_point_equals_that_point() {
        let incidents = vec![incident("01/15/2022 10:30:00 AM +0000", 30.27, -97.74, "Main St")];
        let summary = summarize(&range("01/15/2022", "01/15/2022"), &incidents);
        assert_eq!(summary.incident_count, 1);
        assert_eq!(summary.average_latitude, Some(30.27));
        assert_eq!(summary.average_longitude, Some(-97.74));
    }

    #[test]
    fn summary_averages_multiple_points() {
        let incidents = vec![
            incident("01/15/2022", 30.0, -97.0, "A"),
            incident("01/16/2022", 31.0, -98.0, "B"),
        ];
        let summary = summarize(&range("01/15/2022", "01/16/2022"), &incidents);
        assert_eq!(summary.incident_count, 2);
        assert!((summary.average_latitude.unwrap() - 30.5).abs() < 1e-9);
        assert!((summary.average_longitude.unwrap() - -97.5).abs() < 1e-9);
    }

    #[test]
    fn map_dataset_keeps_order_and_duplicates() {
        let incidents = vec![
            incident("01/15/2022", 30.1, -97.1, "First St"),
            incident("01/16/2022", 30.2, -97.2, "Second St"),
            incident("01/17/2022", 30.1, -97.1, "First St"),
        ];
        let dataset = map_dataset(&range("01/15/2022", "01/17/2022"), &incidents);
        assert_eq!(dataset.latitudes, vec![30.1, 30.2, 30.1]);
        assert_eq!(dataset.longitudes, vec![-97.1, -97.2, -97.1]);
        assert_eq!(dataset.addresses, vec!["First St", "Second St", "First St"]);
    }

    #[test]
    fn single_day_range_buckets_by_hour() {
        let incidents = vec![incident("01/15/2022 10:30:00 AM +0000", 30.27, -97.74, "Main St")];
        let chart = chart_buckets(&range("01/15/2022", "01/15/2022"), &incidents);

        assert_eq!(chart.granularity, TimeGranularity::Hour);
        assert_eq!(chart.buckets.len(), 4);
        assert_eq!(chart.buckets[0].label, "Morning");
        assert_eq!(chart.buckets[0].count, 1);
        assert_eq!(chart.total(), 1);
    }

    #[test]
    fn hour_boundaries_open_their_bucket() {
        assert_eq!(hour_label(6), "Morning");
        assert_eq!(hour_label(11), "Morning");
        assert_eq!(hour_label(12), "Afternoon");
        assert_eq!(hour_label(16), "Afternoon");
        assert_eq!(hour_label(17), "Evening");
        assert_eq!(hour_label(21), "Evening");
        assert_eq!(hour_label(22), "Late Night");
        assert_eq!(hour_label(0), "Late Night");
        assert_eq!(hour_label(5), "Late Night");
    }

    #[test]
    fn same_month_range_gets_one_bucket_per_day() {
        let incidents = vec![
            incident("01/15/2022 08:00:00 AM +0000", 30.27, -97.74, "A"),
            incident("01/15/2022 09:00:00 PM +0000", 30.27, -97.74, "B"),
            incident("01/17/2022 01:00:00 PM +0000", 30.27, -97.74, "C"),
        ];
        let chart = chart_buckets(&range("01/14/2022", "01/18/2022"), &incidents);

        assert_eq!(chart.granularity, TimeGranularity::Day);
        let labels: Vec<&str> = chart.buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["2022-01-14", "2022-01-15", "2022-01-16", "2022-01-17", "2022-01-18"]
        );
        let counts: Vec<u64> = chart.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![0, 2, 0, 1, 0]);
    }

    #[test]
    fn same_year_range_gets_one_bucket_per_month() {
        let incidents = vec![incident("03/26/2022 06:23:27 PM +0000", 30.27, -97.74, "A")];
        let chart = chart_buckets(&range("01/01/2022", "04/30/2022"), &incidents);

        assert_eq!(chart.granularity, TimeGranularity::Month);
        let labels: Vec<&str> = chart.buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["2022-01", "2022-02", "2022-03", "2022-04"]);
        assert_eq!(chart.buckets[2].count, 1);
        assert_eq!(chart.total(), 1);
    }

    #[test]
    fn multi_year_range_gets_one_bucket_per_year() {
        let chart = chart_buckets(&range("06/01/2021", "02/01/2023"), &[]);

        assert_eq!(chart.granularity, TimeGranularity::Year);
        let labels: Vec<&str> = chart.buckets.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, vec!["2021", "2022", "2023"]);
        assert!(chart.buckets.iter().all(|b| b.count == 0));
    }

    #[test]
    fn inverted_range_declares_no_buckets() {
        let chart = chart_buckets(&range("01/20/2022", "01/15/2022"), &[]);
        assert!(chart.buckets.is_empty());
    }

    #[test]
    fn classifies_reference_point_as_downtown() {
        assert_eq!(classify(REFERENCE_LATITUDE, REFERENCE_LONGITUDE), Region::Downtown);
        assert_eq!(classify(30.27, -97.74), Region::Downtown);
    }

    #[test]
    fn tolerance_band_needs_more_than_the_tolerance_to_leave() {
        assert_eq!(classify(30.2762, REFERENCE_LONGITUDE), Region::Downtown);
        assert_eq!(classify(30.2783, REFERENCE_LONGITUDE), Region::North);
        assert_eq!(classify(REFERENCE_LATITUDE, -97.7521), Region::Downtown);
        assert_eq!(classify(REFERENCE_LATITUDE, -97.7542), Region::West);
    }

    #[test]
    fn classifies_each_axis_direction() {
        assert_eq!(classify(30.30, REFERENCE_LONGITUDE), Region::North);
        assert_eq!(classify(30.20, REFERENCE_LONGITUDE), Region::South);
        assert_eq!(classify(REFERENCE_LATITUDE, -97.70), Region::East);
        assert_eq!(classify(REFERENCE_LATITUDE, -97.80), Region::West);
        assert_eq!(classify(30.30, -97.70), Region::Northeast);
        assert_eq!(classify(30.30, -97.80), Region::Northwest);
        assert_eq!(classify(30.20, -97.70), Region::Southeast);
        assert_eq!(classify(30.20, -97.80), Region::Southwest);
    }

    #[test]
    fn regional_counts_partition_the_filtered_set() {
        let incidents = vec![
            incident("01/15/2022", 30.27, -97.74, "Downtown"),
            incident("01/15/2022", 30.40, -97.74, "North Austin"),
            incident("01/16/2022", 30.10, -97.90, "Far SW"),
            incident("01/17/2022", 30.27, -97.60, "East side"),
        ];
        let report = regional_report(&range("01/15/2022", "01/17/2022"), &incidents);

        assert_eq!(report.regions.len(), 9);
        assert_eq!(report.total(), incidents.len() as u64);
        assert_eq!(report.count_for(Region::Downtown), 1);
        assert_eq!(report.count_for(Region::North), 1);
        assert_eq!(report.count_for(Region::Southwest), 1);
        assert_eq!(report.count_for(Region::East), 1);
    }

    #[test]
    fn empty_window_report_has_all_nine_regions_at_zero() {
        let report = regional_report(&range("01/15/2022", "01/20/2022"), &[]);
        assert_eq!(report.regions.len(), 9);
        assert!(report.regions.iter().all(|r| r.count == 0));
    }

    #[test]
    fn stages_are_deterministic_over_the_same_snapshot() {
        let records = vec![
            IncidentRecord {
                traffic_report_id: "a".to_string(),
                published_date: "01/15/2022 10:30:00 AM +0000".to_string(),
                latitude: 30.27,
                longitude: -97.74,
                address: "Main St".to_string(),
            },
            IncidentRecord {
                traffic_report_id: "b".to_string(),
                published_date: "01/16/2022 08:00:00 PM +0000".to_string(),
                latitude: 30.40,
                longitude: -97.70,
                address: "Far North".to_string(),
            },
        ];
        let window = range("01/15/2022", "01/16/2022");

        let first = filter_records(&window, &records).unwrap();
        let second = filter_records(&window, &records).unwrap();

        assert_eq!(summarize(&window, &first), summarize(&window, &second));
        assert_eq!(chart_buckets(&window, &first), chart_buckets(&window, &second));
        assert_eq!(
            regional_report(&window, &first),
            regional_report(&window, &second)
        );
    }
}
