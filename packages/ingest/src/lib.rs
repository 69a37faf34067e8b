#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Bulk import of traffic incident records from the upstream CSV export.
//!
//! The upstream open-data portal publishes the incident dataset as a CSV
//! download. This crate maps its column headers onto [`IncidentRecord`]s
//! and loads them into the record store. Rows without usable coordinates
//! are skipped with a warning rather than failing the whole import.

use std::io::Read;

use incident_map_incident_models::IncidentRecord;
use incident_map_store::RecordStore;
use thiserror::Error;

/// Default upstream export URL (Austin open-data portal).
pub const DEFAULT_DATA_URL: &str =
    "https://data.austintexas.gov/api/views/dx9v-zd7x/rows.csv?accessType=DOWNLOAD";

const COL_ID: &str = "Traffic Report ID";
const COL_PUBLISHED: &str = "Published Date";
const COL_LATITUDE: &str = "Latitude";
const COL_LONGITUDE: &str = "Longitude";
const COL_ADDRESS: &str = "Address";

/// Errors that can occur during a bulk import.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The upstream download failed.
    #[error("download failed: {0}")]
    Download(#[from] reqwest::Error),

    /// The CSV body could not be read.
    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is missing from the CSV header row.
    #[error("missing column '{0}' in CSV header")]
    MissingColumn(&'static str),
}

/// Parses the upstream CSV export into incident records.
///
/// Rows whose latitude or longitude is missing, unparseable, or zero
/// (the portal's marker for un-geocoded incidents) are skipped with a
/// warning.
///
/// # Errors
///
/// Returns [`IngestError`] if the header row lacks a required column or
/// the CSV itself is malformed.
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<IncidentRecord>, IngestError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();

    let id_idx = column(&headers, COL_ID)?;
    let published_idx = column(&headers, COL_PUBLISHED)?;
    let latitude_idx = column(&headers, COL_LATITUDE)?;
    let longitude_idx = column(&headers, COL_LONGITUDE)?;
    let address_idx = column(&headers, COL_ADDRESS)?;

    let mut records = Vec::new();
    let mut skipped: u64 = 0;

    for row in reader.records() {
        let row = row?;
        let id = row.get(id_idx).unwrap_or_default();

        let Some((latitude, longitude)) =
            parse_lat_lng(row.get(latitude_idx), row.get(longitude_idx))
        else {
            skipped += 1;
            log::warn!("Skipping record {id}: no usable coordinates");
            continue;
        };

        records.push(IncidentRecord {
            traffic_report_id: id.to_string(),
            published_date: row.get(published_idx).unwrap_or_default().to_string(),
            latitude,
            longitude,
            address: row.get(address_idx).unwrap_or_default().to_string(),
        });
    }

    log::info!(
        "Parsed {count} records from CSV ({skipped} skipped)",
        count = records.len()
    );
    Ok(records)
}

/// Downloads the upstream CSV export and parses it.
///
/// # Errors
///
/// Returns [`IngestError`] if the download or the parse fails.
pub async fn fetch_csv(url: &str) -> Result<Vec<IncidentRecord>, IngestError> {
    log::info!("Downloading incident dataset from {url}");
    let body = reqwest::get(url)
        .await?
        .error_for_status()?
        .text()
        .await?;
    parse_csv(body.as_bytes())
}

/// Loads records into the store, replacing any with the same identifier.
/// Returns the number of records written.
pub fn import_records(store: &RecordStore, records: Vec<IncidentRecord>) -> usize {
    let count = records.len();
    for record in records {
        store.insert(record);
    }
    log::info!(
        "Imported {count} records (store now holds {total})",
        total = store.len()
    );
    count
}

fn column(headers: &csv::StringRecord, name: &'static str) -> Result<usize, IngestError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or(IngestError::MissingColumn(name))
}

/// Parses lat/lng from optional string fields. Returns `None` if missing,
/// unparseable, or zero.
fn parse_lat_lng(lat: Option<&str>, lng: Option<&str>) -> Option<(f64, f64)> {
    let latitude = lat?.trim().parse::<f64>().ok()?;
    let longitude = lng?.trim().parse::<f64>().ok()?;
    if latitude == 0.0 || longitude == 0.0 {
        return None;
    }
    Some((latitude, longitude))
}
