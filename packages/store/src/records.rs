//! Keyed store of incident records.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use incident_map_incident_models::IncidentRecord;

/// In-process keyed store of incident records.
///
/// The ingestion surface writes; the analysis pipeline only ever reads a
/// point-in-time snapshot via [`RecordStore::all`], so a running job is
/// unaffected by concurrent imports. Keys are the upstream report
/// identifiers; inserting an existing key replaces the record.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: RwLock<BTreeMap<String, IncidentRecord>>,
}

impl RecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a record under its report identifier.
    pub fn insert(&self, record: IncidentRecord) {
        self.write()
            .insert(record.traffic_report_id.clone(), record);
    }

    /// Returns the record stored under `id`, if any.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<IncidentRecord> {
        self.read().get(id).cloned()
    }

    /// Returns every stored report identifier, in key order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    /// Returns a point-in-time snapshot of every record, in key order.
    #[must_use]
    pub fn all(&self) -> Vec<IncidentRecord> {
        self.read().values().cloned().collect()
    }

    /// Removes every record.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Returns `true` if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<String, IncidentRecord>> {
        self.records.read().expect("record store lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<String, IncidentRecord>> {
        self.records.write().expect("record store lock poisoned")
    }
}
