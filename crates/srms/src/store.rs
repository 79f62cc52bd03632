//! The student record store.
//!
//! [`RecordStore`] owns the ordered list of records and mirrors it to a
//! single slot of a [`KeyValueStore`] after every mutation. The in-memory list
//! only changes once the durable write has succeeded, so the two never
//! disagree after an operation returns.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::ids::IdGenerator;
use crate::record::{RecordId, StudentFields, StudentRecord};
use crate::storage::KeyValueStore;

/// Slot name used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "srms_data";

/// Write-through store of student records.
#[derive(Debug)]
pub struct RecordStore<S> {
    backend: S,
    key: String,
    records: Vec<StudentRecord>,
    ids: IdGenerator,
}

impl<S: KeyValueStore> RecordStore<S> {
    /// Open a store over `backend` using [`DEFAULT_STORAGE_KEY`].
    pub fn open(backend: S) -> Self {
        Self::open_with_key(backend, DEFAULT_STORAGE_KEY)
    }

    /// Open a store over `backend`, reading and writing the slot `key`.
    ///
    /// Missing or unreadable data starts the store empty.
    pub fn open_with_key(backend: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let records = read_slot(&backend, &key);
        let ids = IdGenerator::starting_after(records.iter().map(|r| r.id).max());
        info!("Loaded {} student records from '{}'", records.len(), key);
        Self {
            backend,
            key,
            records,
            ids,
        }
    }

    /// Read the records currently in durable storage.
    ///
    /// Never fails: a missing slot, unparsable JSON or a storage read error
    /// all yield an empty list. Records repeating an earlier id are dropped.
    #[must_use]
    pub fn load(&self) -> Vec<StudentRecord> {
        read_slot(&self.backend, &self.key)
    }

    /// All records in insertion order.
    #[must_use]
    pub fn all(&self) -> &[StudentRecord] {
        &self.records
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&StudentRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Records whose name contains `query`, ignoring case, in insertion order.
    ///
    /// An empty query matches every record.
    #[must_use]
    pub fn find_by_name(&self, query: &str) -> Vec<&StudentRecord> {
        let needle = query.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.name_contains(&needle))
            .collect()
    }

    /// Append a new record with a fresh id and persist.
    ///
    /// The store does not validate `fields`; that is the caller's job.
    ///
    /// # Errors
    ///
    /// Returns an error if no fresh id is left or the durable write fails.
    /// The record is then not added.
    pub fn add(&mut self, fields: StudentFields) -> Result<StudentRecord> {
        let record = StudentRecord::new(self.ids.next_id()?, fields);

        let mut next = self.records.clone();
        next.push(record.clone());
        self.commit(next)?;

        info!("Added student record {}", record.id);
        Ok(record)
    }

    /// Replace every field of the record `id` except the id itself.
    ///
    /// Returns `None` without writing anything if no such record exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable write fails. The record is then left
    /// unchanged.
    pub fn update(&mut self, id: RecordId, fields: StudentFields) -> Result<Option<StudentRecord>> {
        let Some(index) = self.records.iter().position(|r| r.id == id) else {
            debug!("Update of unknown record {}", id);
            return Ok(None);
        };

        let mut next = self.records.clone();
        next[index].apply(fields);
        let updated = next[index].clone();
        self.commit(next)?;

        info!("Updated student record {}", id);
        Ok(Some(updated))
    }

    /// Remove the record `id` if present.
    ///
    /// Persists whether or not anything was removed and returns whether a
    /// record was actually removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the durable write fails. The record is then kept.
    pub fn remove(&mut self, id: RecordId) -> Result<bool> {
        let mut next = self.records.clone();
        next.retain(|r| r.id != id);
        let removed = next.len() != self.records.len();
        self.commit(next)?;

        if removed {
            info!("Removed student record {}", id);
        } else {
            debug!("Remove of unknown record {}", id);
        }
        Ok(removed)
    }

    /// Write the full in-memory list to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the durable write fails.
    pub fn persist(&mut self) -> Result<()> {
        write_slot(&mut self.backend, &self.key, &self.records)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The storage slot this store reads and writes.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying key-value store.
    #[must_use]
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Summary counts for status output.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        let last_saved = self.backend.updated_at(&self.key).unwrap_or_else(|e| {
            warn!("Could not read save time for '{}': {}", self.key, e);
            None
        });
        StoreStats {
            total_records: self.records.len(),
            with_cgpa: self.records.iter().filter(|r| r.cgpa.is_some()).count(),
            newest_id: self.records.iter().map(|r| r.id).max(),
            last_saved,
        }
    }

    /// Persist `next`, then adopt it as the in-memory list.
    fn commit(&mut self, next: Vec<StudentRecord>) -> Result<()> {
        write_slot(&mut self.backend, &self.key, &next)?;
        self.records = next;
        Ok(())
    }
}

/// Summary of the records in a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreStats {
    /// Number of records.
    pub total_records: usize,
    /// Number of records with a CGPA.
    pub with_cgpa: usize,
    /// Largest id in the store.
    pub newest_id: Option<RecordId>,
    /// When the slot was last written, if known.
    pub last_saved: Option<DateTime<Utc>>,
}

fn read_slot<S: KeyValueStore>(backend: &S, key: &str) -> Vec<StudentRecord> {
    let raw = match backend.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No stored records under '{}'", key);
            return Vec::new();
        }
        Err(e) => {
            warn!("Could not read '{}', starting empty: {}", key, e);
            return Vec::new();
        }
    };

    let records = match serde_json::from_str::<Option<Vec<StudentRecord>>>(&raw) {
        Ok(records) => records.unwrap_or_default(),
        Err(e) => {
            warn!("Stored records under '{}' are malformed, starting empty: {}", key, e);
            return Vec::new();
        }
    };

    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|r| {
            let first = seen.insert(r.id);
            if !first {
                warn!("Dropping stored record with duplicate id {} under '{}'", r.id, key);
            }
            first
        })
        .collect()
}

fn write_slot<S: KeyValueStore>(backend: &mut S, key: &str, records: &[StudentRecord]) -> Result<()> {
    let json = serde_json::to_string(records)?;
    backend.set(key, &json)?;
    debug!("Persisted {} records to '{}'", records.len(), key);
    Ok(())
}
