//! Persisted record collections.
//!
//! A collection is an ordered list of records stored as one JSON document
//! under one storage key. Every mutation loads the whole list, changes it in
//! memory and writes the whole list back. There is no locking: two writers
//! racing on the same key lose the earlier write. That is acceptable for a
//! single user on a single device; per-key sequencing would be needed
//! before allowing background writers.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use thiserror::Error;

use crate::storage::{KeyValueStorage, StorageError};

/// Current payload format version written by `save`
pub const CURRENT_PAYLOAD_VERSION: u32 = 1;

/// Anything stored in a collection: a serializable value with a unique id
pub trait Record: Serialize + DeserializeOwned + Clone {
    fn id(&self) -> &str;
}

/// The storage slot a collection lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    Tasks,
    Exams,
    Courses,
    Assignments,
    GradeCourses,
    Reminders,
    StudySessions,
    Resources,
    StudentProfile,
    ScheduledNotifications,
}

impl CollectionKey {
    pub const ALL: [CollectionKey; 10] = [
        CollectionKey::Tasks,
        CollectionKey::Exams,
        CollectionKey::Courses,
        CollectionKey::Assignments,
        CollectionKey::GradeCourses,
        CollectionKey::Reminders,
        CollectionKey::StudySessions,
        CollectionKey::Resources,
        CollectionKey::StudentProfile,
        CollectionKey::ScheduledNotifications,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CollectionKey::Tasks => "tasks",
            CollectionKey::Exams => "exams",
            CollectionKey::Courses => "courses",
            CollectionKey::Assignments => "assignments",
            CollectionKey::GradeCourses => "gradeCourses",
            CollectionKey::Reminders => "reminders",
            CollectionKey::StudySessions => "studySessions",
            CollectionKey::Resources => "resources",
            CollectionKey::StudentProfile => "studentProfile",
            CollectionKey::ScheduledNotifications => "scheduledNotifications",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    StorageError(#[from] StorageError),
    #[error("Malformed collection payload: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Unsupported payload version {found} (newest supported is {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },
    #[error("Record id already exists: {0}")]
    DuplicateId(String),
}

#[derive(Serialize)]
struct EnvelopeOut<'a, T> {
    version: u32,
    records: &'a [T],
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Payload<T> {
    // Written before payloads carried a version
    Legacy(Vec<T>),
    Versioned {
        #[allow(dead_code)]
        version: u32,
        records: Vec<T>,
    },
}

/// Decode a stored document, accepting both the versioned envelope and a
/// bare legacy array
pub fn decode_payload<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>, StoreError> {
    // Check the version before the records so a newer layout is reported as
    // such instead of as a field mismatch
    let value: serde_json::Value = serde_json::from_str(raw)?;
    if let Some(found) = value.get("version").and_then(|v| v.as_u64()) {
        let found = u32::try_from(found).unwrap_or(u32::MAX);
        if found > CURRENT_PAYLOAD_VERSION {
            return Err(StoreError::UnsupportedVersion {
                found,
                supported: CURRENT_PAYLOAD_VERSION,
            });
        }
    }
    match serde_json::from_value(value)? {
        Payload::Legacy(records) => Ok(records),
        Payload::Versioned { records, .. } => Ok(records),
    }
}

pub fn encode_payload<T: Serialize>(records: &[T]) -> Result<String, StoreError> {
    Ok(serde_json::to_string(&EnvelopeOut {
        version: CURRENT_PAYLOAD_VERSION,
        records,
    })?)
}

/// One named collection over a borrowed storage backend.
///
/// `load`/`save` and the mutations built on them never return errors: a
/// failed read yields an empty collection and a failed write is logged and
/// dropped. Use the `try_` variants to observe failures.
pub struct RecordStore<'a, T: Record> {
    storage: &'a dyn KeyValueStorage,
    key: CollectionKey,
    _marker: PhantomData<T>,
}

impl<'a, T: Record> RecordStore<'a, T> {
    pub fn new(storage: &'a dyn KeyValueStorage, key: CollectionKey) -> Self {
        Self {
            storage,
            key,
            _marker: PhantomData,
        }
    }

    pub fn try_load(&self) -> Result<Vec<T>, StoreError> {
        match self.storage.get_item(self.key.as_str())? {
            Some(raw) => decode_payload(&raw),
            None => Ok(Vec::new()),
        }
    }

    pub fn try_save(&self, records: &[T]) -> Result<(), StoreError> {
        let payload = encode_payload(records)?;
        self.storage.set_item(self.key.as_str(), &payload)?;
        tracing::debug!(collection = %self.key, count = records.len(), "saved collection");
        Ok(())
    }

    /// Load the collection; missing or unreadable data yields an empty list
    pub fn load(&self) -> Vec<T> {
        match self.try_load() {
            Ok(records) => {
                tracing::debug!(collection = %self.key, count = records.len(), "loaded collection");
                records
            }
            Err(e) => {
                tracing::warn!(
                    collection = %self.key,
                    error = %e,
                    "failed to load collection, using empty list"
                );
                Vec::new()
            }
        }
    }

    /// Replace the stored collection. Write failures are logged, not returned.
    pub fn save(&self, records: &[T]) {
        if let Err(e) = self.try_save(records) {
            tracing::error!(collection = %self.key, error = %e, "failed to save collection");
        }
    }

    pub fn get(&self, id: &str) -> Option<T> {
        self.load().into_iter().find(|r| r.id() == id)
    }

    pub fn try_add(&self, record: T) -> Result<Vec<T>, StoreError> {
        let mut records = self.try_load()?;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::DuplicateId(record.id().to_string()));
        }
        records.push(record);
        self.try_save(&records)?;
        Ok(records)
    }

    /// Append a record and persist. Returns the new collection.
    pub fn add(&self, record: T) -> Vec<T> {
        self.append(record).0
    }

    /// Append a record and persist. Returns false if the id was already taken.
    pub fn insert(&self, record: T) -> bool {
        self.append(record).1
    }

    fn append(&self, record: T) -> (Vec<T>, bool) {
        let mut records = self.load();
        if records.iter().any(|r| r.id() == record.id()) {
            tracing::warn!(
                collection = %self.key,
                id = record.id(),
                "refusing record with duplicate id"
            );
            return (records, false);
        }
        records.push(record);
        self.save(&records);
        (records, true)
    }

    /// Apply `patch` to the record with `id` and persist.
    ///
    /// Returns the patched record, or `None` (and writes nothing) if no
    /// record has that id. The id itself cannot be changed by the patch.
    pub fn update<F>(&self, id: &str, patch: F) -> Option<T>
    where
        F: FnOnce(&mut T),
    {
        let mut records = self.load();
        let position = records.iter().position(|r| r.id() == id)?;
        let mut updated = records[position].clone();
        patch(&mut updated);
        if updated.id() != id {
            tracing::warn!(collection = %self.key, id, "patch tried to change record id, ignoring");
            return None;
        }
        records[position] = updated.clone();
        self.save(&records);
        Some(updated)
    }

    /// Replace the record sharing `record`'s id. No-op if absent.
    pub fn replace(&self, record: T) -> Option<T> {
        let id = record.id().to_string();
        self.update(&id, move |r| *r = record)
    }

    /// Remove the record with `id`, keeping the order of the rest.
    /// Returns the removed record if there was one.
    pub fn remove(&self, id: &str) -> Option<T> {
        let records = self.load();
        let removed = records.iter().find(|r| r.id() == id).cloned();
        let kept: Vec<T> = records.into_iter().filter(|r| r.id() != id).collect();
        self.save(&kept);
        removed
    }
}
