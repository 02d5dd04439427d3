//! Persisted preference records
//!
//! A `PreferenceStore` holds one record type in memory and mirrors it to a
//! single storage key. Both display settings and notification preferences
//! go through this type.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::storage::{Storage, StorageError};

/// A record persisted as one JSON blob under a fixed key.
///
/// Records are expected to use `#[serde(default)]` so that fields missing
/// from a stored blob fall back to their defaults individually.
pub trait Preference: Clone + Default + Serialize + DeserializeOwned {
    /// Storage key for this record
    const STORAGE_KEY: &'static str;

    /// Partial update; `None` fields keep their current value
    type Patch;

    /// Shallow merge: provided fields replace the current ones wholesale.
    fn merge(&mut self, patch: Self::Patch);
}

/// In-memory copy of a preference record plus the storage it lives in.
#[derive(Debug)]
pub struct PreferenceStore<T, S> {
    storage: S,
    current: T,
}

impl<T: Preference, S: Storage> PreferenceStore<T, S> {
    /// Load the record from storage, falling back to defaults.
    ///
    /// Never fails: an absent, unreadable or malformed blob yields
    /// `T::default()`. A stored field with an unusable value (`null`, wrong
    /// type) falls back to its own default; the other fields are kept.
    pub fn load(storage: S) -> Self {
        let current = Self::read(&storage);
        Self { storage, current }
    }

    fn read(storage: &S) -> T {
        match storage.get_item(T::STORAGE_KEY) {
            Ok(Some(blob)) => match Self::parse_fields(&blob) {
                Ok(value) => value,
                Err(e) => {
                    log::warn!("discarding malformed '{}' blob: {}", T::STORAGE_KEY, e);
                    T::default()
                }
            },
            Ok(None) => T::default(),
            Err(e) => {
                log::warn!("could not read '{}': {}", T::STORAGE_KEY, e);
                T::default()
            }
        }
    }

    /// Merge the stored fields over the defaults one at a time, skipping
    /// any field the record type rejects.
    fn parse_fields(blob: &str) -> Result<T, serde_json::Error> {
        let stored: Map<String, Value> = serde_json::from_str(blob)?;
        let mut merged = match serde_json::to_value(T::default())? {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };

        for (key, value) in stored {
            let previous = merged.insert(key.clone(), value);
            if serde_json::from_value::<T>(Value::Object(merged.clone())).is_err() {
                log::warn!("'{}': ignoring unusable field '{}'", T::STORAGE_KEY, key);
                match previous {
                    Some(previous) => merged.insert(key, previous),
                    None => merged.remove(&key),
                };
            }
        }

        serde_json::from_value(Value::Object(merged))
    }

    /// Owned copy of the current record
    pub fn get(&self) -> T {
        self.current.clone()
    }

    pub fn current(&self) -> &T {
        &self.current
    }

    /// Write the full current record under the storage key.
    pub fn save(&mut self) -> Result<(), StorageError> {
        let blob = serde_json::to_string(&self.current)
            .map_err(|e| StorageError::Serialize(e.to_string()))?;
        self.storage.set_item(T::STORAGE_KEY, &blob)
    }

    /// Merge `patch` into the record and persist.
    ///
    /// The in-memory record is updated even when the write fails.
    pub fn update(&mut self, patch: T::Patch) -> Result<(), StorageError> {
        self.current.merge(patch);
        self.save()
    }

    /// Replace the whole record and persist.
    pub fn replace(&mut self, value: T) -> Result<(), StorageError> {
        self.current = value;
        self.save()
    }

    /// Restore defaults and persist.
    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.replace(T::default())
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }
}
