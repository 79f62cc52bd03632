//! Durable key-value storage for srms.
//!
//! The record store only needs one string slot that survives restarts. This
//! module defines that contract as [`KeyValueStore`] and provides a
//! `SQLite`-backed implementation for real use and a map-backed one for
//! tests and throwaway sessions.

pub mod migrations;
pub mod schema;
mod sqlite;

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::Result;

pub use sqlite::SqliteStore;

/// A durable, string-keyed store of string values.
///
/// `set` replaces the whole value under a key. Implementations must make the
/// write atomic: a later `get` observes either the previous value or the new
/// one, never a mix.
pub trait KeyValueStore {
    /// Read the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value could not be written. The previous value
    /// is then still in place.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// When `key` was last written, if the store tracks it.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing medium cannot be read.
    fn updated_at(&self, _key: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(None)
    }
}

/// Process-local store with no durability.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<String, (String, DateTime<Utc>)>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with `value` already under `key`.
    #[must_use]
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store
            .slots
            .insert(key.to_string(), (value.to_string(), Utc::now()));
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).map(|(value, _)| value.clone()))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots
            .insert(key.to_string(), (value.to_string(), Utc::now()));
        Ok(())
    }

    fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self.slots.get(key).map(|(_, at)| *at))
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        (**self).updated_at(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(store.get("k").unwrap().is_none());

        store.set("k", "v1").unwrap();
        store.set("k", "v2").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v2"));
        assert!(store.updated_at("k").unwrap().is_some());
    }

    #[test]
    fn test_memory_store_with_value() {
        let store = MemoryStore::with_value("srms_data", "[]");
        assert_eq!(store.get("srms_data").unwrap().as_deref(), Some("[]"));
        assert!(store.get("other").unwrap().is_none());
    }

    #[test]
    fn test_boxed_store() {
        let mut store: Box<dyn KeyValueStore> = Box::new(MemoryStore::new());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }

    #[test]
    fn test_default_updated_at_is_none() {
        struct Bare;
        impl KeyValueStore for Bare {
            fn get(&self, _key: &str) -> Result<Option<String>> {
                Ok(None)
            }
            fn set(&mut self, _key: &str, _value: &str) -> Result<()> {
                Ok(())
            }
        }
        assert!(Bare.updated_at("k").unwrap().is_none());
    }
}
