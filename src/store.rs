//! Key-value storage seam shared by the record store and the ledgers.
//!
//! Every persisted structure is one JSON blob under a namespaced key. Readers
//! never fail; missing or corrupted data reads as the default value.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Error, Result};

pub const RECORDS_KEY: &str = "user_quiz_records_v2";
pub const SUBJECT_STATS_KEY: &str = "subject_stats";
pub const SKILL_SCORES_KEY: &str = "skillScores";
pub const USERNAME_KEY: &str = "username";

pub trait KvStore {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;

    fn remove(&self, key: &str) -> Result<()>;
}

impl<S: KvStore + ?Sized> KvStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }
}

/// Read and decode a JSON blob, falling back to `T::default()`.
pub fn load_json<S, T>(store: &S, key: &str) -> T
where
    S: KvStore + ?Sized,
    T: DeserializeOwned + Default,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            log::warn!("could not read '{}', treating as empty: {}", key, e);
            return T::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("discarding malformed data under '{}': {}", key, e);
            T::default()
        }
    }
}

pub fn save_json<S, T>(store: &S, key: &str, value: &T) -> Result<()>
where
    S: KvStore + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let guard = self
            .entries
            .lock()
            .map_err(|e| Error::Unavailable(e.to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| Error::Unavailable(e.to_string()))?;
        guard.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut guard = self
            .entries
            .lock()
            .map_err(|e| Error::Unavailable(e.to_string()))?;
        guard.remove(key);
        Ok(())
    }
}

/// Store used when no persistent environment exists: reads are empty and
/// writes are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct DetachedStore;

impl KvStore for DetachedStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&self, key: &str, _value: &str) -> Result<()> {
        log::debug!("detached store: dropping write to '{}'", key);
        Ok(())
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Ok(())
    }
}
