// src/keys.rs

//! In-memory API key store.
//!
//! A flat `name -> secret` table with an optional defaults layer. Callers
//! use [`KeyStore::validate`] to gate whether an automation run may start.
//! Nothing is persisted.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Default)]
struct KeyTable {
    values: BTreeMap<String, String>,
    defaults: BTreeMap<String, String>,
    /// Names explicitly reset: their default is hidden until `set` again.
    masked: BTreeSet<String>,
}

impl KeyTable {
    fn effective(&self, name: &str) -> String {
        if self.masked.contains(name) {
            return String::new();
        }
        self.values
            .get(name)
            .or_else(|| self.defaults.get(name))
            .cloned()
            .unwrap_or_default()
    }
}

/// Shared key store. Clones see the same table.
#[derive(Clone)]
pub struct KeyStore {
    table: Arc<Mutex<KeyTable>>,
    revision: Arc<watch::Sender<u64>>,
}

impl Default for KeyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for KeyStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyStore")
            .field("names", &self.names())
            .field("revision", &*self.revision.borrow())
            .finish_non_exhaustive()
    }
}

impl KeyStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self {
            table: Arc::new(Mutex::new(KeyTable::default())),
            revision: Arc::new(tx),
        }
    }

    /// Store whose `get` falls back to `defaults` for names without a value.
    pub fn with_defaults<I, K, V>(defaults: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        store.lock().defaults = defaults
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        store
    }

    fn lock(&self) -> MutexGuard<'_, KeyTable> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn bump(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    pub fn set(&self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        debug!(key = %name, empty = value.trim().is_empty(), "key updated");
        {
            let mut table = self.lock();
            table.masked.remove(&name);
            table.values.insert(name, value);
        }
        self.bump();
    }

    /// Effective value for `name`, or `""` when unknown or reset.
    pub fn get(&self, name: &str) -> String {
        self.lock().effective(name)
    }

    /// Clear the value for `name` so `get` returns `""`, hiding any default.
    pub fn reset(&self, name: &str) {
        debug!(key = %name, "key reset");
        {
            let mut table = self.lock();
            table.values.remove(name);
            table.masked.insert(name.to_string());
        }
        self.bump();
    }

    /// True iff every name in `required` has a non-blank value.
    pub fn validate<S: AsRef<str>>(&self, required: &[S]) -> bool {
        let table = self.lock();
        required
            .iter()
            .all(|name| !table.effective(name.as_ref()).trim().is_empty())
    }

    /// Names from `required` that fail validation, in the given order.
    pub fn missing<S: AsRef<str>>(&self, required: &[S]) -> Vec<String> {
        let table = self.lock();
        required
            .iter()
            .map(|name| name.as_ref())
            .filter(|name| table.effective(name).trim().is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Every name that has a value or a default, sorted.
    pub fn names(&self) -> Vec<String> {
        let table = self.lock();
        table
            .values
            .keys()
            .chain(table.defaults.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Revision counter bumped on every `set` and `reset`.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }
}
