//! Active/original list maps.

use crate::types::Value;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Summary of what a store currently holds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Keys with an active list.
    pub active_keys: usize,
    /// Keys with a baseline.
    pub original_keys: usize,
    /// Total elements across all active lists.
    pub active_elements: usize,
}

/// Holds the active and original list for every key.
///
/// Reads hand out shallow copies; writes replace the stored list wholesale.
#[derive(Default)]
pub struct ListStore {
    /// Working lists.
    active: RwLock<HashMap<String, Vec<Value>>>,

    /// Baseline snapshots.
    original: RwLock<HashMap<String, Vec<Value>>>,
}

impl ListStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_active(&self, key: &str) -> Option<Vec<Value>> {
        self.active.read().get(key).cloned()
    }

    pub fn get_original(&self, key: &str) -> Option<Vec<Value>> {
        self.original.read().get(key).cloned()
    }

    pub fn set_active(&self, key: &str, list: Vec<Value>) {
        self.active.write().insert(key.to_string(), list);
    }

    pub fn set_original(&self, key: &str, list: Vec<Value>) {
        self.original.write().insert(key.to_string(), list);
    }

    /// Drop the active list only, leaving the baseline in place.
    pub fn remove_active(&self, key: &str) -> Option<Vec<Value>> {
        self.active.write().remove(key)
    }

    /// Remove both lists for a key. Returns the active list, if any.
    pub fn delete(&self, key: &str) -> Option<Vec<Value>> {
        self.original.write().remove(key);
        self.active.write().remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.active.read().contains_key(key)
    }

    /// Keys with an active list, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.active.read().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn stats(&self) -> StoreStats {
        let active = self.active.read();
        StoreStats {
            active_keys: active.len(),
            original_keys: self.original.read().len(),
            active_elements: active.values().map(Vec::len).sum(),
        }
    }
}
