//! Per-widget settings seam.
//!
//! Settings live outside this crate (the product keeps them in the user's
//! JSON preferences blob). The store is injected so the draft layer can
//! request deletions without knowing where settings actually live, and so
//! tests can observe exactly which keys get deleted.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;

use crate::instance::InstanceId;

/// External settings store, keyed by full instance id for multi-instance
/// children and by type id for singletons.
pub trait SettingsStore {
    /// Drop the settings of exactly this instance. Fire-and-forget; absent
    /// keys are not an error.
    fn delete_instance_settings(&self, id: &InstanceId);

    fn get(&self, key: &str) -> Option<Value>;

    fn set(&self, key: &str, values: Value);
}

/// In-memory implementation, the default for tests and offline sessions.
#[derive(Default)]
pub struct MemorySettings {
    values: RefCell<HashMap<String, Value>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }
}

impl SettingsStore for MemorySettings {
    fn delete_instance_settings(&self, id: &InstanceId) {
        self.values.borrow_mut().remove(id.as_str());
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, values: Value) {
        self.values.borrow_mut().insert(key.to_string(), values);
    }
}
