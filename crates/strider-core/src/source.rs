//! Data-source seam.
//!
//! The engine never interprets the data source; it only threads a handle to
//! source steps, which ask it for an iterator of raw values. Errors raised by
//! the iterator flow through the pull chain unmodified.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{Error, Result};
use crate::value::Value;

/// Raw input stream handed to a source step.
pub type ValueIter = Box<dyn Iterator<Item = Result<Value>> + Send>;

/// External data source (graph store, table, ...).
pub trait DataSource: Send + Sync + fmt::Debug {
    /// Stable name for logging.
    fn name(&self) -> &str;

    /// Open a fresh scan over the values stored under `key`.
    fn scan(&self, key: &str) -> Result<ValueIter>;
}

/// Thread-safe in-memory data source, mostly for tests and embedding.
#[derive(Clone, Default)]
pub struct MemorySource {
    data: Arc<RwLock<HashMap<String, Vec<Value>>>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate values for a key.
    pub fn insert(&self, key: impl Into<String>, values: Vec<Value>) {
        let mut data = self.data.write().unwrap_or_else(PoisonError::into_inner);
        data.insert(key.into(), values);
    }

    pub fn contains(&self, key: &str) -> bool {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        data.contains_key(key)
    }

    pub fn len(&self) -> usize {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for MemorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemorySource")
            .field("keys", &self.len())
            .finish()
    }
}

impl DataSource for MemorySource {
    fn name(&self) -> &str {
        "memory"
    }

    fn scan(&self, key: &str) -> Result<ValueIter> {
        let data = self.data.read().unwrap_or_else(PoisonError::into_inner);
        let values = data
            .get(key)
            .ok_or_else(|| Error::Source(format!("key not found: {}", key)))?
            .clone();
        // Snapshot at scan time: later inserts do not affect an open scan.
        Ok(Box::new(values.into_iter().map(Ok)))
    }
}
