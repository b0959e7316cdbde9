//! Per-traversal named-variable bag.
//!
//! One `SideEffects` belongs to exactly one traversal instance and is shared
//! by all of its steps through the pull chain. Values are owned, so `clone`
//! is an independent deep copy; only immutable suppliers and the external
//! data-source handle are shared between copies.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::source::DataSource;
use crate::value::Value;

/// Lazily produces the initial value of a side effect.
pub type Supplier = Arc<dyn Fn() -> Value + Send + Sync>;

#[derive(Clone, Default)]
pub struct SideEffects {
    values: BTreeMap<String, Value>,
    suppliers: BTreeMap<String, Supplier>,
    source: Option<Arc<dyn DataSource>>,
}

impl SideEffects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key`, returning the previous value if any.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.values.get_mut(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    /// True if `key` holds a value or can be created by a supplier.
    pub fn exists(&self, key: &str) -> bool {
        self.values.contains_key(key) || self.suppliers.contains_key(key)
    }

    /// Materialized and supplier-backed keys, sorted.
    pub fn keys(&self) -> BTreeSet<&str> {
        self.values
            .keys()
            .chain(self.suppliers.keys())
            .map(String::as_str)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn register_supplier(
        &mut self,
        key: impl Into<String>,
        supplier: impl Fn() -> Value + Send + Sync + 'static,
    ) {
        self.suppliers.insert(key.into(), Arc::new(supplier));
    }

    /// Return the value under `key`, materializing it from its supplier
    /// on first access. `None` if neither exists.
    pub fn get_or_create(&mut self, key: &str) -> Option<&mut Value> {
        if !self.values.contains_key(key) {
            let supplier = self.suppliers.get(key)?;
            let initial = supplier();
            self.values.insert(key.to_string(), initial);
        }
        self.values.get_mut(key)
    }

    /// Append `times` copies of `value` to the list stored under `key`.
    ///
    /// A missing key starts from its supplier, or from an empty list.
    pub fn append(&mut self, key: &str, value: Value, times: u64) -> Result<()> {
        let times = usize::try_from(times)
            .map_err(|_| Error::Step(format!("cannot append {times} copies to '{key}'")))?;
        self.get_or_create(key);
        let slot = self
            .values
            .entry(key.to_string())
            .or_insert_with(|| Value::List(Vec::new()));
        match slot {
            Value::List(items) => {
                items.extend(std::iter::repeat(value).take(times));
                Ok(())
            }
            other => Err(Error::Step(format!(
                "side effect '{key}' holds {other}, not a list"
            ))),
        }
    }

    pub fn set_source(&mut self, source: Arc<dyn DataSource>) {
        self.source = Some(source);
    }

    pub fn source(&self) -> Option<&Arc<dyn DataSource>> {
        self.source.as_ref()
    }

    pub fn require_source(&self) -> Result<&Arc<dyn DataSource>> {
        self.source
            .as_ref()
            .ok_or_else(|| Error::Source("no data source bound to this traversal".into()))
    }
}

impl fmt::Debug for SideEffects {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SideEffects")
            .field("values", &self.values)
            .field("suppliers", &self.suppliers.keys().collect::<Vec<_>>())
            .field("source", &self.source.as_ref().map(|s| s.name().to_string()))
            .finish()
    }
}
