//! The unit of data flowing through a step chain.
//!
//! A traverser stands for `bulk` logically distinct but currently identical
//! occurrences of its value. Bulk is a `NonZeroU64`, so a zero-bulk traverser
//! cannot be constructed; `try_with_bulk` is the checked entry point for
//! counts that come from outside the type system.

use std::hash::{Hash, Hasher};
use std::num::NonZeroU64;

use crate::error::{Error, Result};
use crate::value::Value;

#[derive(Debug, Clone)]
pub struct Traverser<T = Value> {
    value: T,
    bulk: NonZeroU64,
}

impl<T> Traverser<T> {
    /// A single occurrence of `value`.
    pub fn new(value: T) -> Self {
        Self {
            value,
            bulk: NonZeroU64::MIN,
        }
    }

    /// Fails with `InvalidBulk` when `bulk == 0`.
    pub fn try_with_bulk(value: T, bulk: u64) -> Result<Self> {
        let bulk = NonZeroU64::new(bulk).ok_or(Error::InvalidBulk(bulk))?;
        Ok(Self { value, bulk })
    }

    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn bulk(&self) -> u64 {
        self.bulk.get()
    }

    pub fn into_value(self) -> T {
        self.value
    }

    pub fn into_parts(self) -> (T, NonZeroU64) {
        (self.value, self.bulk)
    }

    /// Derive a traverser carrying `value` with this traverser's bulk.
    pub fn split<U>(&self, value: U) -> Traverser<U> {
        Traverser {
            value,
            bulk: self.bulk,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Traverser<U> {
        Traverser {
            value: f(self.value),
            bulk: self.bulk,
        }
    }

    /// Fold `other`'s occurrences into this traverser.
    ///
    /// The caller is responsible for only merging equal values; the payload
    /// of `other` is dropped.
    pub fn merge(&mut self, other: Traverser<T>) -> Result<()> {
        let added = other.bulk.get();
        self.bulk = self
            .bulk
            .checked_add(added)
            .ok_or(Error::BulkOverflow {
                current: self.bulk.get(),
                added,
            })?;
        Ok(())
    }
}

// Identity is the payload alone: two traversers that differ only in bulk are
// duplicates for compression purposes.
impl<T: PartialEq> PartialEq for Traverser<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: Eq> Eq for Traverser<T> {}

impl<T: Hash> Hash for Traverser<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}
