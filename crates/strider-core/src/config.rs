//! Traversal configuration that downstream crates can serialize/deserialize.

use std::num::NonZeroU64;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalConfig {
    /// Append a bulk-compressing step to chains that run on the standard
    /// engine. Off by default so the output stream keeps its raw shape.
    pub coalesce_adjacent: bool,

    /// Largest bulk a coalescing step will fold into one traverser.
    pub max_bulk: u64,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            coalesce_adjacent: false,
            max_bulk: u64::MAX,
        }
    }
}

impl TraversalConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `STRIDER_COALESCE_ADJACENT`: `true`/`false`
    /// - `STRIDER_MAX_BULK`: positive integer
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("STRIDER_COALESCE_ADJACENT") {
            if let Ok(v) = s.parse::<bool>() {
                cfg.coalesce_adjacent = v;
            }
        }

        if let Ok(s) = std::env::var("STRIDER_MAX_BULK") {
            if let Ok(v) = s.parse::<u64>() {
                if v > 0 {
                    cfg.max_bulk = v;
                }
            }
        }

        cfg
    }

    /// Turn coalescing on. A zero cap is kept as given and rejected by
    /// `validate`.
    pub fn with_coalesce(mut self, max_bulk: u64) -> Self {
        self.coalesce_adjacent = true;
        self.max_bulk = max_bulk;
        self
    }

    /// `max_bulk` as a cap a coalescing step can use.
    pub fn bulk_cap(&self) -> Result<NonZeroU64> {
        NonZeroU64::new(self.max_bulk)
            .ok_or_else(|| Error::Config("max_bulk must be at least 1".into()))
    }

    /// Reject settings no traversal can run with.
    pub fn validate(&self) -> Result<()> {
        self.bulk_cap()?;
        Ok(())
    }
}
