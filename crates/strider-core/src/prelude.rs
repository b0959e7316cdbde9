//! Convenient re-exports for downstream crates.

pub use crate::config::TraversalConfig;
pub use crate::error::{Error, Result};
pub use crate::hash::Hash256;
pub use crate::id::{ElementId, StepId, TraversalId};
pub use crate::side_effects::SideEffects;
pub use crate::source::{DataSource, MemorySource, ValueIter};
pub use crate::traverser::Traverser;
pub use crate::value::Value;
