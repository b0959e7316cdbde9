#![forbid(unsafe_code)]
//! strider-steps: the pull-based step chain and the built-in steps.
//!
//! Design intent:
//! - Steps are lazy and synchronous; a consumer drives the whole chain by
//!   pulling the last step.
//! - Steps never hold references to their neighbours. `Steps` owns the
//!   chain and resolves upstream by position, so rewrites stay cheap.
//! - Source steps are seeded through the `TraverserSource` capability,
//!   either once at lock time or by an external driver.

pub mod empty;
pub mod sequence;
pub mod source;
pub mod traits;

pub mod coalesce;
pub mod filter;
pub mod identity;
pub mod map;
pub mod start;
pub mod store;

pub use empty::{EmptyStep, EMPTY};
pub use sequence::Steps;
pub use source::{TraverserGenerator, TraverserIter, TraverserSource};
pub use traits::{Step, StepBase, Upstream};

pub use coalesce::CoalesceStep;
pub use filter::FilterStep;
pub use identity::IdentityStep;
pub use map::{FlatMapStep, MapStep};
pub use start::{StartInput, StartStep};
pub use store::StoreStep;
