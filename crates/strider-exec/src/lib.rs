#![forbid(unsafe_code)]
//! strider-exec: the traversal orchestrator and its tracing hooks.
//!
//! A `Traversal` owns one step sequence and one side-effect bag. It is not
//! shared across threads; run the same query concurrently through
//! `try_clone`, one copy per thread.

pub mod metrics;
pub mod traversal;

pub use strider_strategy::TraversalEngine;
pub use traversal::Traversal;
