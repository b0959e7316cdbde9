#![forbid(unsafe_code)]
//! strider-strategy: one-shot rewrites applied to a step sequence before it
//! locks, and the process-wide cache that hands them out per traversal shape.
//!
//! Design:
//! - A `TraversalStrategy` rewrites `Steps` in place, conditioned on the
//!   engine tag and the traversal's config.
//! - `TraversalStrategies` keeps them ordered and deduplicated by kind, and
//!   binds the `TraverserGenerator` used to seed source steps.
//! - `GlobalCache` is initialize-once per shape and read-only afterwards.

pub mod cache;
pub mod generator;
pub mod rules;
pub mod strategies;
pub mod strategy;

pub use cache::{GlobalCache, GraphShape, TraversalShape};
pub use generator::SimpleTraverserGenerator;
pub use rules::{CoalesceStrategy, IdentityRemovalStrategy};
pub use strategies::TraversalStrategies;
pub use strategy::{StrategyContext, TraversalEngine, TraversalStrategy};
