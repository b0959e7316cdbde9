//! Ordered, deduplicated strategy collection plus its bound generator.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

use strider_core::error::Result;
use strider_steps::sequence::Steps;
use strider_steps::source::TraverserGenerator;

use crate::generator::SimpleTraverserGenerator;
use crate::strategy::{StrategyContext, TraversalStrategy};

/// Strategies for one traversal shape, applied in registration order.
///
/// Order is part of the contract: strategies are not assumed to commute.
#[derive(Clone)]
pub struct TraversalStrategies {
    strategies: Vec<Arc<dyn TraversalStrategy>>,
    generator: Arc<dyn TraverserGenerator>,
}

impl TraversalStrategies {
    pub fn new() -> Self {
        Self {
            strategies: Vec::new(),
            generator: Arc::new(SimpleTraverserGenerator),
        }
    }

    /// Append `strategy` unless one of the same kind is already present.
    /// Returns whether it was added.
    pub fn add_strategy(&mut self, strategy: impl TraversalStrategy) -> bool {
        self.add_shared(Arc::new(strategy))
    }

    pub fn add_shared(&mut self, strategy: Arc<dyn TraversalStrategy>) -> bool {
        if self.contains_kind(strategy.kind()) {
            return false;
        }
        self.strategies.push(strategy);
        true
    }

    /// Builder form of `add_strategy`.
    pub fn with_strategy(mut self, strategy: impl TraversalStrategy) -> Self {
        self.add_strategy(strategy);
        self
    }

    pub fn with_generator(mut self, generator: impl TraverserGenerator + 'static) -> Self {
        self.generator = Arc::new(generator);
        self
    }

    pub fn contains<T: TraversalStrategy>(&self) -> bool {
        self.contains_kind(TypeId::of::<T>())
    }

    fn contains_kind(&self, kind: TypeId) -> bool {
        self.strategies.iter().any(|s| s.kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn TraversalStrategy> + '_ {
        self.strategies.iter().map(|s| &**s)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn get_traverser_generator(&self) -> Arc<dyn TraverserGenerator> {
        Arc::clone(&self.generator)
    }

    /// Run every strategy eligible for `ctx.engine`, in order.
    ///
    /// Stops at the first failing strategy; the sequence keeps whatever
    /// rewrites ran before it.
    pub fn apply(&self, steps: &mut Steps, ctx: &StrategyContext<'_>) -> Result<()> {
        for strategy in &self.strategies {
            if !strategy.applies_to(ctx.engine) {
                continue;
            }
            #[cfg(feature = "tracing")]
            let before = steps.len();
            strategy.apply(steps, ctx)?;
            #[cfg(feature = "tracing")]
            tracing::trace!(
                strategy = strategy.name(),
                engine = %ctx.engine,
                before,
                after = steps.len(),
                "applied strategy"
            );
        }
        Ok(())
    }
}

impl Default for TraversalStrategies {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TraversalStrategies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TraversalStrategies")
            .field("strategies", &self.names())
            .field("generator", &self.generator)
            .finish()
    }
}
