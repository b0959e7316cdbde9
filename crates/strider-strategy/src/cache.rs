//! Process-wide strategy cache keyed by traversal shape.
//!
//! Each shape type maps to one immutable `TraversalStrategies`. Readers
//! share it through an `Arc`; first use computes it under the write lock,
//! so concurrent first lookups of a shape build it exactly once.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::Lazy;

use crate::rules::{CoalesceStrategy, IdentityRemovalStrategy};
use crate::strategies::TraversalStrategies;

/// A class of traversal sharing one strategy list and generator.
pub trait TraversalShape: 'static {
    /// Strategies installed on first use when nothing was registered.
    ///
    /// Runs under the cache's write lock; must not consult `GlobalCache`.
    fn default_strategies() -> TraversalStrategies;
}

/// Default shape for traversals that do not name one.
#[derive(Debug, Clone, Copy, Default)]
pub struct GraphShape;

impl TraversalShape for GraphShape {
    fn default_strategies() -> TraversalStrategies {
        TraversalStrategies::new()
            .with_strategy(IdentityRemovalStrategy)
            .with_strategy(CoalesceStrategy)
    }
}

type Registry = HashMap<TypeId, Arc<TraversalStrategies>>;

// Values are immutable Arcs, so a poisoned lock still guards a consistent map.
static CACHE: Lazy<RwLock<Registry>> = Lazy::new(|| RwLock::new(HashMap::new()));

pub struct GlobalCache;

impl GlobalCache {
    /// Install `strategies` for shape `S`, replacing any previous entry.
    /// Traversals that already locked keep the list they fetched.
    pub fn register<S: TraversalShape>(strategies: TraversalStrategies) {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            shape = std::any::type_name::<S>(),
            strategies = ?strategies.names(),
            "registering traversal strategies"
        );
        let mut cache = CACHE.write().unwrap_or_else(PoisonError::into_inner);
        cache.insert(TypeId::of::<S>(), Arc::new(strategies));
    }

    /// Strategies for shape `S`, computed from `S::default_strategies` on
    /// first use.
    pub fn strategies<S: TraversalShape>() -> Arc<TraversalStrategies> {
        let key = TypeId::of::<S>();
        {
            let cache = CACHE.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(found) = cache.get(&key) {
                return Arc::clone(found);
            }
        }
        let mut cache = CACHE.write().unwrap_or_else(PoisonError::into_inner);
        let entry = cache.entry(key).or_insert_with(|| {
            #[cfg(feature = "tracing")]
            tracing::debug!(
                shape = std::any::type_name::<S>(),
                "computing default traversal strategies"
            );
            Arc::new(S::default_strategies())
        });
        Arc::clone(entry)
    }

    pub fn is_registered<S: TraversalShape>() -> bool {
        let cache = CACHE.read().unwrap_or_else(PoisonError::into_inner);
        cache.contains_key(&TypeId::of::<S>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::{StrategyContext, TraversalStrategy};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use strider_core::error::Result;
    use strider_steps::sequence::Steps;

    static BUILDS: AtomicUsize = AtomicUsize::new(0);

    struct CountedShape;

    impl TraversalShape for CountedShape {
        fn default_strategies() -> TraversalStrategies {
            BUILDS.fetch_add(1, Ordering::SeqCst);
            TraversalStrategies::new().with_strategy(IdentityRemovalStrategy)
        }
    }

    struct OverriddenShape;

    impl TraversalShape for OverriddenShape {
        fn default_strategies() -> TraversalStrategies {
            TraversalStrategies::new()
        }
    }

    #[derive(Debug)]
    struct Noop;

    impl TraversalStrategy for Noop {
        fn apply(&self, _steps: &mut Steps, _ctx: &StrategyContext<'_>) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn concurrent_first_use_builds_once() {
        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(GlobalCache::strategies::<CountedShape>))
            .collect();
        let lists: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

        assert_eq!(BUILDS.load(Ordering::SeqCst), 1);
        assert!(lists.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn register_overwrites() {
        assert!(GlobalCache::strategies::<OverriddenShape>().is_empty());
        GlobalCache::register::<OverriddenShape>(TraversalStrategies::new().with_strategy(Noop));
        assert!(GlobalCache::is_registered::<OverriddenShape>());
        assert_eq!(GlobalCache::strategies::<OverriddenShape>().names(), vec!["Noop"]);
    }

    #[test]
    fn graph_shape_defaults() {
        let names = GraphShape::default_strategies().names();
        assert_eq!(names, vec!["IdentityRemovalStrategy", "CoalesceStrategy"]);
    }
}
