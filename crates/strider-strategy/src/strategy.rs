//! Rewrite-rule trait and the execution-engine tag strategies are applied for.

use std::any::{Any, TypeId};
use std::fmt;

use strider_core::config::TraversalConfig;
use strider_core::error::Result;
use strider_steps::sequence::Steps;

/// Which runtime will drive a locked traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalEngine {
    /// Local pull iteration. Source steps are seeded at lock time.
    Standard,
    /// Distributed vertex-program evaluation. An external driver seeds
    /// source steps through `add_start(s)`.
    Computer,
}

impl fmt::Display for TraversalEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalEngine::Standard => write!(f, "standard"),
            TraversalEngine::Computer => write!(f, "computer"),
        }
    }
}

/// What a strategy may condition its rewrite on.
#[derive(Debug, Clone, Copy)]
pub struct StrategyContext<'a> {
    pub engine: TraversalEngine,
    pub config: &'a TraversalConfig,
}

impl<'a> StrategyContext<'a> {
    pub fn new(engine: TraversalEngine, config: &'a TraversalConfig) -> Self {
        Self { engine, config }
    }
}

/// A rewrite rule over an unlocked step sequence.
///
/// Strategies are deduplicated by `kind`, which defaults to the concrete
/// type, so registering two instances of the same strategy keeps the first.
/// They must be deterministic: the same sequence and context always yield
/// the same rewrite.
pub trait TraversalStrategy: Send + Sync + fmt::Debug + Any {
    fn name(&self) -> &'static str {
        let full = std::any::type_name::<Self>();
        full.rsplit("::").next().unwrap_or(full)
    }

    fn kind(&self) -> TypeId {
        Any::type_id(self)
    }

    /// Whether this strategy takes part when locking for `engine`.
    fn applies_to(&self, _engine: TraversalEngine) -> bool {
        true
    }

    fn apply(&self, steps: &mut Steps, ctx: &StrategyContext<'_>) -> Result<()>;
}
