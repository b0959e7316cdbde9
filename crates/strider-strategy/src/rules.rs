//! Built-in rewrite strategies.

use strider_core::error::Result;
use strider_steps::coalesce::CoalesceStep;
use strider_steps::identity::IdentityStep;
use strider_steps::sequence::Steps;

use crate::strategy::{StrategyContext, TraversalEngine, TraversalStrategy};

/// Drops pass-through `IdentityStep`s on every engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityRemovalStrategy;

impl TraversalStrategy for IdentityRemovalStrategy {
    fn name(&self) -> &'static str {
        "IdentityRemovalStrategy"
    }

    fn apply(&self, steps: &mut Steps, _ctx: &StrategyContext<'_>) -> Result<()> {
        // Back to front so earlier indices stay valid.
        for index in steps.positions_of::<IdentityStep>().into_iter().rev() {
            steps.remove(index)?;
        }
        Ok(())
    }
}

/// Appends a `CoalesceStep` so the consumer sees adjacent duplicates as one
/// bulked traverser. Standard engine only, and only when
/// `TraversalConfig::coalesce_adjacent` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoalesceStrategy;

impl TraversalStrategy for CoalesceStrategy {
    fn name(&self) -> &'static str {
        "CoalesceStrategy"
    }

    fn applies_to(&self, engine: TraversalEngine) -> bool {
        engine == TraversalEngine::Standard
    }

    fn apply(&self, steps: &mut Steps, ctx: &StrategyContext<'_>) -> Result<()> {
        if !ctx.config.coalesce_adjacent || steps.is_empty() {
            return Ok(());
        }
        if steps.end().is::<CoalesceStep>() {
            return Ok(());
        }
        steps.push(Box::new(CoalesceStep::with_max_bulk(ctx.config.bulk_cap()?)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strider_core::config::TraversalConfig;
    use strider_steps::filter::FilterStep;
    use strider_steps::start::StartStep;

    fn chain() -> Steps {
        let mut steps = Steps::new();
        steps.push(Box::new(StartStep::values([1_i64, 1, 2])));
        steps.push(Box::new(IdentityStep::new()));
        steps.push(Box::new(FilterStep::new(|_| true)));
        steps.push(Box::new(IdentityStep::new()));
        steps
    }

    #[test]
    fn identity_removal_keeps_other_steps() {
        let config = TraversalConfig::default();
        let ctx = StrategyContext::new(TraversalEngine::Computer, &config);
        let mut steps = chain();
        IdentityRemovalStrategy.apply(&mut steps, &ctx).unwrap();
        assert_eq!(steps.to_string(), "[StartStep, FilterStep]");
        assert_eq!(
            steps.get(1).unwrap().upstream_id(),
            Some(steps.get(0).unwrap().id())
        );
    }

    #[test]
    fn coalesce_is_gated_and_idempotent() {
        let mut steps = chain();
        let off = TraversalConfig::default();
        CoalesceStrategy
            .apply(&mut steps, &StrategyContext::new(TraversalEngine::Standard, &off))
            .unwrap();
        assert_eq!(steps.len(), 4);

        let on = TraversalConfig::default().with_coalesce(8);
        let ctx = StrategyContext::new(TraversalEngine::Standard, &on);
        CoalesceStrategy.apply(&mut steps, &ctx).unwrap();
        CoalesceStrategy.apply(&mut steps, &ctx).unwrap();
        assert_eq!(steps.len(), 5);
        let end = steps.end().downcast_ref::<CoalesceStep>().unwrap();
        assert_eq!(end.max_bulk(), 8);
        assert!(!CoalesceStrategy.applies_to(TraversalEngine::Computer));
    }

    #[test]
    fn zero_cap_is_a_config_error() {
        let mut steps = chain();
        let zero = TraversalConfig::default().with_coalesce(0);
        let err = CoalesceStrategy
            .apply(&mut steps, &StrategyContext::new(TraversalEngine::Standard, &zero))
            .unwrap_err();
        assert!(matches!(err, strider_core::error::Error::Config(_)));
        assert_eq!(steps.len(), 4);
    }
}
