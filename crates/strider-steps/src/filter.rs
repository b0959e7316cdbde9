//! Filter step: keeps or drops whole traversers, bulk untouched.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use strider_core::error::{Error, Result};
use strider_core::traverser::Traverser;
use strider_core::value::Value;

use crate::traits::{Step, StepBase, Upstream};

pub type Predicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

pub struct FilterStep {
    base: StepBase,
    predicate: Predicate,
    /// Next passing traverser, pulled by `has_next`.
    lookahead: Option<Traverser>,
}

impl FilterStep {
    pub fn new(predicate: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self {
            base: StepBase::new(),
            predicate: Arc::new(predicate),
            lookahead: None,
        }
    }

    /// Keep values equal to `expected`.
    pub fn equals(expected: Value) -> Self {
        Self::new(move |v| *v == expected)
    }
}

impl fmt::Debug for FilterStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterStep")
            .field("base", &self.base)
            .field("buffered", &self.lookahead.is_some())
            .finish()
    }
}

impl Step for FilterStep {
    fn name(&self) -> &'static str {
        "FilterStep"
    }

    fn base(&self) -> &StepBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut StepBase {
        &mut self.base
    }

    fn has_next(&mut self, upstream: &mut Upstream<'_>) -> Result<bool> {
        while self.lookahead.is_none() {
            let Some(t) = upstream.try_next()? else {
                return Ok(false);
            };
            if (self.predicate)(t.value()) {
                self.lookahead = Some(t);
            }
        }
        Ok(true)
    }

    fn next(&mut self, upstream: &mut Upstream<'_>) -> Result<Traverser> {
        if self.has_next(upstream)? {
            self.lookahead.take().ok_or(Error::Exhausted)
        } else {
            Err(Error::Exhausted)
        }
    }

    fn try_clone(&self) -> Result<Box<dyn Step>> {
        Ok(Box::new(FilterStep {
            base: self.base,
            predicate: Arc::clone(&self.predicate),
            lookahead: None,
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sequence::Steps;
    use crate::start::StartStep;
    use strider_core::side_effects::SideEffects;

    #[test]
    fn has_next_is_idempotent() {
        let mut steps = Steps::new();
        steps.push(Box::new(StartStep::new(crate::start::StartInput::Starts)));
        steps.push(Box::new(FilterStep::new(|v| v.as_int() == Some(3))));
        let mut starts = [1_i64, 3, 4]
            .into_iter()
            .map(|i| Traverser::new(Value::Int(i)));
        steps.sources_mut().next().unwrap().add_starts(&mut starts);

        let mut se = SideEffects::new();
        let mut pull = steps.upstream(&mut se);
        assert!(pull.has_next().unwrap());
        assert!(pull.has_next().unwrap());
        assert_eq!(pull.next().unwrap().into_value(), Value::Int(3));
        assert!(!pull.has_next().unwrap());
        assert!(matches!(pull.next(), Err(Error::Exhausted)));
    }

    #[test]
    fn clone_drops_lookahead() {
        let mut steps = Steps::new();
        steps.push(Box::new(StartStep::new(crate::start::StartInput::Starts)));
        steps.push(Box::new(FilterStep::equals(Value::from("k"))));
        let mut starts = std::iter::once(Traverser::try_with_bulk(Value::from("k"), 4).unwrap());
        steps.sources_mut().next().unwrap().add_starts(&mut starts);

        let mut se = SideEffects::new();
        assert!(steps.upstream(&mut se).has_next().unwrap());

        let mut copy = steps.try_clone().unwrap();
        assert!(!copy.upstream(&mut se).has_next().unwrap());
        assert_eq!(steps.upstream(&mut se).next().unwrap().bulk(), 4);
    }
}
