//! Terminal empty step: the sentinel at the head of every chain.

use std::any::Any;

use strider_core::error::{Error, Result};
use strider_core::traverser::Traverser;

use crate::traits::{Step, StepBase, Upstream};

#[derive(Debug, Clone, Default)]
pub struct EmptyStep {
    base: StepBase,
}

/// Shared sentinel returned when a sequence has no start or end step.
pub static EMPTY: EmptyStep = EmptyStep::new();

impl EmptyStep {
    pub const fn new() -> Self {
        Self {
            base: StepBase::new(),
        }
    }
}

impl Step for EmptyStep {
    fn name(&self) -> &'static str {
        "EmptyStep"
    }

    fn base(&self) -> &StepBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut StepBase {
        &mut self.base
    }

    fn has_next(&mut self, _upstream: &mut Upstream<'_>) -> Result<bool> {
        Ok(false)
    }

    fn next(&mut self, _upstream: &mut Upstream<'_>) -> Result<Traverser> {
        Err(Error::Exhausted)
    }

    fn try_clone(&self) -> Result<Box<dyn Step>> {
        Ok(Box::new(self.clone()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
