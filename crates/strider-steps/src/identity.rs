//! Pass-through step. Mostly a placeholder that strategies remove.

use std::any::Any;

use strider_core::error::Result;
use strider_core::traverser::Traverser;

use crate::traits::{Step, StepBase, Upstream};

#[derive(Debug, Clone, Default)]
pub struct IdentityStep {
    base: StepBase,
}

impl IdentityStep {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Step for IdentityStep {
    fn name(&self) -> &'static str {
        "IdentityStep"
    }

    fn base(&self) -> &StepBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut StepBase {
        &mut self.base
    }

    fn has_next(&mut self, upstream: &mut Upstream<'_>) -> Result<bool> {
        upstream.has_next()
    }

    fn next(&mut self, upstream: &mut Upstream<'_>) -> Result<Traverser> {
        upstream.next()
    }

    fn try_clone(&self) -> Result<Box<dyn Step>> {
        Ok(Box::new(self.clone()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
