//! Side-effect step: records each passing value into a named list.

use std::any::Any;

use strider_core::error::Result;
use strider_core::traverser::Traverser;

use crate::traits::{Step, StepBase, Upstream};

/// Appends every traverser's value `bulk` times to the side effect `key`,
/// then passes the traverser through unchanged.
#[derive(Debug, Clone)]
pub struct StoreStep {
    base: StepBase,
    key: String,
}

impl StoreStep {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            base: StepBase::new(),
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Step for StoreStep {
    fn name(&self) -> &'static str {
        "StoreStep"
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
        let t = upstream.next()?;
        upstream
            .side_effects()
            .append(&self.key, t.value().clone(), t.bulk())?;
        Ok(t)
    }

    fn try_clone(&self) -> Result<Box<dyn Step>> {
        Ok(Box::new(self.clone()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
