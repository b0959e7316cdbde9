//! Run-length compression: folds adjacent equal traversers into one.
//!
//! Only *adjacent* duplicates merge, so output order is the input order with
//! runs collapsed. The step reads one traverser ahead to find where a run
//! ends; that traverser is carried into the next run.
//!
//! An upstream error in the middle of a run is held back until the partial
//! run has been handed downstream, so no pulled occurrence is lost.

use std::any::Any;
use std::num::NonZeroU64;

use strider_core::error::{Error, Result};
use strider_core::traverser::Traverser;

use crate::traits::{Step, StepBase, Upstream};

#[derive(Debug)]
pub struct CoalesceStep {
    base: StepBase,
    max_bulk: u64,
    /// Completed run, ready to hand downstream.
    ready: Option<Traverser>,
    /// First traverser of the following run.
    carry: Option<Traverser>,
    /// Upstream failure that cut `ready` short.
    failed: Option<Error>,
}

impl CoalesceStep {
    pub fn new() -> Self {
        Self::with_max_bulk(NonZeroU64::MAX)
    }

    /// Cap the bulk of any single output.
    pub fn with_max_bulk(max_bulk: NonZeroU64) -> Self {
        Self {
            base: StepBase::new(),
            max_bulk: max_bulk.get(),
            ready: None,
            carry: None,
            failed: None,
        }
    }

    pub fn max_bulk(&self) -> u64 {
        self.max_bulk
    }
}

impl Default for CoalesceStep {
    fn default() -> Self {
        Self::new()
    }
}

impl Step for CoalesceStep {
    fn name(&self) -> &'static str {
        "CoalesceStep"
    }

    fn base(&self) -> &StepBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut StepBase {
        &mut self.base
    }

    fn has_next(&mut self, upstream: &mut Upstream<'_>) -> Result<bool> {
        if self.ready.is_some() {
            return Ok(true);
        }
        if let Some(e) = self.failed.take() {
            return Err(e);
        }
        let mut run = match self.carry.take() {
            Some(t) => t,
            None => match upstream.try_next()? {
                Some(t) => t,
                None => return Ok(false),
            },
        };
        while run.bulk() < self.max_bulk {
            let t = match upstream.try_next() {
                Ok(Some(t)) => t,
                Ok(None) => break,
                Err(e) => {
                    self.failed = Some(e);
                    break;
                }
            };
            if t == run && t.bulk() <= self.max_bulk - run.bulk() {
                run.merge(t)?;
            } else {
                self.carry = Some(t);
                break;
            }
        }
        self.ready = Some(run);
        Ok(true)
    }

    fn next(&mut self, upstream: &mut Upstream<'_>) -> Result<Traverser> {
        if self.has_next(upstream)? {
            self.ready.take().ok_or(Error::Exhausted)
        } else {
            Err(Error::Exhausted)
        }
    }

    fn try_clone(&self) -> Result<Box<dyn Step>> {
        Ok(Box::new(CoalesceStep {
            base: self.base,
            max_bulk: self.max_bulk,
            ready: None,
            carry: None,
            failed: None,
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
