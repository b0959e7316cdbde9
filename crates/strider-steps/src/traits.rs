//! Step trait + the positional pull view.
//!
//! Steps do not hold pointers to their predecessors. The owning `Steps`
//! sequence hands each step an `Upstream` covering every step before it, so
//! inserting, removing, or replacing a step can never leave a dangling link.
//! The recorded upstream id is bookkeeping for display and strategies; the
//! pull path is always positional.
//!
//! Invariants:
//! - A step produces output only in response to `has_next`/`next` from its
//!   downstream consumer.
//! - `has_next` is idempotent: calling it repeatedly without `next` neither
//!   consumes input nor changes what `next` will return.
//! - `next` after `has_next() == false` is a contract violation and returns
//!   `Error::Exhausted`.

use std::any::Any;
use std::fmt;

use strider_core::error::{Error, Result};
use strider_core::id::StepId;
use strider_core::side_effects::SideEffects;
use strider_core::traverser::Traverser;

use crate::source::TraverserSource;

/// Identity and link bookkeeping shared by every step implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepBase {
    id: StepId,
    upstream: Option<StepId>,
}

impl StepBase {
    /// An unattached step; the owning sequence assigns the real id.
    pub const fn new() -> Self {
        Self {
            id: StepId::new(0),
            upstream: None,
        }
    }

    pub fn id(&self) -> StepId {
        self.id
    }

    pub fn upstream(&self) -> Option<StepId> {
        self.upstream
    }

    pub(crate) fn set_id(&mut self, id: StepId) {
        self.id = id;
    }
}

impl Default for StepBase {
    fn default() -> Self {
        Self::new()
    }
}

/// Trait that all steps must implement.
pub trait Step: Send + fmt::Debug {
    /// Human-readable step name (stable).
    fn name(&self) -> &'static str;

    fn base(&self) -> &StepBase;

    fn base_mut(&mut self) -> &mut StepBase;

    fn id(&self) -> StepId {
        self.base().id()
    }

    /// Id of the predecessor, `None` when the step sits on the empty sentinel.
    fn upstream_id(&self) -> Option<StepId> {
        self.base().upstream()
    }

    fn set_upstream(&mut self, upstream: Option<StepId>) {
        self.base_mut().upstream = upstream;
    }

    fn has_next(&mut self, upstream: &mut Upstream<'_>) -> Result<bool>;

    fn next(&mut self, upstream: &mut Upstream<'_>) -> Result<Traverser>;

    /// Deep copy. Steps holding resources that cannot be duplicated return
    /// `Error::CloneUnsupported` rather than sharing them.
    fn try_clone(&self) -> Result<Box<dyn Step>>;

    /// Source capability: steps seeded from external input return `Some`.
    fn as_source(&mut self) -> Option<&mut dyn TraverserSource> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

impl<'a> dyn Step + 'a {
    pub fn is<T: Step + 'static>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Step + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Everything upstream of the step currently being pulled, plus the
/// traversal's side effects.
///
/// Pulling from an `Upstream` pulls from its last step, which in turn
/// receives the view of the steps before it. An empty view is the empty
/// sentinel: never a next element.
pub struct Upstream<'a> {
    steps: &'a mut [Box<dyn Step>],
    side_effects: &'a mut SideEffects,
}

impl<'a> Upstream<'a> {
    pub fn new(steps: &'a mut [Box<dyn Step>], side_effects: &'a mut SideEffects) -> Self {
        Self {
            steps,
            side_effects,
        }
    }

    pub fn has_next(&mut self) -> Result<bool> {
        match self.steps.split_last_mut() {
            Some((last, rest)) => {
                let mut upstream = Upstream::new(rest, &mut *self.side_effects);
                last.has_next(&mut upstream)
            }
            None => Ok(false),
        }
    }

    pub fn next(&mut self) -> Result<Traverser> {
        match self.steps.split_last_mut() {
            Some((last, rest)) => {
                let mut upstream = Upstream::new(rest, &mut *self.side_effects);
                last.next(&mut upstream)
            }
            None => Err(Error::Exhausted),
        }
    }

    /// Pull the next traverser if there is one.
    pub fn try_next(&mut self) -> Result<Option<Traverser>> {
        if self.has_next()? {
            self.next().map(Some)
        } else {
            Ok(None)
        }
    }

    pub fn side_effects(&mut self) -> &mut SideEffects {
        &mut *self.side_effects
    }
}
