//! One-to-one and one-to-many value transforms.
//!
//! Both keep the bulk of the traverser they derive from: a traverser that
//! stands for `n` occurrences maps to outputs that each stand for `n`.

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use strider_core::error::{Error, Result};
use strider_core::traverser::Traverser;
use strider_core::value::Value;

use crate::traits::{Step, StepBase, Upstream};

pub type MapFn = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync>;
pub type FlatMapFn = Arc<dyn Fn(&Value) -> Result<Vec<Value>> + Send + Sync>;

#[derive(Clone)]
pub struct MapStep {
    base: StepBase,
    f: MapFn,
}

impl MapStep {
    pub fn new(f: impl Fn(&Value) -> Result<Value> + Send + Sync + 'static) -> Self {
        Self {
            base: StepBase::new(),
            f: Arc::new(f),
        }
    }
}

impl fmt::Debug for MapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapStep").field("base", &self.base).finish()
    }
}

impl Step for MapStep {
    fn name(&self) -> &'static str {
        "MapStep"
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
        let mapped = (self.f)(t.value())?;
        Ok(t.split(mapped))
    }

    fn try_clone(&self) -> Result<Box<dyn Step>> {
        Ok(Box::new(self.clone()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Expands each input into zero or more outputs; inputs that expand to
/// nothing are skipped without surfacing to the consumer.
pub struct FlatMapStep {
    base: StepBase,
    f: FlatMapFn,
    pending: VecDeque<Traverser>,
}

impl FlatMapStep {
    pub fn new(f: impl Fn(&Value) -> Result<Vec<Value>> + Send + Sync + 'static) -> Self {
        Self {
            base: StepBase::new(),
            f: Arc::new(f),
            pending: VecDeque::new(),
        }
    }

    /// Unfold list values into their elements; scalars pass through.
    pub fn unfold() -> Self {
        Self::new(|v| match v {
            Value::List(items) => Ok(items.clone()),
            other => Ok(vec![other.clone()]),
        })
    }
}

impl fmt::Debug for FlatMapStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlatMapStep")
            .field("base", &self.base)
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl Step for FlatMapStep {
    fn name(&self) -> &'static str {
        "FlatMapStep"
    }

    fn base(&self) -> &StepBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut StepBase {
        &mut self.base
    }

    fn has_next(&mut self, upstream: &mut Upstream<'_>) -> Result<bool> {
        while self.pending.is_empty() {
            let Some(t) = upstream.try_next()? else {
                return Ok(false);
            };
            for value in (self.f)(t.value())? {
                self.pending.push_back(t.split(value));
            }
        }
        Ok(true)
    }

    fn next(&mut self, upstream: &mut Upstream<'_>) -> Result<Traverser> {
        if self.has_next(upstream)? {
            self.pending.pop_front().ok_or(Error::Exhausted)
        } else {
            Err(Error::Exhausted)
        }
    }

    fn try_clone(&self) -> Result<Box<dyn Step>> {
        Ok(Box::new(FlatMapStep {
            base: self.base,
            f: Arc::clone(&self.f),
            pending: VecDeque::new(),
        }))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
