//! Owned, ordered step sequence.
//!
//! All rewrites (insert/remove/replace) act on this vector, and every rewrite
//! re-links upstream ids by position. Pulling goes through `Upstream`, which
//! also resolves predecessors by position, so there are no embedded links to
//! keep in sync.

use std::fmt;

use strider_core::error::{Error, Result};
use strider_core::hash::{hash_serde, Hash256};
use strider_core::id::StepId;
use strider_core::side_effects::SideEffects;

use crate::empty::EMPTY;
use crate::source::TraverserSource;
use crate::traits::{Step, Upstream};

#[derive(Debug, Default)]
pub struct Steps {
    inner: Vec<Box<dyn Step>>,
    next_id: u64,
}

impl Steps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Step> + '_ {
        self.inner.iter().map(|s| &**s)
    }

    pub fn get(&self, index: usize) -> Option<&dyn Step> {
        self.inner.get(index).map(|s| &**s)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Box<dyn Step>> {
        self.inner.get_mut(index)
    }

    /// First step, or the empty sentinel.
    pub fn start(&self) -> &dyn Step {
        self.get(0).unwrap_or(&EMPTY)
    }

    /// Last step, or the empty sentinel.
    pub fn end(&self) -> &dyn Step {
        self.inner
            .last()
            .map(|s| &**s)
            .unwrap_or(&EMPTY)
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.inner.iter().map(|s| s.name()).collect()
    }

    pub fn position(&self, id: StepId) -> Option<usize> {
        self.inner.iter().position(|s| s.id() == id)
    }

    /// Indices of every step of concrete type `T`, in order.
    pub fn positions_of<T: Step + 'static>(&self) -> Vec<usize> {
        self.inner
            .iter()
            .enumerate()
            .filter(|(_, s)| s.as_any().is::<T>())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn push(&mut self, step: Box<dyn Step>) -> StepId {
        let index = self.inner.len();
        self.attach(index, step)
    }

    pub fn insert(&mut self, index: usize, step: Box<dyn Step>) -> Result<StepId> {
        if index > self.inner.len() {
            return Err(Error::StepIndex {
                index,
                len: self.inner.len(),
            });
        }
        Ok(self.attach(index, step))
    }

    pub fn remove(&mut self, index: usize) -> Result<Box<dyn Step>> {
        self.check(index)?;
        let removed = self.inner.remove(index);
        self.relink();
        Ok(removed)
    }

    /// Swap the step at `index` for `step`, returning the old one.
    pub fn replace(&mut self, index: usize, mut step: Box<dyn Step>) -> Result<Box<dyn Step>> {
        self.check(index)?;
        step.base_mut().set_id(self.fresh_id());
        let old = std::mem::replace(&mut self.inner[index], step);
        self.relink();
        Ok(old)
    }

    /// Every step exposing the source capability, in order.
    pub fn sources_mut(&mut self) -> impl Iterator<Item = &mut dyn TraverserSource> + '_ {
        self.inner.iter_mut().filter_map(|s| s.as_source())
    }

    /// Pull view of the whole chain; pulling it pulls the last step.
    pub fn upstream<'a>(&'a mut self, side_effects: &'a mut SideEffects) -> Upstream<'a> {
        Upstream::new(&mut self.inner, side_effects)
    }

    /// Index-based deep copy: clone each step in order into a fresh
    /// sequence and re-link by position. Fails as a whole if any step
    /// cannot be copied.
    pub fn try_clone(&self) -> Result<Steps> {
        let mut inner = Vec::with_capacity(self.inner.len());
        for step in &self.inner {
            inner.push(step.try_clone()?);
        }
        let mut clone = Steps {
            inner,
            next_id: self.next_id,
        };
        clone.relink();
        Ok(clone)
    }

    /// Stable digest of the ordered (id, name) pairs.
    pub fn fingerprint(&self) -> Result<Hash256> {
        let shape: Vec<(u64, &str)> = self
            .inner
            .iter()
            .map(|s| (s.id().get(), s.name()))
            .collect();
        hash_serde(&shape)
    }

    fn attach(&mut self, index: usize, mut step: Box<dyn Step>) -> StepId {
        let id = self.fresh_id();
        step.base_mut().set_id(id);
        self.inner.insert(index, step);
        self.relink();
        id
    }

    fn fresh_id(&mut self) -> StepId {
        self.next_id += 1;
        StepId::new(self.next_id)
    }

    fn check(&self, index: usize) -> Result<()> {
        if index < self.inner.len() {
            Ok(())
        } else {
            Err(Error::StepIndex {
                index,
                len: self.inner.len(),
            })
        }
    }

    fn relink(&mut self) {
        let mut previous = None;
        for step in &mut self.inner {
            step.set_upstream(previous);
            previous = Some(step.id());
        }
    }
}

impl fmt::Display for Steps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.names().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterStep;
    use crate::identity::IdentityStep;
    use crate::map::MapStep;
    use crate::start::StartStep;
    use strider_core::value::Value;

    fn three_steps() -> Steps {
        let mut steps = Steps::new();
        steps.push(Box::new(StartStep::values([1_i64, 2, 3])));
        steps.push(Box::new(IdentityStep::new()));
        steps.push(Box::new(FilterStep::new(|_| true)));
        steps
    }

    #[test]
    fn upstream_links_follow_position() {
        let mut steps = three_steps();
        let ids: Vec<StepId> = steps.iter().map(|s| s.id()).collect();
        assert_eq!(steps.get(0).unwrap().upstream_id(), None);
        assert_eq!(steps.get(2).unwrap().upstream_id(), Some(ids[1]));

        steps.remove(1).unwrap();
        assert_eq!(steps.get(1).unwrap().upstream_id(), Some(ids[0]));
        assert_eq!(steps.to_string(), "[StartStep, FilterStep]");
    }

    #[test]
    fn insert_and_replace_assign_fresh_ids() {
        let mut steps = three_steps();
        let inserted = steps
            .insert(1, Box::new(MapStep::new(|v| Ok(v.clone()))))
            .unwrap();
        assert_eq!(steps.position(inserted), Some(1));
        assert_eq!(steps.get(2).unwrap().upstream_id(), Some(inserted));

        let old = steps.replace(2, Box::new(IdentityStep::new())).unwrap();
        assert_eq!(old.name(), "IdentityStep");
        assert_ne!(steps.get(2).unwrap().id(), old.id());
        assert_eq!(steps.positions_of::<IdentityStep>(), vec![2]);
    }

    #[test]
    fn out_of_bounds_rewrites_fail() {
        let mut steps = three_steps();
        assert!(matches!(
            steps.remove(3),
            Err(Error::StepIndex { index: 3, len: 3 })
        ));
        assert!(steps.insert(5, Box::new(IdentityStep::new())).is_err());
        assert!(steps.insert(3, Box::new(IdentityStep::new())).is_ok());
    }

    #[test]
    fn empty_sequence_ends_in_sentinel() {
        let mut steps = Steps::new();
        assert_eq!(steps.start().name(), "EmptyStep");
        assert_eq!(steps.end().name(), "EmptyStep");

        let mut se = SideEffects::new();
        let mut pull = steps.upstream(&mut se);
        assert!(!pull.has_next().unwrap());
        assert!(matches!(pull.next(), Err(Error::Exhausted)));
    }

    #[test]
    fn clone_keeps_shape_and_fingerprint() {
        let steps = three_steps();
        let clone = steps.try_clone().unwrap();
        assert_eq!(clone.names(), steps.names());
        assert_eq!(clone.fingerprint().unwrap(), steps.fingerprint().unwrap());
        assert_eq!(
            clone.get(1).unwrap().upstream_id(),
            Some(clone.get(0).unwrap().id())
        );
    }

    #[test]
    fn explicit_starts_flow_through_chain() {
        let mut steps = Steps::new();
        steps.push(Box::new(StartStep::new(crate::start::StartInput::Starts)));
        steps.push(Box::new(FilterStep::equals(Value::Int(2))));
        for source in steps.sources_mut() {
            source.add_starts(
                &mut [1_i64, 2, 2, 3]
                    .into_iter()
                    .map(|i| strider_core::traverser::Traverser::new(Value::Int(i))),
            );
        }

        let mut se = SideEffects::new();
        let mut pull = steps.upstream(&mut se);
        let mut out = Vec::new();
        while let Some(t) = pull.try_next().unwrap() {
            out.push(t.into_value());
        }
        assert_eq!(out, vec![Value::Int(2), Value::Int(2)]);
    }
}
