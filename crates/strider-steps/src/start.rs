//! Source step seeded from inline values, a data-source scan, or starts
//! delivered by an external driver.

use std::any::Any;
use std::collections::VecDeque;
use std::fmt;

use strider_core::error::{Error, Result};
use strider_core::side_effects::SideEffects;
use strider_core::source::ValueIter;
use strider_core::traverser::Traverser;
use strider_core::value::Value;

use crate::source::{TraverserGenerator, TraverserIter, TraverserSource};
use crate::traits::{Step, StepBase, Upstream};

/// Declared input of a start step.
#[derive(Debug, Clone, PartialEq)]
pub enum StartInput {
    /// Only explicitly added starts.
    Starts,
    /// Inline raw values.
    Values(Vec<Value>),
    /// Scan of `key` on the traversal's bound data source.
    Scan(String),
}

/// Explicit starts are served before the generated stream.
///
/// Cloning copies only the declared input. Pending explicit starts and the
/// generated stream stay with the original: an open scan is re-acquired when
/// the clone is locked and seeded again, and a driver feeds a clone afresh.
pub struct StartStep {
    base: StepBase,
    input: StartInput,
    starts: VecDeque<Traverser>,
    generated: Option<TraverserIter>,
    lookahead: Option<Traverser>,
}

impl StartStep {
    pub fn new(input: StartInput) -> Self {
        Self {
            base: StepBase::new(),
            input,
            starts: VecDeque::new(),
            generated: None,
            lookahead: None,
        }
    }

    pub fn values(values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self::new(StartInput::Values(
            values.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn scan(key: impl Into<String>) -> Self {
        Self::new(StartInput::Scan(key.into()))
    }

    pub fn input(&self) -> &StartInput {
        &self.input
    }

    pub fn is_seeded(&self) -> bool {
        self.generated.is_some() || self.lookahead.is_some()
    }

    fn raw_input(&self, side_effects: &SideEffects) -> Result<Option<ValueIter>> {
        match &self.input {
            StartInput::Starts => Ok(None),
            StartInput::Values(values) => {
                let values = values.clone();
                Ok(Some(Box::new(values.into_iter().map(Ok))))
            }
            StartInput::Scan(key) => side_effects.require_source()?.scan(key).map(Some),
        }
    }

    /// Buffer one generated traverser, dropping the stream once it ends.
    fn fill(&mut self) -> Result<bool> {
        if self.lookahead.is_some() {
            return Ok(true);
        }
        let Some(stream) = self.generated.as_mut() else {
            return Ok(false);
        };
        match stream.next() {
            Some(next) => {
                self.lookahead = Some(next?);
                Ok(true)
            }
            None => {
                self.generated = None;
                Ok(false)
            }
        }
    }
}

impl fmt::Debug for StartStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartStep")
            .field("base", &self.base)
            .field("input", &self.input)
            .field("starts", &self.starts.len())
            .field("seeded", &self.is_seeded())
            .finish()
    }
}

impl Step for StartStep {
    fn name(&self) -> &'static str {
        "StartStep"
    }

    fn base(&self) -> &StepBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut StepBase {
        &mut self.base
    }

    fn has_next(&mut self, _upstream: &mut Upstream<'_>) -> Result<bool> {
        if !self.starts.is_empty() {
            return Ok(true);
        }
        self.fill()
    }

    fn next(&mut self, _upstream: &mut Upstream<'_>) -> Result<Traverser> {
        if let Some(start) = self.starts.pop_front() {
            return Ok(start);
        }
        if self.fill()? {
            return self.lookahead.take().ok_or(Error::Exhausted);
        }
        Err(Error::Exhausted)
    }

    fn try_clone(&self) -> Result<Box<dyn Step>> {
        Ok(Box::new(StartStep {
            base: self.base,
            input: self.input.clone(),
            starts: VecDeque::new(),
            generated: None,
            lookahead: None,
        }))
    }

    fn as_source(&mut self) -> Option<&mut dyn TraverserSource> {
        Some(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl TraverserSource for StartStep {
    fn generate_traversers(
        &mut self,
        generator: &dyn TraverserGenerator,
        side_effects: &SideEffects,
    ) -> Result<()> {
        let raw = self.raw_input(side_effects)?;
        #[cfg(feature = "tracing")]
        tracing::trace!(step = %self.base.id(), input = ?self.input, "seeding source step");
        self.lookahead = None;
        self.generated = raw.map(|raw| generator.generate(raw));
        Ok(())
    }

    fn add_start(&mut self, start: Traverser) {
        self.starts.push_back(start);
    }
}
