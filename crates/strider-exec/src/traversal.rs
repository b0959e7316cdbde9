//! The traversal orchestrator.
//!
//! A `Traversal` starts in *building* state, where steps and starts may be
//! added. The first `has_next`/`next`/`apply_strategies` call locks it:
//! the shape's cached strategies rewrite the step sequence once, the engine
//! tag is fixed, and on the standard engine every source step is seeded
//! through the shape's traverser generator. After that the sequence is
//! frozen; `try_clone` forks a fresh building-state copy.
//!
//! Bulk is expanded here, at the consumer boundary: a traverser of bulk `n`
//! is returned as `n` consecutive values without re-pulling the chain.

use std::fmt;
use std::marker::PhantomData;
use std::num::NonZeroU64;
use std::sync::Arc;

use strider_core::config::TraversalConfig;
use strider_core::error::{Error, Result};
use strider_core::id::{StepId, TraversalId};
use strider_core::side_effects::SideEffects;
use strider_core::source::DataSource;
use strider_core::traverser::Traverser;
use strider_core::value::Value;
use strider_steps::sequence::Steps;
use strider_steps::source::{TraverserGenerator, TraverserSource};
use strider_steps::traits::{Step, Upstream};
use strider_strategy::cache::{GlobalCache, GraphShape, TraversalShape};
use strider_strategy::strategy::{StrategyContext, TraversalEngine};

use crate::metrics::emit_span;

/// Pending occurrences of the last bulked traverser.
#[derive(Debug, Clone, Default)]
enum Cursor {
    #[default]
    Idle,
    /// `remaining` more copies of `value` are owed to the consumer.
    Draining { value: Value, remaining: NonZeroU64 },
}

pub struct Traversal<S: TraversalShape = GraphShape> {
    id: TraversalId,
    steps: Steps,
    side_effects: SideEffects,
    config: TraversalConfig,
    engine: Option<TraversalEngine>,
    locked: bool,
    seeded: bool,
    cursor: Cursor,
    _shape: PhantomData<fn() -> S>,
}

impl Traversal {
    /// Empty traversal of the default graph shape.
    pub fn new() -> Self {
        Self::with_shape()
    }
}

impl Default for Traversal {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: TraversalShape> Traversal<S> {
    /// Empty traversal whose strategies come from shape `S`.
    pub fn with_shape() -> Self {
        Self {
            id: TraversalId::new_v4(),
            steps: Steps::new(),
            side_effects: SideEffects::new(),
            config: TraversalConfig::default(),
            engine: None,
            locked: false,
            seeded: false,
            cursor: Cursor::Idle,
            _shape: PhantomData,
        }
    }

    /// Bind the external data source that scanning source steps read from.
    pub fn with_source(mut self, source: Arc<dyn DataSource>) -> Self {
        self.side_effects.set_source(source);
        self
    }

    pub fn with_config(mut self, config: TraversalConfig) -> Self {
        self.config = config;
        self
    }

    pub fn id(&self) -> TraversalId {
        self.id
    }

    pub fn config(&self) -> &TraversalConfig {
        &self.config
    }

    /// Engine tag, set once the traversal is locked.
    pub fn engine(&self) -> Option<TraversalEngine> {
        self.engine
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn steps(&self) -> &Steps {
        &self.steps
    }

    /// Mutable access to the sequence for manual rewrites before locking.
    pub fn steps_mut(&mut self) -> Result<&mut Steps> {
        if self.locked {
            return Err(Error::Locked);
        }
        Ok(&mut self.steps)
    }

    pub fn side_effects(&self) -> &SideEffects {
        &self.side_effects
    }

    pub fn side_effects_mut(&mut self) -> &mut SideEffects {
        &mut self.side_effects
    }

    /// Generator bound to this traversal's shape.
    pub fn traverser_generator(&self) -> Arc<dyn TraverserGenerator> {
        GlobalCache::strategies::<S>().get_traverser_generator()
    }

    /// Append a step to the end of the chain.
    pub fn add_step(&mut self, step: impl Step + 'static) -> Result<StepId> {
        self.add_boxed_step(Box::new(step))
    }

    pub fn add_boxed_step(&mut self, step: Box<dyn Step>) -> Result<StepId> {
        if self.locked {
            return Err(Error::Locked);
        }
        Ok(self.steps.push(step))
    }

    /// Chaining form of `add_step`.
    pub fn then(mut self, step: impl Step + 'static) -> Result<Self> {
        self.add_step(step)?;
        Ok(self)
    }

    /// Queue a traverser on the first step, ahead of anything it generates.
    ///
    /// Allowed after locking: on the computer engine this is how the
    /// external driver feeds the chain.
    pub fn add_start(&mut self, start: Traverser) -> Result<()> {
        self.first_source()?.add_start(start);
        Ok(())
    }

    pub fn add_starts(&mut self, starts: impl IntoIterator<Item = Traverser>) -> Result<()> {
        let source = self.first_source()?;
        source.add_starts(&mut starts.into_iter());
        Ok(())
    }

    fn first_source(&mut self) -> Result<&mut dyn TraverserSource> {
        self.steps
            .get_mut(0)
            .and_then(|step| step.as_source())
            .ok_or(Error::NoSource)
    }

    /// Lock the traversal for `engine`. A no-op once locked and seeded.
    ///
    /// Strategies run at most once: the traversal locks as soon as they
    /// succeed, before source steps are seeded. If seeding then fails, a
    /// retry seeds again for the engine already fixed and leaves the
    /// rewritten sequence alone. A failing strategy leaves the traversal
    /// unlocked, keeping rewrites made by the strategies before it.
    pub fn apply_strategies(&mut self, engine: TraversalEngine) -> Result<()> {
        if !self.locked {
            self.config.validate()?;
            let strategies = GlobalCache::strategies::<S>();
            let ctx = StrategyContext::new(engine, &self.config);
            strategies.apply(&mut self.steps, &ctx)?;
            self.engine = Some(engine);
            self.locked = true;
            emit_span(
                "lock",
                &[
                    ("traversal", self.id.to_string()),
                    ("engine", engine.to_string()),
                    ("steps", self.steps.to_string()),
                ],
            );
        }
        self.seed()
    }

    fn seed(&mut self) -> Result<()> {
        if self.seeded {
            return Ok(());
        }
        if self.engine == Some(TraversalEngine::Standard) {
            let generator = self.traverser_generator();
            for source in self.steps.sources_mut() {
                source.generate_traversers(generator.as_ref(), &self.side_effects)?;
            }
        }
        self.seeded = true;
        Ok(())
    }

    // Guarded by the flag alone so the pull path does no further checks.
    fn lock(&mut self) -> Result<()> {
        if !self.seeded {
            self.apply_strategies(TraversalEngine::Standard)?;
        }
        Ok(())
    }

    fn pull(&mut self) -> Upstream<'_> {
        self.steps.upstream(&mut self.side_effects)
    }

    /// Whether another value is available. Repeated calls without `next`
    /// consume nothing.
    pub fn has_next(&mut self) -> Result<bool> {
        self.lock()?;
        if let Cursor::Draining { .. } = self.cursor {
            return Ok(true);
        }
        self.pull().has_next()
    }

    /// Next value. Fails with `Error::Exhausted` when `has_next` is false.
    pub fn next(&mut self) -> Result<Value> {
        self.lock()?;
        if let Some(value) = self.take_pending() {
            return Ok(value);
        }
        let (value, bulk) = self.pull().next()?.into_parts();
        if let Some(remaining) = NonZeroU64::new(bulk.get() - 1) {
            self.cursor = Cursor::Draining {
                value: value.clone(),
                remaining,
            };
        }
        Ok(value)
    }

    fn take_pending(&mut self) -> Option<Value> {
        match std::mem::take(&mut self.cursor) {
            Cursor::Idle => None,
            Cursor::Draining { value, remaining } => match NonZeroU64::new(remaining.get() - 1) {
                Some(rest) => {
                    let out = value.clone();
                    self.cursor = Cursor::Draining {
                        value,
                        remaining: rest,
                    };
                    Some(out)
                }
                None => Some(value),
            },
        }
    }

    /// Up to `n` values; fewer if the stream ends first.
    pub fn next_n(&mut self, n: usize) -> Result<Vec<Value>> {
        let mut out = Vec::with_capacity(n.min(1024));
        while out.len() < n && self.has_next()? {
            out.push(self.next()?);
        }
        Ok(out)
    }

    /// Drain the remaining stream into a list.
    pub fn to_list(&mut self) -> Result<Vec<Value>> {
        let mut out = Vec::new();
        while self.has_next()? {
            out.push(self.next()?);
        }
        emit_span(
            "drain",
            &[
                ("traversal", self.id.to_string()),
                ("values", out.len().to_string()),
            ],
        );
        Ok(out)
    }

    /// Drain the stream for its side effects, discarding the values.
    pub fn iterate(&mut self) -> Result<()> {
        while self.has_next()? {
            self.next()?;
        }
        Ok(())
    }

    /// Element-wise equality of the two realized output streams. Consumes
    /// both up to the first difference.
    pub fn stream_eq<O: TraversalShape>(&mut self, other: &mut Traversal<O>) -> Result<bool> {
        loop {
            match (self.has_next()?, other.has_next()?) {
                (false, false) => return Ok(true),
                (true, true) => {
                    if self.next()? != other.next()? {
                        return Ok(false);
                    }
                }
                _ => return Ok(false),
            }
        }
    }

    /// Fork an independent, unlocked copy.
    ///
    /// Steps are deep-copied by definition (in-flight buffers and generated
    /// streams are not carried over), side effects are deep-copied, and the
    /// bulk cursor is reset. The copy re-applies strategies on first use.
    /// Fails as a whole if any step cannot be copied.
    pub fn try_clone(&self) -> Result<Self> {
        let steps = self.steps.try_clone()?;
        let clone = Self {
            id: TraversalId::new_v4(),
            steps,
            side_effects: self.side_effects.clone(),
            config: self.config.clone(),
            engine: None,
            locked: false,
            seeded: false,
            cursor: Cursor::Idle,
            _shape: PhantomData,
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(from = %self.id, to = %clone.id, "traversal cloned");
        Ok(clone)
    }
}

impl<S: TraversalShape> Iterator for Traversal<S> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.has_next() {
            Ok(true) => Some(Traversal::<S>::next(self)),
            Ok(false) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<S: TraversalShape> fmt::Display for Traversal<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.steps, f)
    }
}

impl<S: TraversalShape> fmt::Debug for Traversal<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Traversal")
            .field("id", &self.id)
            .field("shape", &std::any::type_name::<S>())
            .field("steps", &self.steps.names())
            .field("engine", &self.engine)
            .field("locked", &self.locked)
            .field("seeded", &self.seeded)
            .field("cursor", &self.cursor)
            .finish()
    }
}
