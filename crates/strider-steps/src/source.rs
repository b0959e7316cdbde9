//! Source-step capability and the traverser-generation seam.
//!
//! A source step has no real upstream producer. On the standard engine the
//! traversal seeds it once at lock time through a `TraverserGenerator`; on a
//! distributed engine an external driver feeds it through `add_start(s)`.

use std::fmt;

use strider_core::error::Result;
use strider_core::side_effects::SideEffects;
use strider_core::source::ValueIter;
use strider_core::traverser::Traverser;

/// Seeded traverser stream.
pub type TraverserIter = Box<dyn Iterator<Item = Result<Traverser>> + Send>;

/// Turns a raw value stream into traversers.
///
/// Generators emit bulk 1; compression is introduced later by steps that
/// see adjacent duplicates.
pub trait TraverserGenerator: Send + Sync + fmt::Debug {
    fn generate(&self, raw: ValueIter) -> TraverserIter;
}

pub trait TraverserSource {
    /// Seed the step from its declared input. Invoked once per locked
    /// traversal, and only on the standard engine.
    fn generate_traversers(
        &mut self,
        generator: &dyn TraverserGenerator,
        side_effects: &SideEffects,
    ) -> Result<()>;

    /// Queue an externally produced traverser ahead of generated ones.
    fn add_start(&mut self, start: Traverser);

    fn add_starts(&mut self, starts: &mut dyn Iterator<Item = Traverser>) {
        for start in starts {
            self.add_start(start);
        }
    }
}
