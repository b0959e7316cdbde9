//! Default traverser generator: one bulk-1 traverser per raw value.

use strider_core::source::ValueIter;
use strider_core::traverser::Traverser;
use strider_steps::source::{TraverserGenerator, TraverserIter};

#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleTraverserGenerator;

impl TraverserGenerator for SimpleTraverserGenerator {
    fn generate(&self, raw: ValueIter) -> TraverserIter {
        Box::new(raw.map(|value| value.map(Traverser::new)))
    }
}
