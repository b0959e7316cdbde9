//! Forking traversals with `try_clone`.

mod test_data_gen;

use std::any::Any;
use std::thread;

use strider_core::error::{Error, Result};
use strider_core::traverser::Traverser;
use strider_core::value::Value;
use strider_exec::{Traversal, TraversalEngine};
use strider_steps::filter::FilterStep;
use strider_steps::start::StartStep;
use strider_steps::store::StoreStep;
use strider_steps::traits::{Step, StepBase, Upstream};
use test_data_gen::{ints, modern_source, strs};

/// Holds an external cursor that cannot be duplicated.
#[derive(Debug, Default)]
struct ExternalCursorStep {
    base: StepBase,
}

impl Step for ExternalCursorStep {
    fn name(&self) -> &'static str {
        "ExternalCursorStep"
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
        Err(Error::CloneUnsupported {
            step: self.name().to_string(),
        })
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

fn store_chain() -> Traversal {
    let mut t = Traversal::new();
    t.add_step(StartStep::values([1_i64, 2, 3])).unwrap();
    t.add_step(StoreStep::new("seen")).unwrap();
    t
}

#[test]
fn test_side_effects_are_independent() {
    let mut original = store_chain();
    original.side_effects_mut().set("label", Value::from("original"));

    let mut copy = original.try_clone().unwrap();
    copy.side_effects_mut().set("label", Value::from("copy"));
    copy.side_effects_mut().set("only-in-copy", Value::Bool(true));
    assert_eq!(
        original.side_effects().get("label"),
        Some(&Value::from("original"))
    );
    assert!(!original.side_effects().exists("only-in-copy"));

    // Both locked and driven: each accumulates into its own bag.
    original.next_n(2).unwrap();
    copy.iterate().unwrap();
    assert_eq!(
        original.side_effects().get("seen"),
        Some(&Value::List(ints(&[1, 2])))
    );
    assert_eq!(
        copy.side_effects().get("seen"),
        Some(&Value::List(ints(&[1, 2, 3])))
    );

    original.side_effects_mut().remove("seen");
    assert!(copy.side_effects().exists("seen"));
}

#[test]
fn test_clone_of_locked_traversal_starts_over() {
    let mut original = Traversal::new();
    original.add_step(StartStep::values(["a", "b", "c"])).unwrap();
    assert_eq!(original.next().unwrap(), Value::from("a"));
    assert!(original.is_locked());

    let mut copy = original.try_clone().unwrap();
    assert!(!copy.is_locked());
    assert_eq!(copy.engine(), None);
    assert_ne!(copy.id(), original.id());

    assert_eq!(copy.to_list().unwrap(), strs(&["a", "b", "c"]));
    assert!(copy.is_locked());
    assert_eq!(original.to_list().unwrap(), strs(&["b", "c"]));
}

#[test]
fn test_clone_can_lock_for_another_engine() {
    let mut template = Traversal::new();
    template.add_step(StartStep::values([5_i64])).unwrap();
    template
        .apply_strategies(TraversalEngine::Computer)
        .unwrap();

    let mut local = template.try_clone().unwrap();
    assert_eq!(local.to_list().unwrap(), ints(&[5]));
    assert_eq!(local.engine(), Some(TraversalEngine::Standard));
    assert_eq!(template.engine(), Some(TraversalEngine::Computer));
}

#[test]
fn test_pending_bulk_is_not_carried_over() {
    let mut original = Traversal::new();
    original.add_step(StartStep::values(["k"])).unwrap();
    original
        .add_start(Traverser::try_with_bulk(Value::from("x"), 3).unwrap())
        .unwrap();
    assert_eq!(original.next().unwrap(), Value::from("x"));

    let mut copy = original.try_clone().unwrap();
    assert_eq!(copy.to_list().unwrap(), strs(&["k"]));
    assert_eq!(original.to_list().unwrap(), strs(&["x", "x", "k"]));
}

#[test]
fn test_uncopyable_step_fails_the_whole_clone() {
    let mut t = Traversal::new();
    t.add_step(StartStep::values([1_i64])).unwrap();
    t.add_step(ExternalCursorStep::default()).unwrap();

    match t.try_clone() {
        Err(Error::CloneUnsupported { step }) => assert_eq!(step, "ExternalCursorStep"),
        other => panic!("expected CloneUnsupported, got {other:?}"),
    }
    // The original is untouched and still runs.
    assert_eq!(t.to_list().unwrap(), ints(&[1]));
}

#[test]
fn test_clones_share_the_data_source() {
    let mut template = Traversal::new().with_source(modern_source());
    template.add_step(StartStep::scan("ages")).unwrap();
    template
        .add_step(FilterStep::new(|v| v.as_int().is_some_and(|a| a > 30)))
        .unwrap();

    let mut copy = template.try_clone().unwrap();
    assert!(copy.side_effects().source().is_some());
    assert!(copy.stream_eq(&mut template).unwrap());
}

#[test]
fn test_clones_run_on_separate_threads() {
    let mut template = Traversal::new().with_source(modern_source());
    template.add_step(StartStep::scan("people")).unwrap();
    template.add_step(StoreStep::new("names")).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let mut copy = template.try_clone().unwrap();
            thread::spawn(move || {
                copy.iterate().unwrap();
                copy.side_effects().get("names").cloned()
            })
        })
        .collect();

    let expected = Value::List(strs(&["marko", "vadas", "josh", "peter"]));
    for handle in handles {
        assert_eq!(handle.join().unwrap(), Some(expected.clone()));
    }
    assert!(template.side_effects().get("names").is_none());
}
