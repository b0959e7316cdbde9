//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use strider_core::source::MemorySource;
use strider_core::traverser::Traverser;
use strider_core::value::Value;

/// A small "modern"-style graph: vertex names under `people`, ages under `ages`.
pub fn modern_source() -> Arc<MemorySource> {
    let source = MemorySource::new();
    source.insert(
        "people",
        ["marko", "vadas", "josh", "peter"]
            .into_iter()
            .map(Value::from)
            .collect(),
    );
    source.insert(
        "ages",
        [29_i64, 27, 32, 35].into_iter().map(Value::from).collect(),
    );
    Arc::new(source)
}

pub fn strs(values: &[&str]) -> Vec<Value> {
    values.iter().copied().map(Value::from).collect()
}

pub fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::from).collect()
}

pub fn bulked(value: impl Into<Value>, bulk: u64) -> Traverser {
    Traverser::try_with_bulk(value.into(), bulk).unwrap()
}

/// Deterministic pseudo-random bulks in `1..=max`.
pub fn bulk_pattern(len: usize, max: u64, seed: u64) -> Vec<u64> {
    let mut state = seed.max(1);
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state % max + 1
        })
        .collect()
}
