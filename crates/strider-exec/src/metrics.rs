//! Tracing hooks for traversal lifecycle events.
//!
//! Kept to plain key/value pairs; wire a subscriber in the embedding binary.

#[cfg(feature = "tracing")]
pub fn emit_span(event: &str, key_values: &[(&str, String)]) {
    let span = tracing::trace_span!("strider", event);
    let _entered = span.enter();
    for (k, v) in key_values {
        tracing::trace!(%k, %v, "field");
    }
}

#[cfg(not(feature = "tracing"))]
pub fn emit_span(_event: &str, _key_values: &[(&str, String)]) { /* no-op */
}
