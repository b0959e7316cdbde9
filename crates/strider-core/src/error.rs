use thiserror::Error;

/// Canonical result for the engine.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// `next()` was called on a stream whose `has_next()` is false.
    #[error("stream exhausted: next() called without a pending element")]
    Exhausted,

    #[error("invalid bulk {0}: a traverser must represent at least one occurrence")]
    InvalidBulk(u64),

    #[error("bulk overflow: {current} + {added} exceeds u64")]
    BulkOverflow { current: u64, added: u64 },

    #[error("step '{step}' cannot be deep-copied")]
    CloneUnsupported { step: String },

    #[error("traversal is locked; its step sequence can no longer change")]
    Locked,

    #[error("no source step available to receive starts")]
    NoSource,

    #[error("step index {index} is out of bounds for a sequence of {len} steps")]
    StepIndex { index: usize, len: usize },

    // Data-source and step failures are carried verbatim through the pull chain.
    #[error("data source error: {0}")]
    Source(String),

    #[error("step error: {0}")]
    Step(String),

    #[error("strategy error: {0}")]
    Strategy(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Hashing error: {0}")]
    Hash(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Hash(e.to_string())
    }
}
