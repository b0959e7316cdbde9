#![forbid(unsafe_code)]
//! strider-core: values, traversers, side effects, and configuration shared by
//! every layer of the traversal engine.
//!
//! Nothing here pulls, rewrites, or schedules; those live in `strider-steps`,
//! `strider-strategy`, and `strider-exec`. Keep this crate free of I/O.

pub mod config;
pub mod error;
pub mod hash;
pub mod id;
pub mod prelude;
pub mod side_effects;
pub mod source;
pub mod traverser;
pub mod value;
