#![deny(missing_docs)]

//! # Combine Core
//!
//! Core library for the OpenAPI directory combiner: a `$ref` bundler, a
//! generic document merger, the combine orchestration, and the mock
//! templating helpers consumed by an external template engine.

/// Shared error types.
pub mod error;

/// Generic deep merge over document trees.
pub mod merge;

/// `$ref` resolution and bundling.
pub mod bundler;

/// Directory combine orchestration.
pub mod combiner;

/// Mock templating helpers.
pub mod helpers;

pub use bundler::bundle;
pub use combiner::{combine, CombineOptions};
pub use error::{CombineError, CombineResult};
pub use merge::{merge_all, merge_pair};
