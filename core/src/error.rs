#![deny(missing_docs)]

//! # Error Handling
//!
//! Provides the unified `CombineError` enum used across the workspace.

use derive_more::{Display, From};
use std::path::PathBuf;

/// The pipeline error enum.
///
/// We use `derive_more` for boilerplate. Any error aborts the whole
/// combine run; there is no per-file recovery.
#[derive(Debug, Display, From)]
pub enum CombineError {
    /// Wrapper for standard IO errors (unreadable root file, failed
    /// output write).
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// Directory traversal failure.
    #[display("Walk Error: {_0}")]
    Walk(walkdir::Error),

    /// Malformed YAML in a source file.
    #[from(ignore)]
    #[display("Parse Error in {}: {source}", path.display())]
    Parse {
        /// The file that failed to parse.
        path: PathBuf,
        /// The underlying YAML error.
        source: serde_yaml::Error,
    },

    /// A `$ref` that cannot be resolved: the target file is missing, the
    /// JSON pointer does not resolve, or the reference graph has a cycle.
    #[from(ignore)]
    #[display("Reference Error: {_0}")]
    Reference(String),

    /// YAML serialization failure on the combined document.
    #[display("YAML Error: {_0}")]
    Yaml(serde_yaml::Error),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for CombineError {}

/// Helper type alias for Result using CombineError.
pub type CombineResult<T> = Result<T, CombineError>;
