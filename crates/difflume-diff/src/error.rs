//! Error types for the diff crate.

/// Errors that can occur while configuring or rendering diffs.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The requested diff variant does not exist.
    #[error("unknown diff type: {0:?} (expected one of: ndiff, ndiff_collapsed)")]
    UnknownDiffType(String),

    /// A highlight pattern failed to compile.
    #[error("invalid highlight pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Convenience alias for diff results.
pub type Result<T> = std::result::Result<T, DiffError>;
