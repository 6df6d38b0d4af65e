//! Error types for the URL crate.

use std::string::FromUtf8Error;

/// Errors that can occur while interpreting URL components.
#[derive(Debug, thiserror::Error)]
pub enum UrlError {
    /// A percent-encoded path did not decode to valid UTF-8.
    #[error("invalid percent-encoding in path {path:?}: {source}")]
    Encoding {
        path: String,
        #[source]
        source: FromUtf8Error,
    },
}

/// Convenience alias for URL results.
pub type UrlResult<T> = Result<T, UrlError>;
