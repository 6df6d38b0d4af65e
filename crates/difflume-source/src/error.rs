//! Error types for content sources.

use std::path::PathBuf;

use crate::cache::{RevisionId, RevisionKey};

/// Errors raised while fetching content from a source.
///
/// A read error never mutates source state: the cache and revision list
/// stay as they were before the failed call.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The file is missing, unreadable, or not valid UTF-8.
    #[error("Could not read file {}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The request failed or the server answered with an error status.
    #[error("Could not read URL {url}: {source}")]
    Url {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The revision list could not be fetched or decoded.
    #[error("Could not read revisions from {url}: {reason}")]
    Revisions { url: String, reason: String },

    /// A specific revision could not be fetched.
    #[error("Could not read revision {revision} from {url}: {reason}")]
    Revision {
        url: String,
        revision: RevisionId,
        reason: String,
    },
}

/// Requested content is not in the cache.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Could not find revision {key}")]
pub struct RevisionNotFoundError {
    pub key: RevisionKey,
}

/// A source kind name that no fetcher answers to.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceKindError {
    #[error("unknown source kind {0:?} (expected auto, file, http or couchdb)")]
    Unknown(String),
}

/// Convenience alias for read results.
pub type ReadResult<T> = Result<T, ReadError>;
