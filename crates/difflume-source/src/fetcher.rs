//! The fetch capability implemented by every source kind.

use async_trait::async_trait;

use crate::cache::RevisionId;
use crate::error::ReadResult;

/// Fetches raw text from one document location.
///
/// Implementations hold no cache; [`ContentSource`](crate::ContentSource)
/// drives them and owns all state. Sources without a revision history keep
/// the default `read_revisions` and `read_revision`.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Human-readable location, used in logs and labels.
    fn location(&self) -> String;

    /// Normalise the location before the first fetch.
    ///
    /// Must be idempotent.
    fn rewrite_inputs(&self) {}

    /// Fetch the current text of the document.
    async fn read_text(&self) -> ReadResult<String>;

    /// Revisions available for the document, newest first.
    async fn read_revisions(&self) -> ReadResult<Vec<RevisionId>> {
        Ok(Vec::new())
    }

    /// Fetch the text of a specific revision.
    ///
    /// Returns `Ok(None)` if the source has no revision history.
    async fn read_revision(&self, revision: &RevisionId) -> ReadResult<Option<String>> {
        let _ = revision;
        Ok(None)
    }
}
