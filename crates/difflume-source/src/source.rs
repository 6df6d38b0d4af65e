//! The stateful content source.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tracing::{debug, info, warn};

use crate::cache::{RevisionCache, RevisionId, RevisionKey};
use crate::content::{parse_content, Content};
use crate::couchdb::CouchDbFetcher;
use crate::cursor::RevisionCursor;
use crate::error::{ReadResult, RevisionNotFoundError};
use crate::fetcher::SourceFetcher;
use crate::fs::FsFetcher;
use crate::http::HttpFetcher;

/// Lifecycle of a [`ContentSource`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceState {
    /// Nothing fetched yet, or the last load failed.
    Unloaded,
    /// A load is in flight.
    Loading,
    /// Latest content and the revision list are available.
    Ready,
}

#[derive(Debug, Default)]
struct Loaded {
    revisions: Vec<RevisionId>,
    cache: RevisionCache,
}

/// A document location plus everything fetched from it so far.
///
/// All methods take `&self`; a source can be shared between tasks. Each
/// source owns its cache, so two sources never observe each other's state.
pub struct ContentSource {
    fetcher: Box<dyn SourceFetcher>,
    loaded: RwLock<Loaded>,
    loading: AtomicBool,
}

/// Clears the loading flag when a load finishes, fails, or is dropped.
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ContentSource {
    pub fn new(fetcher: impl SourceFetcher + 'static) -> Self {
        Self::from_boxed(Box::new(fetcher))
    }

    pub fn from_boxed(fetcher: Box<dyn SourceFetcher>) -> Self {
        Self {
            fetcher,
            loaded: RwLock::new(Loaded::default()),
            loading: AtomicBool::new(false),
        }
    }

    /// A file on the local filesystem.
    pub fn filesystem(path: impl Into<std::path::PathBuf>) -> Self {
        Self::new(FsFetcher::new(path))
    }

    /// A document served over HTTP.
    pub fn http(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self::new(HttpFetcher::new(url, client))
    }

    /// A CouchDB document or admin-console link.
    pub fn couchdb(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self::new(CouchDbFetcher::new(url, client))
    }

    pub fn location(&self) -> String {
        self.fetcher.location()
    }

    pub fn state(&self) -> SourceState {
        if self.is_ready() {
            SourceState::Ready
        } else if self.loading.load(Ordering::Acquire) {
            SourceState::Loading
        } else {
            SourceState::Unloaded
        }
    }

    /// Whether latest content is cached.
    pub fn is_ready(&self) -> bool {
        self.loaded
            .read()
            .expect("lock poisoned")
            .cache
            .contains(&RevisionKey::Latest)
    }

    /// Fetch the latest content and the revision list.
    ///
    /// Does nothing if the source is already loaded. On success the latest
    /// content is cached under [`RevisionKey::Latest`] and, when revisions
    /// exist, under the newest revision too. On failure nothing changes and
    /// the load may be retried.
    pub async fn load(&self) -> ReadResult<()> {
        if self.is_ready() {
            debug!(source = %self.location(), "already loaded");
            return Ok(());
        }

        self.loading.store(true, Ordering::Release);
        let _guard = LoadingGuard(&self.loading);

        self.fetcher.rewrite_inputs();
        let location = self.location();
        debug!(source = %location, "loading");

        let text = self.fetcher.read_text().await.inspect_err(|e| {
            warn!(source = %location, error = %e, "load failed");
        })?;
        let content = Arc::new(parse_content(&text));
        let revisions = self.fetcher.read_revisions().await.inspect_err(|e| {
            warn!(source = %location, error = %e, "load failed");
        })?;

        let mut loaded = self.loaded.write().expect("lock poisoned");
        if !loaded.cache.insert(RevisionKey::Latest, content.clone()) {
            debug!(source = %location, "loaded concurrently, keeping first result");
            return Ok(());
        }
        if let Some(newest) = revisions.first() {
            loaded.cache.insert(RevisionKey::Specific(newest.clone()), content.clone());
        }
        info!(
            source = %location,
            text_type = ?content.text_type(),
            revisions = revisions.len(),
            "loaded"
        );
        loaded.revisions = revisions;
        Ok(())
    }

    /// Fetch one revision into the cache.
    ///
    /// Does nothing if the revision is cached or the source has no revision
    /// history.
    pub async fn load_revision(&self, revision: &RevisionId) -> ReadResult<()> {
        let key = RevisionKey::Specific(revision.clone());
        if self.loaded.read().expect("lock poisoned").cache.contains(&key) {
            debug!(source = %self.location(), %revision, "revision already cached");
            return Ok(());
        }

        let Some(text) = self.fetcher.read_revision(revision).await? else {
            debug!(source = %self.location(), %revision, "source has no revisions");
            return Ok(());
        };
        let content = Arc::new(parse_content(&text));

        self.loaded
            .write()
            .expect("lock poisoned")
            .cache
            .insert(key, content);
        debug!(source = %self.location(), %revision, "revision loaded");
        Ok(())
    }

    /// Cached content for `revision`, or the latest content for `None`.
    pub fn get_content(
        &self,
        revision: Option<&RevisionId>,
    ) -> Result<Arc<Content>, RevisionNotFoundError> {
        self.get(&RevisionKey::from(revision.cloned()))
    }

    pub fn get(&self, key: &RevisionKey) -> Result<Arc<Content>, RevisionNotFoundError> {
        self.loaded
            .read()
            .expect("lock poisoned")
            .cache
            .get(key)
            .ok_or_else(|| RevisionNotFoundError { key: key.clone() })
    }

    /// Revisions known after the last successful load, newest first.
    pub fn revisions(&self) -> Vec<RevisionId> {
        self.loaded.read().expect("lock poisoned").revisions.clone()
    }

    /// A cursor over [`revisions`](Self::revisions), positioned on the newest.
    pub fn cursor(&self) -> RevisionCursor {
        RevisionCursor::new(self.revisions())
    }
}

impl fmt::Debug for ContentSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentSource")
            .field("location", &self.location())
            .field("state", &self.state())
            .finish()
    }
}
