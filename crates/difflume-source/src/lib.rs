//! Content sources for DiffLume.
//!
//! A content source fetches a document, canonicalizes it, and caches it by
//! revision so that two documents (or two revisions of one document) can be
//! handed to the diff engine.
//!
//! # Source Kinds
//!
//! All kinds implement [`SourceFetcher`] and are driven by [`ContentSource`]:
//!
//! - [`FsFetcher`] -- a file on the local filesystem
//! - [`HttpFetcher`] -- any URL answered by an HTTP GET
//! - [`CouchDbFetcher`] -- a CouchDB document, with revision history and
//!   rewriting of Futon/Fauxton admin-console links
//!
//! # Design Rules
//!
//! 1. Cached content is never overwritten; a revision is fetched at most once
//!    per successful load.
//! 2. A failed fetch leaves the cache untouched, so a load can be retried.
//! 3. JSON documents are cached in canonical form (sorted keys, two-space
//!    indent), so key order and whitespace never show up as differences.
//! 4. Sources share no state; each owns its cache.

pub mod cache;
pub mod config;
pub mod content;
pub mod couchdb;
pub mod cursor;
pub mod error;
pub mod fetcher;
pub mod fs;
pub mod http;
pub mod source;
pub mod target;

pub use cache::{RevisionCache, RevisionId, RevisionKey};
pub use config::SourceConfig;
pub use content::{parse_content, Content, TextType};
pub use couchdb::{rewrite_admin_url, CouchDbFetcher};
pub use cursor::{Direction, RevisionCursor};
pub use error::{ReadError, ReadResult, RevisionNotFoundError, SourceKindError};
pub use fetcher::SourceFetcher;
pub use fs::FsFetcher;
pub use http::HttpFetcher;
pub use source::{ContentSource, SourceState};
pub use target::{SourceKind, SourceTarget};
