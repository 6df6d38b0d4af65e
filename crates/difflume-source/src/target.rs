//! Choosing a source kind for a user-supplied location.

use std::fmt;
use std::str::FromStr;

use difflume_url::UrlParts;
use serde::{Deserialize, Serialize};

use crate::error::SourceKindError;
use crate::source::ContentSource;

/// Default CouchDB port, used to recognise plain document URLs.
const COUCHDB_PORT: &str = ":5984";
/// First path segment of the CouchDB admin consoles.
const ADMIN_SEGMENT: &str = "_utils";

/// Which fetcher to use for a location.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Decide from the location itself.
    #[default]
    Auto,
    File,
    Http,
    CouchDb,
}

impl SourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            SourceKind::Auto => "auto",
            SourceKind::File => "file",
            SourceKind::Http => "http",
            SourceKind::CouchDb => "couchdb",
        }
    }

    /// Guess the kind of `location`.
    ///
    /// HTTP(S) URLs pointing into the admin console or at the default CouchDB
    /// port are CouchDB documents, other HTTP(S) URLs are plain HTTP, and
    /// anything else is a file path.
    pub fn detect(location: &str) -> SourceKind {
        let parts = UrlParts::parse(location);
        if !matches!(parts.scheme.as_str(), "http" | "https") {
            return SourceKind::File;
        }
        let admin = parts.path_segments().next() == Some(ADMIN_SEGMENT);
        if admin || parts.netloc.ends_with(COUCHDB_PORT) {
            SourceKind::CouchDb
        } else {
            SourceKind::Http
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SourceKind {
    type Err = SourceKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(SourceKind::Auto),
            "file" | "fs" => Ok(SourceKind::File),
            "http" | "url" => Ok(SourceKind::Http),
            "couchdb" | "couch" => Ok(SourceKind::CouchDb),
            _ => Err(SourceKindError::Unknown(s.to_owned())),
        }
    }
}

/// A location plus the kind of source to open it with.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceTarget {
    #[serde(default)]
    pub kind: SourceKind,
    pub location: String,
}

impl SourceTarget {
    pub fn new(kind: SourceKind, location: impl Into<String>) -> Self {
        Self {
            kind,
            location: location.into(),
        }
    }

    /// Target whose kind is detected from `location`.
    pub fn auto(location: impl Into<String>) -> Self {
        Self::new(SourceKind::Auto, location)
    }

    /// The concrete kind; never [`SourceKind::Auto`].
    pub fn resolved_kind(&self) -> SourceKind {
        match self.kind {
            SourceKind::Auto => SourceKind::detect(&self.location),
            kind => kind,
        }
    }

    /// Build an unloaded source for this target.
    pub fn open(&self, client: &reqwest::Client) -> ContentSource {
        match self.resolved_kind() {
            SourceKind::Http => ContentSource::http(self.location.clone(), client.clone()),
            SourceKind::CouchDb => ContentSource::couchdb(self.location.clone(), client.clone()),
            SourceKind::File | SourceKind::Auto => ContentSource::filesystem(&self.location),
        }
    }
}
