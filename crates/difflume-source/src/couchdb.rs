//! CouchDB document source.
//!
//! Besides plain document URLs (`http://host:5984/db/doc`), links copied
//! from the CouchDB admin consoles are accepted and rewritten to the
//! document URL before the first request:
//!
//! - Futon: `http://host:5984/_utils/document.html?db/doc[@rev]`
//! - Fauxton: `http://host:5984/_utils/#database/db/doc`

use std::sync::OnceLock;

use async_trait::async_trait;
use difflume_url::UrlParts;
use serde::Deserialize;
use tracing::{debug, info};

use crate::cache::RevisionId;
use crate::error::{ReadError, ReadResult};
use crate::fetcher::SourceFetcher;
use crate::http::get_text;

/// Path prefix of both admin consoles.
const ADMIN_PREFIX: &str = "/_utils";

const FUTON_DOCUMENT: &str = "/_utils/document.html";
const FAUXTON_DATABASE: &str = "database/";
const AVAILABLE: &str = "available";

/// Rewrite a Futon or Fauxton document link to the plain document URL.
///
/// Any other URL is returned with its path percent-encoded but otherwise
/// unchanged.
///
/// # Examples
///
/// ```
/// use difflume_source::rewrite_admin_url;
///
/// assert_eq!(
///     rewrite_admin_url("http://h:5984/_utils/document.html?db/doc@2-b"),
///     "http://h:5984/db/doc?rev=2-b"
/// );
/// assert_eq!(
///     rewrite_admin_url("http://h:5984/_utils/#database/db/doc"),
///     "http://h:5984/db/doc"
/// );
/// ```
pub fn rewrite_admin_url(url: &str) -> String {
    let mut parts = UrlParts::parse(url);

    if parts.path.starts_with(FUTON_DOCUMENT) {
        let query = std::mem::take(&mut parts.query);
        let (document, revision) = match query.split_once('@') {
            Some((document, revision)) => (document, Some(revision)),
            None => (query.as_str(), None),
        };
        parts.path = document.to_owned();
        if let Some(revision) = revision {
            parts.add_query("rev", revision);
        }
    } else if parts.path.starts_with(ADMIN_PREFIX) {
        let fragment = parts.fragment.strip_prefix('/').unwrap_or(&parts.fragment);
        if let Some(document) = fragment.strip_prefix(FAUXTON_DATABASE) {
            parts.path = document.to_owned();
            parts.fragment.clear();
        }
    }

    parts.build_quoted()
}

/// Set `key=value` on the query of `url`, replacing earlier values of `key`.
fn with_param(url: &str, key: &str, value: &str) -> String {
    let mut parts = UrlParts::parse(url);
    let prefix = format!("{key}=");
    parts.query = parts
        .query
        .split('&')
        .filter(|pair| !pair.is_empty() && !pair.starts_with(&prefix) && *pair != key)
        .collect::<Vec<_>>()
        .join("&");
    parts.with_query(key, value).build()
}

#[derive(Debug, Deserialize)]
struct RevsInfoResponse {
    #[serde(rename = "_revs_info")]
    revs_info: Vec<RevInfo>,
}

#[derive(Debug, Deserialize)]
struct RevInfo {
    rev: String,
    status: String,
}

/// A CouchDB document with its revision history.
#[derive(Debug)]
pub struct CouchDbFetcher {
    raw_url: String,
    url: OnceLock<String>,
    client: reqwest::Client,
}

impl CouchDbFetcher {
    pub fn new(url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            raw_url: url.into(),
            url: OnceLock::new(),
            client,
        }
    }

    /// The document URL, rewritten on first use.
    pub fn url(&self) -> &str {
        self.url.get_or_init(|| {
            let url = rewrite_admin_url(&self.raw_url);
            if url != self.raw_url {
                info!(from = %self.raw_url, to = %url, "rewrote CouchDB link");
            }
            url
        })
    }
}

#[async_trait]
impl SourceFetcher for CouchDbFetcher {
    fn location(&self) -> String {
        self.url.get().unwrap_or(&self.raw_url).clone()
    }

    fn rewrite_inputs(&self) {
        self.url();
    }

    async fn read_text(&self) -> ReadResult<String> {
        let url = self.url();
        get_text(&self.client, url)
            .await
            .map_err(|source| ReadError::Url {
                url: url.to_owned(),
                source,
            })
    }

    async fn read_revisions(&self) -> ReadResult<Vec<RevisionId>> {
        let url = with_param(self.url(), "revs_info", "true");
        let failed = |reason: String| ReadError::Revisions {
            url: url.clone(),
            reason,
        };

        let body = get_text(&self.client, &url)
            .await
            .map_err(|e| failed(e.to_string()))?;
        let response: RevsInfoResponse =
            serde_json::from_str(&body).map_err(|e| failed(e.to_string()))?;

        let revisions: Vec<RevisionId> = response
            .revs_info
            .into_iter()
            .filter(|info| info.status == AVAILABLE)
            .map(|info| RevisionId::from(info.rev))
            .collect();
        debug!(url = %url, count = revisions.len(), "read revisions");
        Ok(revisions)
    }

    async fn read_revision(&self, revision: &RevisionId) -> ReadResult<Option<String>> {
        let url = with_param(self.url(), "rev", revision.as_str());
        let text = get_text(&self.client, &url)
            .await
            .map_err(|e| ReadError::Revision {
                url: url.clone(),
                revision: revision.clone(),
                reason: e.to_string(),
            })?;
        Ok(Some(text))
    }
}
