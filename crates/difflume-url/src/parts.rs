//! Six-component URL split and reassembly.
//!
//! The split follows the generic URL grammar:
//!
//! ```text
//! scheme://netloc/path;params?query#fragment
//! ```
//!
//! `params` is only separated from the path for schemes that define
//! path parameters (`http`, `https`, `ftp`, ...). For any other scheme the
//! `;` stays part of the path.

use std::borrow::Cow;

use crate::error::{UrlError, UrlResult};

/// Schemes whose last path segment may carry `;params`.
const USES_PARAMS: &[&str] = &[
    "", "ftp", "hdl", "prospero", "http", "imap", "https", "shttp", "rtsp", "rtsps", "rtspu",
    "sip", "sips", "mms", "sftp", "tel",
];

/// Schemes that always carry a `//netloc` section, even an empty one.
const USES_NETLOC: &[&str] = &[
    "", "ftp", "http", "gopher", "nntp", "telnet", "imap", "wais", "file", "mms", "https",
    "shttp", "snews", "prospero", "rtsp", "rtsps", "rtspu", "rsync", "svn", "svn+ssh", "sftp",
    "nfs", "git", "git+ssh", "ws", "wss",
];

/// Characters left untouched when quoting a path.
const PATH_SAFE: &[char] = &['/', '%', '+'];

/// Characters that end the netloc section.
const NETLOC_END: &[char] = &['/', '?', '#'];

/// A URL split into its named components.
///
/// Components are stored without their separators: `query` has no leading
/// `?`, `fragment` no leading `#`, and so on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UrlParts {
    /// Lowercased scheme, e.g. `http`.
    pub scheme: String,
    /// Authority section (`user:pass@host:port`).
    pub netloc: String,
    /// Hierarchical path.
    pub path: String,
    /// Parameters of the last path segment.
    pub params: String,
    /// Query string.
    pub query: String,
    /// Fragment identifier.
    pub fragment: String,
}

impl UrlParts {
    /// Split `url` into its components.
    ///
    /// # Examples
    ///
    /// ```
    /// use difflume_url::UrlParts;
    ///
    /// let parts = UrlParts::parse("http://localhost:5984/db/doc?rev=1-abc");
    /// assert_eq!(parts.netloc, "localhost:5984");
    /// assert_eq!(parts.path, "/db/doc");
    /// assert_eq!(parts.query, "rev=1-abc");
    /// ```
    pub fn parse(url: &str) -> Self {
        let (scheme, rest) = split_scheme(url);

        let (netloc, rest) = match rest.strip_prefix("//") {
            Some(after) => {
                let end = after.find(NETLOC_END).unwrap_or(after.len());
                (after[..end].to_string(), &after[end..])
            }
            None => (String::new(), rest),
        };

        let (rest, fragment) = rest.split_once('#').unwrap_or((rest, ""));
        let (rest, query) = rest.split_once('?').unwrap_or((rest, ""));

        let (path, params) = if USES_PARAMS.contains(&scheme.as_str()) && rest.contains(';') {
            split_params(rest)
        } else {
            (rest, "")
        };

        Self {
            scheme,
            netloc,
            path: path.to_string(),
            params: params.to_string(),
            query: query.to_string(),
            fragment: fragment.to_string(),
        }
    }

    /// Reassemble the URL exactly as stored.
    pub fn build(&self) -> String {
        self.assemble(Cow::Borrowed(&self.path))
    }

    /// Reassemble the URL with the path percent-encoded.
    ///
    /// `/`, `%`, and `+` are left as they are, so an already-encoded path
    /// passes through unchanged.
    pub fn build_quoted(&self) -> String {
        self.assemble(Cow::Owned(quote_path(&self.path)))
    }

    /// Append `key=value` to the query string.
    ///
    /// # Examples
    ///
    /// ```
    /// use difflume_url::UrlParts;
    ///
    /// let mut parts = UrlParts::parse("http://h/db/doc");
    /// parts.add_query("revs_info", "true").add_query("rev", "2-b");
    /// assert_eq!(parts.build(), "http://h/db/doc?revs_info=true&rev=2-b");
    /// ```
    pub fn add_query(&mut self, key: &str, value: &str) -> &mut Self {
        let pair = format!("{key}={value}");
        if self.query.is_empty() {
            self.query = pair;
        } else {
            self.query.push('&');
            self.query.push_str(&pair);
        }
        self
    }

    /// By-value form of [`add_query`](Self::add_query).
    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.add_query(key, value);
        self
    }

    /// Non-empty `/`-separated segments of the path.
    pub fn path_segments(&self) -> impl Iterator<Item = &str> {
        self.path.split('/').filter(|segment| !segment.is_empty())
    }

    /// The path with percent-escapes decoded, for display.
    pub fn display_path(&self) -> UrlResult<String> {
        urlencoding::decode(&self.path)
            .map(Cow::into_owned)
            .map_err(|source| UrlError::Encoding {
                path: self.path.clone(),
                source,
            })
    }

    fn assemble(&self, path: Cow<'_, str>) -> String {
        let mut url = String::new();

        if !self.scheme.is_empty() {
            url.push_str(&self.scheme);
            url.push(':');
        }

        let needs_netloc_marker = !self.netloc.is_empty()
            || path.starts_with("//")
            || (!self.scheme.is_empty()
                && USES_NETLOC.contains(&self.scheme.as_str())
                && (path.is_empty() || path.starts_with('/')));

        if needs_netloc_marker {
            url.push_str("//");
            url.push_str(&self.netloc);
            if !self.netloc.is_empty() && !path.is_empty() && !path.starts_with('/') {
                url.push('/');
            }
        }
        url.push_str(&path);

        if !self.params.is_empty() {
            url.push(';');
            url.push_str(&self.params);
        }
        if !self.query.is_empty() {
            url.push('?');
            url.push_str(&self.query);
        }
        if !self.fragment.is_empty() {
            url.push('#');
            url.push_str(&self.fragment);
        }
        url
    }
}

impl std::fmt::Display for UrlParts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.build())
    }
}

/// Split `url` into [`UrlParts`].
pub fn parse(url: &str) -> UrlParts {
    UrlParts::parse(url)
}

/// Reassemble `parts`, percent-encoding the path when `quote` is set.
pub fn build(parts: &UrlParts, quote: bool) -> String {
    if quote {
        parts.build_quoted()
    } else {
        parts.build()
    }
}

fn split_scheme(url: &str) -> (String, &str) {
    if let Some((candidate, rest)) = url.split_once(':') {
        let mut chars = candidate.chars();
        let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
            && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
        if valid {
            return (candidate.to_ascii_lowercase(), rest);
        }
    }
    (String::new(), url)
}

/// Params belong to the last path segment only.
fn split_params(path: &str) -> (&str, &str) {
    let search_from = path.rfind('/').unwrap_or(0);
    match path[search_from..].find(';') {
        Some(offset) => {
            let i = search_from + offset;
            (&path[..i], &path[i + 1..])
        }
        None => (path, ""),
    }
}

fn quote_path(path: &str) -> String {
    let mut quoted = String::with_capacity(path.len());
    let mut chunk_start = 0;
    for (i, ch) in path.char_indices() {
        if PATH_SAFE.contains(&ch) {
            quoted.push_str(&urlencoding::encode(&path[chunk_start..i]));
            quoted.push(ch);
            chunk_start = i + ch.len_utf8();
        }
    }
    quoted.push_str(&urlencoding::encode(&path[chunk_start..]));
    quoted
}
