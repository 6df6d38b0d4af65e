//! Revision-keyed content cache.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::content::Content;

/// Opaque revision identifier as reported by the source (e.g. `2-7051cb`).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionId(String);

impl RevisionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RevisionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RevisionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RevisionId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for RevisionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Cache key: the current version, or a specific revision.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RevisionKey {
    Latest,
    Specific(RevisionId),
}

impl From<RevisionId> for RevisionKey {
    fn from(id: RevisionId) -> Self {
        RevisionKey::Specific(id)
    }
}

impl From<Option<RevisionId>> for RevisionKey {
    fn from(id: Option<RevisionId>) -> Self {
        id.map_or(RevisionKey::Latest, RevisionKey::Specific)
    }
}

impl fmt::Display for RevisionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RevisionKey::Latest => f.write_str("latest"),
            RevisionKey::Specific(id) => write!(f, "{id}"),
        }
    }
}

/// Write-once map from revision key to parsed content.
///
/// Entries are never replaced. `Latest` and the newest specific revision may
/// share the same `Arc`.
#[derive(Debug, Default)]
pub struct RevisionCache {
    entries: HashMap<RevisionKey, Arc<Content>>,
}

impl RevisionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &RevisionKey) -> Option<Arc<Content>> {
        self.entries.get(key).cloned()
    }

    pub fn contains(&self, key: &RevisionKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Store `content` under `key` unless the key is already present.
    ///
    /// Returns `true` if the entry was inserted.
    pub fn insert(&mut self, key: RevisionKey, content: Arc<Content>) -> bool {
        use std::collections::hash_map::Entry;
        match self.entries.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(content);
                true
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &RevisionKey> {
        self.entries.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::parse_content;

    #[test]
    fn insert_never_overwrites() {
        let mut cache = RevisionCache::new();
        let first = Arc::new(parse_content("first"));
        let second = Arc::new(parse_content("second"));

        assert!(cache.insert(RevisionKey::Latest, first.clone()));
        assert!(!cache.insert(RevisionKey::Latest, second));
        assert_eq!(cache.get(&RevisionKey::Latest).unwrap().text(), "first");
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn latest_and_revision_can_share_content() {
        let mut cache = RevisionCache::new();
        let content = Arc::new(parse_content("{}"));
        let key = RevisionKey::from(RevisionId::new("1-abc"));

        cache.insert(RevisionKey::Latest, content.clone());
        cache.insert(key.clone(), content);

        let latest = cache.get(&RevisionKey::Latest).unwrap();
        let specific = cache.get(&key).unwrap();
        assert!(Arc::ptr_eq(&latest, &specific));
    }

    #[test]
    fn missing_key() {
        let cache = RevisionCache::new();
        assert!(cache.is_empty());
        assert!(cache.get(&RevisionKey::Latest).is_none());
        assert!(!cache.contains(&RevisionKey::Specific("1-a".into())));
    }

    #[test]
    fn key_from_optional_revision() {
        assert_eq!(RevisionKey::from(None::<RevisionId>), RevisionKey::Latest);
        assert_eq!(
            RevisionKey::from(Some(RevisionId::new("2-b"))),
            RevisionKey::Specific(RevisionId::new("2-b"))
        );
    }

    #[test]
    fn key_display() {
        assert_eq!(RevisionKey::Latest.to_string(), "latest");
        assert_eq!(RevisionKey::Specific("3-c".into()).to_string(), "3-c");
    }
}
