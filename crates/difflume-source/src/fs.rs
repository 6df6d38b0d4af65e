//! Filesystem source.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::{ReadError, ReadResult};
use crate::fetcher::SourceFetcher;

/// A local file, read as UTF-8.
#[derive(Clone, Debug)]
pub struct FsFetcher {
    path: PathBuf,
}

impl FsFetcher {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SourceFetcher for FsFetcher {
    fn location(&self) -> String {
        self.path.display().to_string()
    }

    async fn read_text(&self) -> ReadResult<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| ReadError::File {
                path: self.path.clone(),
                source,
            })
    }
}
