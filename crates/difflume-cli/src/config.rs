use std::path::Path;

use anyhow::Context;
use difflume_diff::DiffConfig;
use difflume_source::SourceConfig;
use serde::{Deserialize, Serialize};

use crate::cli::DiffArgs;

/// Settings read from `--config`, overridden by command-line flags.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub diff: DiffConfig,
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Load `path` if given, defaults otherwise. A named file must exist.
    pub fn load_or_default(path: Option<&Path>) -> anyhow::Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn with_timeout(mut self, timeout_secs: Option<u64>) -> Self {
        if let Some(secs) = timeout_secs {
            self.source.timeout_secs = secs;
        }
        self
    }

    /// Diff settings with the flags of `args` applied.
    pub fn diff_for(&self, args: &DiffArgs) -> DiffConfig {
        let mut diff = self.diff.clone();
        if let Some(diff_type) = args.diff_type {
            diff.diff_type = diff_type;
        }
        if let Some(rows) = args.preserve_rows {
            diff.preserve_rows = rows;
        }
        if let Some(delimiter) = &args.delimiter {
            diff.delimiter.clone_from(delimiter);
        }
        diff
    }
}
