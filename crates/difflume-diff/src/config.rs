use serde::{Deserialize, Serialize};

use crate::engine::{
    DiffEngine, DiffType, Ndiff, NdiffCollapsed, DEFAULT_DELIMITER, DEFAULT_PRESERVE_ROWS,
};

/// User-facing diff settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Variant used when none is requested explicitly.
    pub diff_type: DiffType,
    /// Context rows kept around each change by the collapsed variant.
    pub preserve_rows: usize,
    /// Line standing in for each collapsed region.
    pub delimiter: String,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            diff_type: DiffType::default(),
            preserve_rows: DEFAULT_PRESERVE_ROWS,
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

impl DiffConfig {
    /// Engine for the configured variant.
    pub fn engine(&self) -> Box<dyn DiffEngine> {
        self.engine_for(self.diff_type)
    }

    /// Engine for `diff_type`, parameterised by this config.
    pub fn engine_for(&self, diff_type: DiffType) -> Box<dyn DiffEngine> {
        match diff_type {
            DiffType::Ndiff => Box::new(Ndiff),
            DiffType::NdiffCollapsed => Box::new(NdiffCollapsed::new(
                self.preserve_rows,
                self.delimiter.clone(),
            )),
        }
    }
}
