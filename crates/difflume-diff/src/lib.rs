//! Diff engine for DiffLume.
//!
//! Produces human-readable, line-oriented diffs of two texts. Every output
//! line carries a two-character prefix:
//!
//! | Prefix | Meaning |
//! |--------|---------|
//! | `"  "` | line present on both sides |
//! | `"- "` | line only on the left |
//! | `"+ "` | line only on the right |
//! | `"? "` | guide line marking intraline changes of the line above |
//!
//! # Key Types
//!
//! - [`SequenceMatcher`] -- longest-matching-block matcher emitting [`similar::DiffOp`]s
//! - [`Ndiff`] / [`NdiffCollapsed`] -- the two [`DiffEngine`] variants
//! - [`DiffType`] -- name-based engine selector
//! - [`DiffResult`] / [`HighlightRule`] -- diff text plus highlight patterns

pub mod collapse;
pub mod config;
pub mod engine;
pub mod error;
pub mod highlight;
pub mod matcher;
pub mod ndiff;

pub use collapse::collapse;
pub use config::DiffConfig;
pub use engine::{create_diff, select_engine, DiffEngine, DiffResult, DiffType, Ndiff, NdiffCollapsed};
pub use error::{DiffError, Result};
pub use highlight::{HighlightCategory, HighlightRule, HighlightSpan};
pub use matcher::SequenceMatcher;
pub use ndiff::{ndiff, split_lines};
