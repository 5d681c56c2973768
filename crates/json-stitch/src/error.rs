//! Error types.
//!
//! [`StitchError`] is the only error the core surfaces. Everything that goes
//! wrong while applying fragments is recovered in place and reported as a
//! [`SkipReason`] through the rebuilder's diagnostics instead.

use json_stitch_path::{PathError, PathStep};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StitchError {
    /// Write access was requested for a document that is complete or locked.
    #[error("document already complete: {0}")]
    DocumentComplete(String),
}

/// Why a single fragment update was skipped.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("invalid path {path:?}: {source}")]
    InvalidPath { path: String, source: PathError },
    #[error("cannot apply step {step} to {found}")]
    KindMismatch { step: PathStep, found: &'static str },
    #[error("index {index} leaves a gap past array length {len}")]
    IndexGap { index: usize, len: usize },
}
