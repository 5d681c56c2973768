//! Fragment path utilities.
//!
//! Fragment updates address their target inside a document with paths such as
//! `root`, `root.name` or `root.items[0].tags[2]`. This crate parses those
//! paths into typed [`PathStep`]s, formats them back, and enforces the
//! length and depth limits writers apply before touching a document.
//!
//! # Example
//!
//! ```
//! use json_stitch_path::{format_fragment_path, validate_fragment_path, PathStep};
//!
//! let path = validate_fragment_path("root.items[1].name", 8).unwrap();
//! assert_eq!(path[1], PathStep::Index(1));
//! assert_eq!(format_fragment_path(&path), "root.items[1].name");
//! ```

use thiserror::Error;

pub mod types;
pub mod util;
pub mod validate;

pub use types::{FragmentPath, PathStep};
pub use util::{format_fragment_path, is_integer, is_plain_key, parse_fragment_path, ROOT};
pub use validate::{validate_fragment_path, MAX_PATH_DEPTH, MAX_PATH_TEXT_LENGTH};

/// Byte offsets refer to the path text being parsed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("EMPTY_SEGMENT at byte {0}")]
    EmptySegment(usize),
    #[error("UNTERMINATED_BRACKET at byte {0}")]
    UnterminatedBracket(usize),
    #[error("INVALID_INDEX at byte {0}")]
    InvalidIndex(usize),
    #[error("INVALID_KEY at byte {0}")]
    InvalidKey(usize),
    #[error("UNEXPECTED_CHAR {ch:?} at byte {pos}")]
    UnexpectedChar { pos: usize, ch: char },
    #[error("Path too long")]
    PathTooLong,
    #[error("Path too deep")]
    PathTooDeep,
}
