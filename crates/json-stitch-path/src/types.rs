//! Type definitions for fragment paths.

use std::fmt;

/// A step in a fragment path.
///
/// Either an object member name or an array slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathStep {
    /// Object member, written `.name` or `["name"]`.
    Key(String),
    /// Array slot, written `[0]`.
    Index(usize),
}

/// A parsed fragment path. The empty path is the document root.
pub type FragmentPath = Vec<PathStep>;

impl PathStep {
    /// Returns `true` for array slots.
    ///
    /// Container inference uses this as its look-ahead: a container created to
    /// hold an `Index` step must be an array.
    pub fn is_index(&self) -> bool {
        matches!(self, PathStep::Index(_))
    }
}

impl From<&str> for PathStep {
    fn from(key: &str) -> Self {
        PathStep::Key(key.to_string())
    }
}

impl From<String> for PathStep {
    fn from(key: String) -> Self {
        PathStep::Key(key)
    }
}

impl From<usize> for PathStep {
    fn from(index: usize) -> Self {
        PathStep::Index(index)
    }
}

impl fmt::Display for PathStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathStep::Key(k) if crate::util::is_plain_key(k) => write!(f, ".{k}"),
            PathStep::Key(k) => {
                // Serializing a &str into JSON cannot fail.
                let quoted = serde_json::to_string(k).map_err(|_| fmt::Error)?;
                write!(f, "[{quoted}]")
            }
            PathStep::Index(i) => write!(f, "[{i}]"),
        }
    }
}
