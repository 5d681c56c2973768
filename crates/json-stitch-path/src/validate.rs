//! Limits on fragment paths.

use crate::types::FragmentPath;
use crate::PathError;

/// Maximum allowed fragment path text length, in bytes.
pub const MAX_PATH_TEXT_LENGTH: usize = 1024;

/// Default maximum path depth.
pub const MAX_PATH_DEPTH: usize = 256;

/// Parse a fragment path, rejecting text longer than
/// [`MAX_PATH_TEXT_LENGTH`] and paths deeper than `max_depth`.
///
/// The length check runs before parsing.
///
/// # Example
///
/// ```
/// use json_stitch_path::{validate_fragment_path, PathError, MAX_PATH_DEPTH};
///
/// assert_eq!(validate_fragment_path("root.items[0]", MAX_PATH_DEPTH).unwrap().len(), 2);
/// assert_eq!(validate_fragment_path("root.a.b", 1), Err(PathError::PathTooDeep));
/// validate_fragment_path("root.items[", MAX_PATH_DEPTH).unwrap_err();
/// ```
pub fn validate_fragment_path(path: &str, max_depth: usize) -> Result<FragmentPath, PathError> {
    if path.len() > MAX_PATH_TEXT_LENGTH {
        return Err(PathError::PathTooLong);
    }
    let steps = crate::parse_fragment_path(path)?;
    if steps.len() > max_depth {
        return Err(PathError::PathTooDeep);
    }
    Ok(steps)
}
