use serde::Deserialize;

/// Limits applied while resolving fragment paths.
///
/// Loadable from TOML:
///
/// ```toml
/// max_index_gap = 64
/// max_depth = 32
/// ```
/// Hard ceiling on `max_index_gap`. Larger settings are clamped to it.
pub const MAX_INDEX_GAP: usize = 65_536;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StitchOptions {
    /// Most `null` slots a single write may pad onto an array. Writing index
    /// `i` into an array of length `len` needs `i - len` padding slots.
    /// Never more than [`MAX_INDEX_GAP`].
    pub max_index_gap: usize,
    /// Deepest path a write may target.
    pub max_depth: usize,
}

impl Default for StitchOptions {
    fn default() -> Self {
        Self {
            max_index_gap: 1024,
            max_depth: json_stitch_path::MAX_PATH_DEPTH,
        }
    }
}

impl StitchOptions {
    /// `max_index_gap`, clamped to [`MAX_INDEX_GAP`].
    pub fn index_gap_limit(&self) -> usize {
        self.max_index_gap.min(MAX_INDEX_GAP)
    }
}
