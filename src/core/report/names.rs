//! Display names derived from image paths.

use std::path::Path;

/// Final path component, treating both `/` and `\` as separators.
///
/// Listings produced on one platform and reported on another still
/// yield the bare file name.
pub fn base_name(path: &Path) -> String {
    let full = path.to_string_lossy();
    let normalized = full.replace('\\', "/");
    normalized
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default()
        .to_string()
}
