//! Mapping from dotted namespaces to directory fragments.

use std::path::{MAIN_SEPARATOR, MAIN_SEPARATOR_STR, Path, PathBuf};

/// Convert a dotted namespace into a relative directory path.
///
/// Every `.` becomes a path separator and the result always ends with a
/// separator, so a filename can be appended directly:
/// `namespace_path("a.b.c")` is `"a/b/c/"` on Unix.
///
/// Malformed names (empty segments and the like) are passed through as-is;
/// they are rejected during configuration validation.
pub fn namespace_path(namespace: &str) -> String {
    let mut path = namespace.replace('.', MAIN_SEPARATOR_STR);
    path.push(MAIN_SEPARATOR);
    path
}

/// Directory under `root` that holds the sources of `namespace`.
pub fn namespace_dir(root: &Path, namespace: &str) -> PathBuf {
    root.join(namespace_path(namespace))
}
