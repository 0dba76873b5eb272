//! Dotted namespace validation.
//!
//! The repackaging engine treats namespaces as opaque text, so malformed
//! names have to be caught here, before anything is staged.

/// Check that `namespace` is a dotted sequence of identifiers.
///
/// Each segment must be non-empty, consist of alphanumeric characters or
/// `_`, and must not start with a digit.
pub fn check_namespace(namespace: &str) -> Result<(), String> {
    if namespace.is_empty() {
        return Err("namespace must not be empty".to_string());
    }
    for (i, segment) in namespace.split('.').enumerate() {
        if segment.is_empty() {
            return Err(format!("namespace {namespace:?} has an empty segment at position {i}"));
        }
        if segment.starts_with(|c: char| c.is_ascii_digit()) {
            return Err(format!(
                "namespace {namespace:?} segment {segment:?} starts with a digit"
            ));
        }
        if let Some(bad) = segment.chars().find(|c| !(c.is_alphanumeric() || *c == '_')) {
            return Err(format!(
                "namespace {namespace:?} contains invalid character {bad:?}"
            ));
        }
    }
    Ok(())
}
