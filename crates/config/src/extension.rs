//! File extension normalisation.

/// Normalises a configured file extension: surrounding whitespace and any
/// leading dots are removed and the result is lower-cased.
///
/// ```
/// use photo_import_config::normalize_extension;
///
/// assert_eq!(normalize_extension(".JPG"), "jpg");
/// assert_eq!(normalize_extension(" raw "), "raw");
/// ```
pub fn normalize(extension: &str) -> String {
    extension.trim().trim_start_matches('.').to_lowercase()
}
