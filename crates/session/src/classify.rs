use std::collections::BTreeSet;

/// Returns the extensions that were found but are neither included nor
/// excluded: `found − include − exclude`.
///
/// These are the files that will be skipped without the operator having
/// said so in the configuration. An extension present in both `include` and
/// `exclude` is included; `exclude` only silences the warning for extensions
/// outside `include`.
pub fn classify<S: AsRef<str>>(
    found: impl IntoIterator<Item = S>,
    include: &BTreeSet<String>,
    exclude: &BTreeSet<String>,
) -> BTreeSet<String> {
    found
        .into_iter()
        .map(|ext| ext.as_ref().to_string())
        .filter(|ext| !include.contains(ext) && !exclude.contains(ext))
        .collect()
}
