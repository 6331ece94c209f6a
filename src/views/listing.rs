//! Grouping of stored artifact file names for the index page.

use std::collections::BTreeMap;

/// Split `<name>-<version>.gem` into `(name, version)` on the last hyphen.
///
/// Returns `None` when there is no hyphen or either side is empty.
pub fn split_artifact_name(file_name: &str) -> Option<(&str, &str)> {
    let stem = file_name.strip_suffix(".gem").unwrap_or(file_name);
    let (name, version) = stem.rsplit_once('-')?;
    if name.is_empty() || version.is_empty() {
        return None;
    }
    Some((name, version))
}

/// Group artifact file names by package name, versions in listing order.
pub fn group_artifacts<S: AsRef<str>>(file_names: &[S]) -> BTreeMap<String, Vec<String>> {
    let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for file_name in file_names {
        match split_artifact_name(file_name.as_ref()) {
            Some((name, version)) => grouped
                .entry(name.to_string())
                .or_default()
                .push(version.to_string()),
            None => {
                tracing::debug!(file = file_name.as_ref(), "Skipping unversioned artifact name");
            }
        }
    }
    grouped
}
