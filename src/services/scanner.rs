use crate::error::TriggerError;
use crate::models::PendingUploadSet;
use std::fs;
use std::path::Path;

/// List the file names in `dir` ending with `suffix`.
///
/// Matching is on the entry name only and is case-sensitive. Names that are
/// not valid UTF-8 are ignored. The result is sorted so that two scans of an
/// unchanged directory compare equal.
pub fn scan(dir: &Path, suffix: &str) -> Result<PendingUploadSet, TriggerError> {
    let unavailable = |source| TriggerError::DirectoryUnavailable {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir).map_err(unavailable)? {
        let entry = entry.map_err(unavailable)?;
        if let Some(name) = entry.file_name().to_str() {
            if name.ends_with(suffix) {
                files.push(name.to_string());
            }
        }
    }
    files.sort();

    tracing::debug!("Scanned {}: {} pending upload(s)", dir.display(), files.len());
    Ok(PendingUploadSet { files })
}
