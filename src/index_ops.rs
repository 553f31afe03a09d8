//! Index Manager: stage/unstage operations on the index. `rm`'s index
//! mutation lives in `rm.rs` alongside its safety analysis; this module
//! covers `add`.

use std::path::Path;

use anyhow::bail;

use crate::model::{ChangeSet, Snapshot};
use crate::validate::validate_file_name;

/// Stages each of `names` found in the working tree under `root`, or
/// unstages names that vanished from the working tree but are still in
/// the index.
pub fn add(snapshot: &Snapshot, root: &Path, names: &[String]) -> crate::Result<ChangeSet> {
    let mut changes = ChangeSet::default();

    for name in names {
        validate_file_name(name)?;
        let path = root.join(name);

        if path.is_dir() {
            bail!("'{}' is a directory, not a file", name);
        }

        if path.is_file() {
            let data = std::fs::read(&path)
                .map_err(|e| anyhow::anyhow!("reading '{}': {}", name, e))?;
            changes.put_index(name.clone(), data);
        } else if snapshot.index.contains_key(name) {
            changes.delete_index(name.clone());
        } else {
            bail!("pathspec '{}' did not match any files", name);
        }
    }

    Ok(changes)
}
