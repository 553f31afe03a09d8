//! Status Classifier: the nine-way classification of a single file name
//! against its working-tree, index and head blobs.

use std::collections::BTreeSet;
use std::path::Path;

use crate::compare::equal;
use crate::graph;
use crate::model::Snapshot;

/// One file's classification. Variant names mirror the status line for
/// each cell of the working/index/head table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Untracked,
    AddedToIndex,
    AddedToIndexFileChanged,
    DeletedFromIndex,
    SameAsRepo,
    FileChangedNotStaged,
    FileChangedStaged,
    FileChangedDifferentStaged,
    AddedToIndexFileDeleted,
    FileDeleted,
    FileDeletedStaged,
    FileDeletedDeletedFromIndex,
}

impl Status {
    pub fn label(self) -> &'static str {
        match self {
            Status::Untracked => "untracked",
            Status::AddedToIndex => "added to index",
            Status::AddedToIndexFileChanged => "added to index, file changed",
            Status::DeletedFromIndex => "deleted from index",
            Status::SameAsRepo => "same as repo",
            Status::FileChangedNotStaged => "file changed, changes not staged for commit",
            Status::FileChangedStaged => "file changed, changes staged for commit",
            Status::FileChangedDifferentStaged => {
                "file changed, different changes staged for commit"
            }
            Status::AddedToIndexFileDeleted => "added to index, file deleted",
            Status::FileDeleted => "file deleted",
            Status::FileDeletedStaged => "file deleted, changes staged for commit",
            Status::FileDeletedDeletedFromIndex => "file deleted, deleted from index",
        }
    }
}

/// Classifies one file from its three possible blobs. `w`/`i`/`h` are the
/// working-tree, index and head (current branch tip commit) contents, or
/// `None` if the file is absent from that location.
pub fn classify(w: Option<&Vec<u8>>, i: Option<&Vec<u8>>, h: Option<&Vec<u8>>) -> Status {
    match (w.is_some(), i.is_some(), h.is_some()) {
        (true, false, false) => Status::Untracked,
        (true, true, false) => {
            if equal(w, i) {
                Status::AddedToIndex
            } else {
                Status::AddedToIndexFileChanged
            }
        }
        (true, false, true) => Status::DeletedFromIndex,
        (true, true, true) => {
            let w_eq_i = equal(w, i);
            let i_eq_h = equal(i, h);
            if w_eq_i && i_eq_h {
                Status::SameAsRepo
            } else if i_eq_h {
                Status::FileChangedNotStaged
            } else if w_eq_i {
                Status::FileChangedStaged
            } else {
                Status::FileChangedDifferentStaged
            }
        }
        (false, true, false) => Status::AddedToIndexFileDeleted,
        (false, true, true) => {
            if equal(i, h) {
                Status::FileDeleted
            } else {
                Status::FileDeletedStaged
            }
        }
        (false, false, true) => Status::FileDeletedDeletedFromIndex,
        (false, false, false) => unreachable!("a name only enters the union if present somewhere"),
    }
}

/// One row of the status report: a file name and its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEntry {
    pub name: String,
    pub status: Status,
}

/// Computes the full status report: every name present in the working
/// tree, index, or head, classified.
pub fn status(snapshot: &Snapshot, root: &Path) -> crate::Result<Vec<StatusEntry>> {
    let head_files = graph::tip(snapshot, &snapshot.current_branch)
        .and_then(|id| snapshot.commit(id))
        .map(|c| &c.files);

    let mut names: BTreeSet<String> = BTreeSet::new();
    names.extend(snapshot.index.keys().cloned());
    if let Some(head) = head_files {
        names.extend(head.keys().cloned());
    }
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            if let Some(name) = entry.file_name().to_str() {
                if crate::validate::is_valid_name(name) {
                    names.insert(name.to_string());
                }
            }
        }
    }

    let mut report = Vec::new();
    for name in names {
        let working_path = root.join(&name);
        let w = if working_path.is_file() {
            Some(std::fs::read(&working_path)?)
        } else {
            None
        };
        let i = snapshot.index.get(&name).cloned();
        let h = head_files.and_then(|h| h.get(&name)).cloned();
        let status = classify(w.as_ref(), i.as_ref(), h.as_ref());
        report.push(StatusEntry { name, status });
    }

    Ok(report)
}
