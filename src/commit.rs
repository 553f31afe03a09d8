//! Commit Engine: snapshots the index into a new commit, or reports that
//! nothing changed.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::bail;

use crate::graph;
use crate::model::{ChangeSet, Snapshot};

/// Outcome of a commit attempt. `NothingToCommit` and `Created` are both
/// successful results; an empty commit is never an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitOutcome {
    NothingToCommit,
    Created { id: i64 },
}

/// Runs a commit. If `all` is set, every name currently in the index is
/// first refreshed from the working tree (replaced if still present,
/// dropped from the index if the file has vanished) before deciding
/// whether a new commit is required.
pub fn commit(
    snapshot: &Snapshot,
    root: &Path,
    message: &str,
    all: bool,
) -> crate::Result<(ChangeSet, CommitOutcome)> {
    if message.is_empty() {
        bail!("commit message must not be empty");
    }

    let mut changes = ChangeSet::default();
    let mut effective_index: BTreeMap<String, Vec<u8>> = snapshot.index.clone();

    if all {
        let names: Vec<String> = snapshot.index.keys().cloned().collect();
        for name in names {
            let path = root.join(&name);
            if path.is_file() {
                let data = std::fs::read(&path)?;
                if effective_index.get(&name) != Some(&data) {
                    changes.put_index(name.clone(), data.clone());
                }
                effective_index.insert(name, data);
            } else {
                changes.delete_index(name.clone());
                effective_index.remove(&name);
            }
        }
    }

    let tip = graph::tip(snapshot, &snapshot.current_branch);
    let head_files = tip.and_then(|id| snapshot.commit(id)).map(|c| &c.files);

    let nothing_to_commit = match head_files {
        None => effective_index.is_empty(),
        Some(head) => head == &effective_index,
    };

    if nothing_to_commit {
        return Ok((changes, CommitOutcome::NothingToCommit));
    }

    let id = graph::next_commit_id(snapshot);
    changes.new_commits.push(crate::model::Commit {
        id,
        message: message.to_string(),
        files: effective_index,
    });
    changes.record_commit(snapshot.current_branch.clone(), id);

    Ok((changes, CommitOutcome::Created { id }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;
    use tempfile::tempdir;

    fn snapshot_with_index(index: BTreeMap<String, Vec<u8>>) -> Snapshot {
        let mut branches = BTreeMap::new();
        branches.insert("trunk".to_string(), BTreeSet::new());
        Snapshot {
            current_branch: "trunk".to_string(),
            branches,
            commits: BTreeMap::new(),
            index,
        }
    }

    #[test]
    fn first_commit_with_empty_index_is_nothing_to_commit() {
        let dir = tempdir().unwrap();
        let snapshot = snapshot_with_index(BTreeMap::new());
        let (_, outcome) = commit(&snapshot, dir.path(), "msg", false).unwrap();
        assert_eq!(outcome, CommitOutcome::NothingToCommit);
    }

    #[test]
    fn first_commit_with_staged_file_is_created() {
        let dir = tempdir().unwrap();
        let mut index = BTreeMap::new();
        index.insert("a.txt".to_string(), b"hi".to_vec());
        let snapshot = snapshot_with_index(index);
        let (changes, outcome) = commit(&snapshot, dir.path(), "msg", false).unwrap();
        assert_eq!(outcome, CommitOutcome::Created { id: 0 });
        assert_eq!(changes.new_commits[0].files["a.txt"], b"hi".to_vec());
    }

    #[test]
    fn repeat_commit_with_no_changes_is_nothing_to_commit() {
        let dir = tempdir().unwrap();
        let mut index = BTreeMap::new();
        index.insert("a.txt".to_string(), b"hi".to_vec());
        let mut branches = BTreeMap::new();
        branches.insert("trunk".to_string(), [0i64].into_iter().collect());
        let mut commits = BTreeMap::new();
        commits.insert(
            0,
            crate::model::Commit {
                id: 0,
                message: "first".to_string(),
                files: index.clone(),
            },
        );
        let snapshot = Snapshot {
            current_branch: "trunk".to_string(),
            branches,
            commits,
            index,
        };
        let (_, outcome) = commit(&snapshot, dir.path(), "again", false).unwrap();
        assert_eq!(outcome, CommitOutcome::NothingToCommit);
    }

    #[test]
    fn rejects_empty_message() {
        let dir = tempdir().unwrap();
        let snapshot = snapshot_with_index(BTreeMap::new());
        assert!(commit(&snapshot, dir.path(), "", false).is_err());
    }

    #[test]
    fn all_flag_syncs_index_from_working_tree() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("a.txt"), b"new").unwrap();
        let mut index = BTreeMap::new();
        index.insert("a.txt".to_string(), b"old".to_vec());
        let snapshot = snapshot_with_index(index);
        let (changes, outcome) = commit(&snapshot, dir.path(), "msg", true).unwrap();
        assert_eq!(changes.index_puts["a.txt"], b"new".to_vec());
        assert_eq!(changes.new_commits[0].files["a.txt"], b"new".to_vec());
        assert_eq!(outcome, CommitOutcome::Created { id: 0 });
    }

    #[test]
    fn all_flag_drops_vanished_files_from_index() {
        let dir = tempdir().unwrap();
        let mut index = BTreeMap::new();
        index.insert("gone.txt".to_string(), b"old".to_vec());
        let snapshot = snapshot_with_index(index);
        let (changes, outcome) = commit(&snapshot, dir.path(), "msg", true).unwrap();
        assert!(changes.index_deletes.contains("gone.txt"));
        assert_eq!(outcome, CommitOutcome::NothingToCommit);
    }
}
