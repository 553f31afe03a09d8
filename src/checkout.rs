//! Checkout Engine: switches the current branch, replacing the index and
//! working tree with the target branch's tip snapshot while preserving
//! every uncommitted local edit that the switch doesn't actually need to
//! disturb.
//!
//! The whole plan is computed before anything is written: every path the
//! user has touched relative to the *source* tip is classified as
//! edited-local or new-local, checked against the *destination* tip, and
//! the switch is rejected outright if any of them would be silently
//! clobbered. There is nothing to roll back because nothing is written
//! until every check has passed.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::bail;

use crate::graph;
use crate::model::{ChangeSet, Snapshot};
use crate::validate::is_valid_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutOutcome {
    AlreadyOnBranch,
    Switched,
}

/// The working-tree side of a checkout: files to write (new content) and
/// files to delete, computed only after every safety check has passed.
#[derive(Debug, Default)]
pub struct CheckoutPlan {
    pub changes: ChangeSet,
    pub writes: BTreeMap<String, Vec<u8>>,
    pub deletes: Vec<String>,
}

fn tip_files(snapshot: &Snapshot, branch: &str) -> BTreeMap<String, Vec<u8>> {
    graph::tip(snapshot, branch)
        .and_then(|id| snapshot.commit(id))
        .map(|c| c.files.clone())
        .unwrap_or_default()
}

/// The user's actual working/index contents for a path the safety
/// analysis decided must survive the switch untouched.
struct LocalEdit {
    working: Option<Vec<u8>>,
    index: Option<Vec<u8>>,
}

/// Every path name worth examining: anything in the source tip, the
/// index, or sitting in the working directory right now.
fn candidate_names(
    root: &Path,
    source_files: &BTreeMap<String, Vec<u8>>,
    index: &BTreeMap<String, Vec<u8>>,
) -> crate::Result<BTreeSet<String>> {
    let mut names: BTreeSet<String> = BTreeSet::new();
    names.extend(source_files.keys().cloned());
    names.extend(index.keys().cloned());
    for entry in std::fs::read_dir(root)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            if let Some(name) = entry.file_name().to_str() {
                if is_valid_name(name) {
                    names.insert(name.to_string());
                }
            }
        }
    }
    Ok(names)
}

/// Plans a switch to `target_branch`. Fails if the branch doesn't exist,
/// or if any working-tree/index file would be silently overwritten or
/// deleted by the switch without the user's local content surviving it.
/// Switching to the current branch is a successful no-op, not an error.
pub fn checkout_branch(
    snapshot: &Snapshot,
    root: &Path,
    target_branch: &str,
) -> crate::Result<(CheckoutPlan, CheckoutOutcome)> {
    if snapshot.commits.is_empty() {
        bail!("no commits yet: nothing to check out");
    }
    if snapshot.branch(target_branch).is_none() {
        bail!("no such branch: '{}'", target_branch);
    }
    if target_branch == snapshot.current_branch {
        return Ok((CheckoutPlan::default(), CheckoutOutcome::AlreadyOnBranch));
    }

    let source_files = tip_files(snapshot, &snapshot.current_branch);
    let target_files = tip_files(snapshot, target_branch);

    let names = candidate_names(root, &source_files, &snapshot.index)?;

    let mut local: BTreeMap<String, LocalEdit> = BTreeMap::new();
    let mut offenders = Vec::new();

    for name in &names {
        let s = source_files.get(name);
        let working_path = root.join(name);
        let w = if working_path.is_file() {
            Some(std::fs::read(&working_path)?)
        } else {
            None
        };
        let i = snapshot.index.get(name);

        let edited_local = s.is_some() && (w.as_ref() != s || i != s);
        let new_local = s.is_none() && (w.is_some() || i.is_some());

        if !edited_local && !new_local {
            continue;
        }

        let d = target_files.get(name);
        let rejected = if edited_local { d.is_some() && d != s } else { d.is_some() };

        if rejected {
            offenders.push(name.clone());
            continue;
        }

        local.insert(
            name.clone(),
            LocalEdit {
                working: w,
                index: i.cloned(),
            },
        );
    }

    if !offenders.is_empty() {
        offenders.sort();
        bail!(
            "Your changes to the following files would be overwritten by checkout:\n{}",
            offenders.join("\n")
        );
    }

    // Steps 1-2: delete the source tip's files, write the destination
    // tip's files into both working tree and index.
    let mut writes = target_files.clone();
    let mut deletes: Vec<String> = source_files
        .keys()
        .filter(|n| !target_files.contains_key(*n))
        .cloned()
        .collect();

    let mut changes = ChangeSet::default();
    for (name, blob) in &target_files {
        changes.put_index(name.clone(), blob.clone());
    }
    for name in &deletes {
        changes.delete_index(name.clone());
    }
    for name in snapshot.index.keys() {
        if !target_files.contains_key(name) && !source_files.contains_key(name) {
            changes.delete_index(name.clone());
        }
    }

    // Step 3: re-apply every preserved local edit exactly, including
    // local deletions.
    for (name, edit) in &local {
        match &edit.working {
            Some(blob) => {
                writes.insert(name.clone(), blob.clone());
                deletes.retain(|n| n != name);
            }
            None => {
                writes.remove(name);
                if !deletes.contains(name) {
                    deletes.push(name.clone());
                }
            }
        }
        match &edit.index {
            Some(blob) => changes.put_index(name.clone(), blob.clone()),
            None => changes.delete_index(name.clone()),
        }
    }

    changes.current_branch = Some(target_branch.to_string());

    Ok((
        CheckoutPlan {
            changes,
            writes,
            deletes,
        },
        CheckoutOutcome::Switched,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn snapshot_two_branches(
        trunk_files: BTreeMap<String, Vec<u8>>,
        dev_files: BTreeMap<String, Vec<u8>>,
    ) -> Snapshot {
        let mut commits = BTreeMap::new();
        commits.insert(
            0,
            crate::model::Commit {
                id: 0,
                message: "trunk tip".to_string(),
                files: trunk_files,
            },
        );
        commits.insert(
            1,
            crate::model::Commit {
                id: 1,
                message: "dev tip".to_string(),
                files: dev_files,
            },
        );
        let mut branches = BTreeMap::new();
        branches.insert("trunk".to_string(), BTreeSet::from([0i64]));
        branches.insert("dev".to_string(), BTreeSet::from([0i64, 1i64]));
        Snapshot {
            current_branch: "trunk".to_string(),
            branches,
            commits,
            index: BTreeMap::new(),
        }
    }

    #[test]
    fn checkout_before_first_commit_fails() {
        let dir = tempdir().unwrap();
        let mut branches = BTreeMap::new();
        branches.insert("trunk".to_string(), BTreeSet::new());
        branches.insert("dev".to_string(), BTreeSet::new());
        let snapshot = Snapshot {
            current_branch: "trunk".to_string(),
            branches,
            commits: BTreeMap::new(),
            index: BTreeMap::new(),
        };
        assert!(checkout_branch(&snapshot, dir.path(), "dev").is_err());
    }

    #[test]
    fn checkout_unknown_branch_fails() {
        let dir = tempdir().unwrap();
        let snapshot = snapshot_two_branches(BTreeMap::new(), BTreeMap::new());
        assert!(checkout_branch(&snapshot, dir.path(), "ghost").is_err());
    }

    #[test]
    fn checkout_current_branch_is_a_noop_success() {
        let dir = tempdir().unwrap();
        let snapshot = snapshot_two_branches(BTreeMap::new(), BTreeMap::new());
        let (_, outcome) = checkout_branch(&snapshot, dir.path(), "trunk").unwrap();
        assert_eq!(outcome, CheckoutOutcome::AlreadyOnBranch);
    }

    #[test]
    fn clean_checkout_writes_target_files_and_updates_index() {
        let dir = tempdir().unwrap();
        let mut trunk = BTreeMap::new();
        trunk.insert("a.txt".to_string(), b"on-trunk".to_vec());
        let mut dev = BTreeMap::new();
        dev.insert("a.txt".to_string(), b"on-dev".to_vec());
        std::fs::write(dir.path().join("a.txt"), b"on-trunk").unwrap();
        let snapshot = snapshot_two_branches(trunk, dev);

        let (plan, outcome) = checkout_branch(&snapshot, dir.path(), "dev").unwrap();
        assert_eq!(outcome, CheckoutOutcome::Switched);
        assert_eq!(plan.writes["a.txt"], b"on-dev".to_vec());
        assert_eq!(plan.changes.index_puts["a.txt"], b"on-dev".to_vec());
        assert_eq!(plan.changes.current_branch, Some("dev".to_string()));
    }

    #[test]
    fn uncommitted_edit_blocks_checkout_when_destination_differs() {
        let dir = tempdir().unwrap();
        let mut trunk = BTreeMap::new();
        trunk.insert("a.txt".to_string(), b"on-trunk".to_vec());
        let mut dev = BTreeMap::new();
        dev.insert("a.txt".to_string(), b"on-dev".to_vec());
        std::fs::write(dir.path().join("a.txt"), b"locally-edited").unwrap();
        let snapshot = snapshot_two_branches(trunk, dev);

        assert!(checkout_branch(&snapshot, dir.path(), "dev").is_err());
    }

    #[test]
    fn uncommitted_edit_is_preserved_when_file_unchanged_between_branches() {
        let dir = tempdir().unwrap();
        let mut trunk = BTreeMap::new();
        trunk.insert("a.txt".to_string(), b"shared".to_vec());
        let mut dev = BTreeMap::new();
        dev.insert("a.txt".to_string(), b"shared".to_vec());
        std::fs::write(dir.path().join("a.txt"), b"locally-edited").unwrap();
        let snapshot = snapshot_two_branches(trunk, dev);

        let (plan, outcome) = checkout_branch(&snapshot, dir.path(), "dev").unwrap();
        assert_eq!(outcome, CheckoutOutcome::Switched);
        assert_eq!(plan.writes["a.txt"], b"locally-edited".to_vec());
        assert_eq!(plan.changes.index_puts["a.txt"], b"locally-edited".to_vec());
    }

    #[test]
    fn untracked_file_in_the_way_blocks_checkout() {
        let dir = tempdir().unwrap();
        let trunk = BTreeMap::new();
        let mut dev = BTreeMap::new();
        dev.insert("a.txt".to_string(), b"on-dev".to_vec());
        std::fs::write(dir.path().join("a.txt"), b"untracked-local").unwrap();
        let snapshot = snapshot_two_branches(trunk, dev);

        assert!(checkout_branch(&snapshot, dir.path(), "dev").is_err());
    }

    #[test]
    fn new_local_file_absent_from_destination_survives_checkout() {
        let dir = tempdir().unwrap();
        let trunk = BTreeMap::new();
        let dev = BTreeMap::new();
        std::fs::write(dir.path().join("new.txt"), b"not-yet-tracked").unwrap();
        let snapshot = snapshot_two_branches(trunk, dev);

        let (plan, outcome) = checkout_branch(&snapshot, dir.path(), "dev").unwrap();
        assert_eq!(outcome, CheckoutOutcome::Switched);
        assert_eq!(plan.writes["new.txt"], b"not-yet-tracked".to_vec());
    }

    #[test]
    fn file_absent_from_target_is_deleted_when_unmodified() {
        let dir = tempdir().unwrap();
        let mut trunk = BTreeMap::new();
        trunk.insert("only-on-trunk.txt".to_string(), b"x".to_vec());
        let dev = BTreeMap::new();
        std::fs::write(dir.path().join("only-on-trunk.txt"), b"x").unwrap();
        let snapshot = snapshot_two_branches(trunk, dev);

        let (plan, _) = checkout_branch(&snapshot, dir.path(), "dev").unwrap();
        assert_eq!(plan.deletes, vec!["only-on-trunk.txt".to_string()]);
    }
}
