//! Merge Engine: already-up-to-date detection, fast-forward, and
//! three-way merge with lowest-common-ancestor-based conflict detection.
//! Conflicts are whole-file: there is no text-level three-way merge, so
//! a conflicting file simply rejects the whole merge.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use anyhow::bail;

use crate::graph;
use crate::model::{ChangeSet, Commit, Snapshot};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    AlreadyUpToDate,
    FastForward { commit_id: i64 },
    Created { commit_id: i64 },
}

#[derive(Debug, Default)]
pub struct MergePlan {
    pub changes: ChangeSet,
    pub writes: BTreeMap<String, Vec<u8>>,
}

fn tip_files(snapshot: &Snapshot, branch: &str) -> BTreeMap<String, Vec<u8>> {
    graph::tip(snapshot, branch)
        .and_then(|id| snapshot.commit(id))
        .map(|c| c.files.clone())
        .unwrap_or_default()
}

/// Files present in `base` whose blob in `tip` differs from the one in
/// `base`.
fn changed_since(tip: &BTreeMap<String, Vec<u8>>, base: &BTreeMap<String, Vec<u8>>) -> BTreeSet<String> {
    base.iter()
        .filter(|(name, base_blob)| tip.get(name.as_str()) != Some(base_blob))
        .map(|(name, _)| name.clone())
        .collect()
}

/// Merges `target_branch` into the current branch. `target_branch` has
/// already been resolved from a branch name or a numeric commit id by
/// the caller.
pub fn merge(
    snapshot: &Snapshot,
    root: &Path,
    target_branch: &str,
    message: &str,
) -> crate::Result<(MergePlan, MergeOutcome)> {
    let _ = root;
    if message.is_empty() {
        bail!("merge message must not be empty");
    }
    if snapshot.branch(target_branch).is_none() {
        bail!("no such branch: '{}'", target_branch);
    }

    let current = snapshot.current_branch.clone();
    let s_commits = snapshot
        .branch(&current)
        .expect("current branch always exists in the branch set");
    let s_tip = s_commits
        .iter()
        .max()
        .copied()
        .ok_or_else(|| anyhow::anyhow!("no commits yet: nothing to merge into"))?;

    let d_commits = snapshot.branch(target_branch).unwrap();
    let d_tip = d_commits
        .iter()
        .max()
        .copied()
        .ok_or_else(|| anyhow::anyhow!("branch '{}' has no commits", target_branch))?;

    // Case 1: already up to date.
    if graph::contains(snapshot, &current, d_tip) {
        return Ok((MergePlan::default(), MergeOutcome::AlreadyUpToDate));
    }

    let s_files = tip_files(snapshot, &current);
    let d_files = tip_files(snapshot, target_branch);

    // Case 2: fast-forward — S's tip is an ancestor of D.
    if graph::contains(snapshot, target_branch, s_tip) {
        let mut changes = ChangeSet::default();
        for (name, blob) in &d_files {
            changes.put_index(name.clone(), blob.clone());
        }
        changes
            .branch_commit_adds
            .entry(current)
            .or_default()
            .extend(d_commits.iter().copied());

        let plan = MergePlan {
            changes,
            writes: d_files,
        };
        return Ok((plan, MergeOutcome::FastForward { commit_id: d_tip }));
    }

    // Case 3: three-way merge relative to the lowest common ancestor.
    let lca_id = graph::lowest_common_ancestor(snapshot, &current, target_branch)
        .ok_or_else(|| anyhow::anyhow!("'{}' and '{}' share no common history", current, target_branch))?;
    let base_files = snapshot
        .commit(lca_id)
        .map(|c| c.files.clone())
        .unwrap_or_default();

    let delta_s = changed_since(&s_files, &base_files);
    let delta_d = changed_since(&d_files, &base_files);

    let mut conflicts: Vec<String> = delta_s
        .intersection(&delta_d)
        .filter(|name| {
            let in_both_tips = s_files.contains_key(name.as_str()) && d_files.contains_key(name.as_str());
            in_both_tips && s_files.get(name.as_str()) != d_files.get(name.as_str())
        })
        .cloned()
        .collect();

    if !conflicts.is_empty() {
        conflicts.sort();
        bail!(
            "These files can not be merged:\n{}",
            conflicts.join("\n")
        );
    }

    let mut merged: BTreeMap<String, Vec<u8>> = BTreeMap::new();
    for name in &delta_s {
        if let Some(blob) = s_files.get(name) {
            merged.insert(name.clone(), blob.clone());
        }
    }
    for name in &delta_d {
        if let Some(blob) = d_files.get(name) {
            merged.insert(name.clone(), blob.clone());
        }
    }
    for (name, blob) in &s_files {
        merged.entry(name.clone()).or_insert_with(|| blob.clone());
    }
    for (name, blob) in &d_files {
        merged.entry(name.clone()).or_insert_with(|| blob.clone());
    }

    let id = graph::next_commit_id(snapshot);
    let mut changes = ChangeSet::default();
    for (name, blob) in &merged {
        changes.put_index(name.clone(), blob.clone());
    }
    for name in snapshot.index.keys() {
        if !merged.contains_key(name) {
            changes.delete_index(name.clone());
        }
    }
    changes.new_commits.push(Commit {
        id,
        message: message.to_string(),
        files: merged.clone(),
    });
    let mut reachable: BTreeSet<i64> = d_commits.clone();
    reachable.insert(id);
    changes
        .branch_commit_adds
        .entry(current)
        .or_default()
        .extend(reachable);

    let plan = MergePlan {
        changes,
        writes: merged,
    };
    Ok((plan, MergeOutcome::Created { commit_id: id }))
}
