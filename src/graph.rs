//! Commit Graph: branch membership and ancestry queries over a loaded
//! `Snapshot`. Ancestry is derived entirely from branch-set membership —
//! commits carry no parent pointers.

use crate::model::Snapshot;

/// The highest commit id reachable on `branch`, or `None` if the branch has
/// no commits yet.
pub fn tip(snapshot: &Snapshot, branch: &str) -> Option<i64> {
    snapshot.branch(branch).and_then(|commits| commits.iter().max().copied())
}

/// Whether `id` is reachable on `branch`.
pub fn contains(snapshot: &Snapshot, branch: &str, id: i64) -> bool {
    snapshot
        .branch(branch)
        .map(|commits| commits.contains(&id))
        .unwrap_or(false)
}

/// Returns the name of a branch whose commit set contains `id`.
///
/// Deterministic rule: prefer the branch whose tip equals `id`; otherwise
/// the lexicographically smallest branch name among those that contain it.
pub fn find_owning_branch(snapshot: &Snapshot, id: i64) -> Option<&str> {
    let mut fallback: Option<&str> = None;
    for (name, commits) in &snapshot.branches {
        if !commits.contains(&id) {
            continue;
        }
        if commits.iter().max() == Some(&id) {
            return Some(name.as_str());
        }
        if fallback.is_none() {
            fallback = Some(name.as_str());
        }
    }
    fallback
}

/// The largest commit id present in both branches' commit sets, i.e. the
/// lowest common ancestor under a "greatest shared id" ordering. `None`
/// only if the two branches share no history at all — this cannot happen
/// after `init` since every branch descends from the initial commit path.
pub fn lowest_common_ancestor(snapshot: &Snapshot, branch_a: &str, branch_b: &str) -> Option<i64> {
    let a = snapshot.branch(branch_a)?;
    let b = snapshot.branch(branch_b)?;
    a.iter().rev().find(|id| b.contains(id)).copied()
}

/// The next commit id to allocate: the count of all commits stored so far.
/// Ids are `0..N` with no gaps.
pub fn next_commit_id(snapshot: &Snapshot) -> i64 {
    snapshot.next_commit_id()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, BTreeSet};

    fn snap(branches: &[(&str, &[i64])]) -> Snapshot {
        let mut map = BTreeMap::new();
        for (name, ids) in branches {
            map.insert(name.to_string(), ids.iter().copied().collect::<BTreeSet<_>>());
        }
        Snapshot {
            current_branch: branches.first().map(|b| b.0.to_string()).unwrap_or_default(),
            branches: map,
            commits: BTreeMap::new(),
            index: BTreeMap::new(),
        }
    }

    #[test]
    fn tip_is_max_of_commit_set() {
        let s = snap(&[("trunk", &[0, 1, 2])]);
        assert_eq!(tip(&s, "trunk"), Some(2));
    }

    #[test]
    fn tip_of_empty_branch_is_none() {
        let s = snap(&[("trunk", &[])]);
        assert_eq!(tip(&s, "trunk"), None);
    }

    #[test]
    fn owning_branch_prefers_tip_match() {
        let s = snap(&[("trunk", &[0, 1]), ("dev", &[0, 1, 2])]);
        assert_eq!(find_owning_branch(&s, 1), Some("trunk"));
        assert_eq!(find_owning_branch(&s, 2), Some("dev"));
    }

    #[test]
    fn owning_branch_falls_back_to_lexicographic_name() {
        let s = snap(&[("zz", &[0, 1]), ("aa", &[0, 1])]);
        assert_eq!(find_owning_branch(&s, 0), Some("aa"));
    }

    #[test]
    fn lca_is_greatest_shared_id() {
        let s = snap(&[("trunk", &[0, 1, 2]), ("dev", &[0, 1, 3, 4])]);
        assert_eq!(lowest_common_ancestor(&s, "trunk", "dev"), Some(1));
    }

    #[test]
    fn lca_none_when_disjoint() {
        let s = snap(&[("trunk", &[0, 1]), ("dev", &[2, 3])]);
        assert_eq!(lowest_common_ancestor(&s, "trunk", "dev"), None);
    }
}
