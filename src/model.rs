//! The data model: commits, the in-memory repository snapshot, and the
//! change set a command accumulates before submitting it to the
//! Repository Store in one transaction.

use std::collections::{BTreeMap, BTreeSet};

/// A single numbered commit: the full set of tracked files at commit time,
/// plus its message. Commits are immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: i64,
    pub message: String,
    pub files: BTreeMap<String, Vec<u8>>,
}

/// A read-only view of the whole repository, loaded once per command
/// instead of re-walking the store for every query.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub current_branch: String,
    /// branch name -> set of commit ids reachable on that branch
    pub branches: BTreeMap<String, BTreeSet<i64>>,
    pub commits: BTreeMap<i64, Commit>,
    pub index: BTreeMap<String, Vec<u8>>,
}

impl Snapshot {
    pub fn next_commit_id(&self) -> i64 {
        self.commits.len() as i64
    }

    pub fn branch(&self, name: &str) -> Option<&BTreeSet<i64>> {
        self.branches.get(name)
    }

    pub fn commit(&self, id: i64) -> Option<&Commit> {
        self.commits.get(&id)
    }

    pub fn current_commits(&self) -> &BTreeSet<i64> {
        self.branches
            .get(&self.current_branch)
            .expect("current branch always exists in the branch set")
    }
}

/// The set of mutations one command issues against the store. Built up
/// in-memory while the command reasons over a `Snapshot`, then submitted
/// atomically via `Store::apply` — never observed partially.
#[derive(Debug, Default)]
pub struct ChangeSet {
    pub new_commits: Vec<Commit>,
    pub index_puts: BTreeMap<String, Vec<u8>>,
    pub index_deletes: BTreeSet<String>,
    /// A new branch to create, inheriting the given commit set by value.
    pub new_branches: Vec<(String, BTreeSet<i64>)>,
    pub deleted_branches: Vec<String>,
    /// Commit ids to add to a branch's reachable set. A branch's commit
    /// set only ever grows.
    pub branch_commit_adds: BTreeMap<String, BTreeSet<i64>>,
    pub current_branch: Option<String>,
}

impl ChangeSet {
    pub fn is_empty(&self) -> bool {
        self.new_commits.is_empty()
            && self.index_puts.is_empty()
            && self.index_deletes.is_empty()
            && self.new_branches.is_empty()
            && self.deleted_branches.is_empty()
            && self.branch_commit_adds.is_empty()
            && self.current_branch.is_none()
    }

    pub fn put_index(&mut self, name: impl Into<String>, blob: Vec<u8>) {
        let name = name.into();
        self.index_deletes.remove(&name);
        self.index_puts.insert(name, blob);
    }

    pub fn delete_index(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.index_puts.remove(&name);
        self.index_deletes.insert(name);
    }

    pub fn record_commit(&mut self, branch: impl Into<String>, id: i64) {
        self.branch_commit_adds
            .entry(branch.into())
            .or_default()
            .insert(id);
    }
}
