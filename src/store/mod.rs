//! Repository Store: the sole owner of persisted repository state.
//! Everything else operates on an in-memory `Snapshot` produced by
//! `Store::load_snapshot` and submits mutations back via `Store::apply`,
//! which runs them inside one `rusqlite::Transaction` so they are either
//! all observable or none are.
//!
//! Table layout is one table per concern: a single-row table for the
//! current-branch pointer, a JSON-blob table for branch membership sets,
//! and a normalized commit/file table pair for the flat-file snapshots.

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use fs2::FileExt;
use rusqlite::{params, Connection, OptionalExtension};

use crate::constants::{DB_FILE_NAME, LOCK_FILE_NAME, REPO_DIRECTORY, TRUNK};
use crate::model::{ChangeSet, Commit, Snapshot};

/// An open repository: a locked database connection plus the root
/// directory the `.gitlet-mini` directory lives under.
pub struct Store {
    conn: Connection,
    root: PathBuf,
    // Held for the lifetime of the Store; the OS releases the advisory
    // lock when this file handle is dropped.
    _lock: fs::File,
}

impl Store {
    /// Creates a brand-new repository rooted at `root`. Fails if one
    /// already exists there.
    pub fn init(root: impl AsRef<Path>) -> crate::Result<Store> {
        let root = root.as_ref().to_path_buf();
        let home = root.join(REPO_DIRECTORY);

        if home.exists() {
            return Err(anyhow!(
                "gitlet-mini repository already initialized at {}",
                home.display()
            ));
        }

        fs::create_dir_all(&home).context("create repository directory")?;

        let lock = acquire_lock(&home)?;

        let db_path = home.join(DB_FILE_NAME);
        let mut conn = Connection::open(&db_path).context("open repository database")?;
        create_tables(&conn).context("create repository tables")?;

        {
            let txn = conn.transaction()?;
            txn.execute(
                "INSERT INTO CurrentBranch (name) VALUES (?1);",
                params![TRUNK],
            )?;
            txn.execute(
                "INSERT INTO Branches (name, commits) VALUES (?1, ?2);",
                params![TRUNK, "[]"],
            )?;
            txn.commit()?;
        }

        log::debug!("initialized gitlet-mini repository at {}", home.display());

        Ok(Store {
            conn,
            root,
            _lock: lock,
        })
    }

    /// Opens an existing repository rooted at `root`. Fails with
    /// *not-initialized* if none exists.
    pub fn open(root: impl AsRef<Path>) -> crate::Result<Store> {
        let root = root.as_ref().to_path_buf();
        let home = root.join(REPO_DIRECTORY);
        let db_path = home.join(DB_FILE_NAME);

        if !db_path.exists() {
            return Err(anyhow!(
                "not a gitlet-mini repository (or any of the parent directories)"
            ));
        }

        let lock = acquire_lock(&home)?;
        let conn = Connection::open(&db_path).context("open repository database")?;

        Ok(Store {
            conn,
            root,
            _lock: lock,
        })
    }

    /// Climbs from `start` looking for a `.gitlet-mini` directory, then
    /// opens the repository rooted there.
    pub fn discover(start: impl AsRef<Path>) -> crate::Result<Store> {
        let root = find_repo_root(start)?;
        Store::open(root)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Loads the whole repository state into memory as a single
    /// snapshot value.
    pub fn load_snapshot(&self) -> crate::Result<Snapshot> {
        let current_branch: String = self
            .conn
            .query_row("SELECT name FROM CurrentBranch;", (), |row| row.get(0))
            .context("read current branch pointer")?;

        let mut branches = BTreeMap::new();
        let mut stmt = self.conn.prepare("SELECT name, commits FROM Branches;")?;
        let rows = stmt.query_map((), |row| {
            let name: String = row.get(0)?;
            let commits_json: String = row.get(1)?;
            Ok((name, commits_json))
        })?;
        for row in rows {
            let (name, commits_json) = row?;
            let commits: BTreeSet<i64> = serde_json::from_str(&commits_json)
                .map_err(|e| anyhow!("corrupt branch commit set for '{}': {}", name, e))?;
            branches.insert(name, commits);
        }
        drop(stmt);

        let mut commits = BTreeMap::new();
        let mut stmt = self.conn.prepare("SELECT id, message FROM Commits;")?;
        let commit_rows = stmt.query_map((), |row| {
            let id: i64 = row.get(0)?;
            let message: String = row.get(1)?;
            Ok((id, message))
        })?;
        let mut pending = Vec::new();
        for row in commit_rows {
            pending.push(row?);
        }
        drop(stmt);

        for (id, message) in pending {
            let files = self.load_commit_files(id)?;
            commits.insert(id, Commit { id, message, files });
        }

        let mut index = BTreeMap::new();
        let mut stmt = self
            .conn
            .prepare("SELECT name, data FROM IndexEntries;")?;
        let index_rows = stmt.query_map((), |row| {
            let name: String = row.get(0)?;
            let data: Vec<u8> = row.get(1)?;
            Ok((name, data))
        })?;
        for row in index_rows {
            let (name, data) = row?;
            index.insert(name, data);
        }

        Ok(Snapshot {
            current_branch,
            branches,
            commits,
            index,
        })
    }

    fn load_commit_files(&self, commit_id: i64) -> crate::Result<BTreeMap<String, Vec<u8>>> {
        let mut stmt = self
            .conn
            .prepare("SELECT name, data FROM CommitFiles WHERE commit_id = ?1;")?;
        let rows = stmt.query_map(params![commit_id], |row| {
            let name: String = row.get(0)?;
            let data: Vec<u8> = row.get(1)?;
            Ok((name, data))
        })?;
        let mut files = BTreeMap::new();
        for row in rows {
            let (name, data) = row?;
            files.insert(name, data);
        }
        Ok(files)
    }

    /// Applies every mutation in `changes` inside a single transaction.
    /// Either the whole change set becomes visible, or (on error) none of
    /// it does.
    pub fn apply(&mut self, changes: ChangeSet) -> crate::Result<()> {
        if changes.is_empty() {
            return Ok(());
        }

        let txn = self.conn.transaction()?;

        for commit in &changes.new_commits {
            txn.execute(
                "INSERT INTO Commits (id, message) VALUES (?1, ?2);",
                params![commit.id, commit.message],
            )?;
            for (name, data) in &commit.files {
                txn.execute(
                    "INSERT INTO CommitFiles (commit_id, name, data) VALUES (?1, ?2, ?3);",
                    params![commit.id, name, data],
                )?;
            }
        }

        for (name, data) in &changes.index_puts {
            txn.execute(
                "INSERT OR REPLACE INTO IndexEntries (name, data) VALUES (?1, ?2);",
                params![name, data],
            )?;
        }

        for name in &changes.index_deletes {
            txn.execute("DELETE FROM IndexEntries WHERE name = ?1;", params![name])?;
        }

        for (name, commits) in &changes.new_branches {
            let commits_json = serde_json::to_string(commits)?;
            txn.execute(
                "INSERT INTO Branches (name, commits) VALUES (?1, ?2);",
                params![name, commits_json],
            )?;
        }

        for name in &changes.deleted_branches {
            txn.execute("DELETE FROM Branches WHERE name = ?1;", params![name])?;
        }

        for (branch, adds) in &changes.branch_commit_adds {
            let existing: Option<String> = txn
                .query_row(
                    "SELECT commits FROM Branches WHERE name = ?1;",
                    params![branch],
                    |row| row.get(0),
                )
                .optional()?;
            let mut commits: BTreeSet<i64> = match existing {
                Some(json) => serde_json::from_str(&json)?,
                None => BTreeSet::new(),
            };
            commits.extend(adds.iter().copied());
            let commits_json = serde_json::to_string(&commits)?;
            txn.execute(
                "INSERT OR REPLACE INTO Branches (name, commits) VALUES (?1, ?2);",
                params![branch, commits_json],
            )?;
        }

        if let Some(branch) = &changes.current_branch {
            txn.execute("DELETE FROM CurrentBranch;", ())?;
            txn.execute(
                "INSERT INTO CurrentBranch (name) VALUES (?1);",
                params![branch],
            )?;
        }

        txn.commit().context("commit repository transaction")?;
        Ok(())
    }
}

fn acquire_lock(home: &Path) -> crate::Result<fs::File> {
    let lock_path = home.join(LOCK_FILE_NAME);
    let lock = fs::OpenOptions::new()
        .create(true)
        .truncate(false)
        .write(true)
        .open(&lock_path)
        .with_context(|| format!("open lock file {}", lock_path.display()))?;
    lock.lock_exclusive()
        .context("acquire exclusive repository lock")?;
    Ok(lock)
}

fn create_tables(conn: &Connection) -> crate::Result<()> {
    conn.execute_batch(
        "CREATE TABLE CurrentBranch (name TEXT NOT NULL);
         CREATE TABLE Branches (name TEXT PRIMARY KEY, commits TEXT NOT NULL);
         CREATE TABLE Commits (id INTEGER PRIMARY KEY, message TEXT NOT NULL);
         CREATE TABLE CommitFiles (
             commit_id INTEGER NOT NULL,
             name TEXT NOT NULL,
             data BLOB NOT NULL,
             PRIMARY KEY (commit_id, name)
         );
         CREATE TABLE IndexEntries (name TEXT PRIMARY KEY, data BLOB NOT NULL);",
    )?;
    Ok(())
}

/// Climbs from `start` looking for a `.gitlet-mini` directory.
pub fn find_repo_root(start: impl AsRef<Path>) -> crate::Result<PathBuf> {
    let start = dunce::canonicalize(start.as_ref())
        .with_context(|| format!("canonicalize {}", start.as_ref().display()))?;

    for dir in start.ancestors() {
        if dir.join(REPO_DIRECTORY).is_dir() {
            return Ok(dir.to_path_buf());
        }
    }

    Err(anyhow!(
        "not a gitlet-mini repository (or any of the parent directories)"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn init_creates_trunk_branch() {
        let dir = tempdir().unwrap();
        let store = Store::init(dir.path()).unwrap();
        let snapshot = store.load_snapshot().unwrap();

        assert_eq!(snapshot.current_branch, TRUNK);
        assert!(snapshot.branches.contains_key(TRUNK));
        assert!(snapshot.branches[TRUNK].is_empty());
        assert!(snapshot.commits.is_empty());
        assert!(snapshot.index.is_empty());
    }

    #[test]
    fn init_twice_fails() {
        let dir = tempdir().unwrap();
        let _store = Store::init(dir.path()).unwrap();
        assert!(Store::init(dir.path()).is_err());
    }

    #[test]
    fn open_without_init_fails() {
        let dir = tempdir().unwrap();
        assert!(Store::open(dir.path()).is_err());
    }

    #[test]
    fn apply_commit_and_reload_round_trips() {
        let dir = tempdir().unwrap();
        let mut store = Store::init(dir.path()).unwrap();

        let mut files = BTreeMap::new();
        files.insert("a".to_string(), b"1".to_vec());
        let commit = Commit {
            id: 0,
            message: "first".to_string(),
            files,
        };

        let mut changes = ChangeSet::default();
        changes.new_commits.push(commit);
        changes.record_commit(TRUNK, 0);
        store.apply(changes).unwrap();

        let snapshot = store.load_snapshot().unwrap();
        assert_eq!(snapshot.commits.len(), 1);
        assert_eq!(snapshot.commits[&0].files["a"], b"1".to_vec());
        assert!(snapshot.branches[TRUNK].contains(&0));
    }

    #[test]
    fn discover_finds_root_from_subdirectory() {
        let dir = tempdir().unwrap();
        let _store = Store::init(dir.path()).unwrap();
        let sub = dir.path().join("sub");
        fs::create_dir(&sub).unwrap();

        let found = find_repo_root(&sub).unwrap();
        assert_eq!(
            dunce::canonicalize(&found).unwrap(),
            dunce::canonicalize(dir.path()).unwrap()
        );
    }
}
