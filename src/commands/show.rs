use anyhow::{bail, Context};

use crate::cli::ShowArgs;
use crate::constants::MESSAGE_KEY;
use crate::store::Store;

/// `<commit>:<file>` — the commit part may be empty, meaning "from the
/// index". `_MESSAGE` as the file part means "this commit's message".
pub fn run(args: ShowArgs) -> crate::Result<String> {
    let (commit_part, file_part) = args
        .spec
        .split_once(':')
        .ok_or_else(|| anyhow::anyhow!("usage: git-show <commit>:<file>"))?;
    if file_part.is_empty() {
        bail!("usage: git-show <commit>:<file>");
    }

    let store = Store::discover(std::env::current_dir()?)?;
    let snapshot = store.load_snapshot()?;

    if commit_part.is_empty() {
        if file_part == MESSAGE_KEY {
            bail!("the index has no commit message");
        }
        let blob = snapshot
            .index
            .get(file_part)
            .ok_or_else(|| anyhow::anyhow!("'{}' is not in the index", file_part))?;
        return Ok(String::from_utf8_lossy(blob).into_owned());
    }

    let id: i64 = commit_part
        .parse()
        .with_context(|| format!("invalid commit id '{}'", commit_part))?;
    let commit = snapshot
        .commit(id)
        .ok_or_else(|| anyhow::anyhow!("unknown commit {}", id))?;

    if file_part == MESSAGE_KEY {
        return Ok(commit.message.clone());
    }

    let blob = commit
        .files
        .get(file_part)
        .ok_or_else(|| anyhow::anyhow!("'{}' is not in commit {}", file_part, id))?;
    Ok(String::from_utf8_lossy(blob).into_owned())
}
