use crate::cli::LogArgs;
use crate::store::Store;

/// Prints `<id> <message>` for every commit on the current branch, tip
/// first.
pub fn run(_args: LogArgs) -> crate::Result<String> {
    let store = Store::discover(std::env::current_dir()?)?;
    let snapshot = store.load_snapshot()?;

    let commits = snapshot.current_commits();
    let lines: Vec<String> = commits
        .iter()
        .rev()
        .filter_map(|id| snapshot.commit(*id))
        .map(|c| format!("{} {}", c.id, c.message))
        .collect();

    Ok(lines.join("\n"))
}
