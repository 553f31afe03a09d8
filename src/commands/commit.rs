use crate::cli::CommitArgs;
use crate::commit::{commit, CommitOutcome};
use crate::store::Store;

pub fn run(args: CommitArgs) -> crate::Result<String> {
    let mut store = Store::discover(std::env::current_dir()?)?;
    let snapshot = store.load_snapshot()?;
    let root = store.root().to_path_buf();

    let (changes, outcome) = commit(&snapshot, &root, &args.message, args.all)?;
    store.apply(changes)?;

    Ok(match outcome {
        CommitOutcome::NothingToCommit => "nothing to commit".to_string(),
        CommitOutcome::Created { id } => format!("Committed as commit {}", id),
    })
}
