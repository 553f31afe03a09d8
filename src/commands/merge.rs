use crate::cli::MergeArgs;
use crate::graph::find_owning_branch;
use crate::merge::{merge, MergeOutcome};
use crate::store::Store;

/// Resolves `args.branch` as either a branch name or a numeric commit id.
pub fn run(args: MergeArgs) -> crate::Result<String> {
    let mut store = Store::discover(std::env::current_dir()?)?;
    let snapshot = store.load_snapshot()?;
    let root = store.root().to_path_buf();

    let target_branch = match args.branch.parse::<i64>() {
        Ok(id) => find_owning_branch(&snapshot, id)
            .map(|b| b.to_string())
            .ok_or_else(|| anyhow::anyhow!("unknown commit {}", id))?,
        Err(_) => args.branch.clone(),
    };

    let (plan, outcome) = merge(&snapshot, &root, &target_branch, &args.message)?;

    for (name, blob) in &plan.writes {
        std::fs::write(root.join(name), blob)
            .map_err(|e| anyhow::anyhow!("writing '{}': {}", name, e))?;
    }

    store.apply(plan.changes)?;

    Ok(match outcome {
        MergeOutcome::AlreadyUpToDate => "Already up to date".to_string(),
        MergeOutcome::FastForward { .. } => "Fast-forward: no commit created".to_string(),
        MergeOutcome::Created { commit_id } => format!("Committed as commit {}", commit_id),
    })
}
