use crate::checkout::{checkout_branch, CheckoutOutcome};
use crate::cli::CheckoutArgs;
use crate::store::Store;

pub fn run(args: CheckoutArgs) -> crate::Result<String> {
    let mut store = Store::discover(std::env::current_dir()?)?;
    let snapshot = store.load_snapshot()?;
    let root = store.root().to_path_buf();

    let (plan, outcome) = checkout_branch(&snapshot, &root, &args.branch)?;

    for name in &plan.deletes {
        let path = root.join(name);
        if path.is_file() {
            std::fs::remove_file(&path)
                .map_err(|e| anyhow::anyhow!("removing '{}': {}", name, e))?;
        }
    }
    for (name, blob) in &plan.writes {
        std::fs::write(root.join(name), blob)
            .map_err(|e| anyhow::anyhow!("writing '{}': {}", name, e))?;
    }

    store.apply(plan.changes)?;

    Ok(match outcome {
        CheckoutOutcome::AlreadyOnBranch => format!("Already on '{}'", args.branch),
        CheckoutOutcome::Switched => format!("Switched to branch '{}'", args.branch),
    })
}
