use crate::cli::RmArgs;
use crate::rm::plan_rm;
use crate::store::Store;

pub fn run(args: RmArgs) -> crate::Result<String> {
    let mut store = Store::discover(std::env::current_dir()?)?;
    let snapshot = store.load_snapshot()?;
    let root = store.root().to_path_buf();

    let plan = plan_rm(&snapshot, &root, &args.paths, args.cached, args.force)?;

    for name in &plan.delete_from_working {
        let path = root.join(name);
        if path.is_file() {
            std::fs::remove_file(&path)
                .map_err(|e| anyhow::anyhow!("removing '{}': {}", name, e))?;
        }
    }

    store.apply(plan.changes)?;

    Ok(String::new())
}
