use crate::cli::AddArgs;
use crate::index_ops;
use crate::store::Store;

pub fn run(args: AddArgs) -> crate::Result<String> {
    let mut store = Store::discover(std::env::current_dir()?)?;
    let snapshot = store.load_snapshot()?;
    let root = store.root().to_path_buf();

    let changes = index_ops::add(&snapshot, &root, &args.paths)?;
    store.apply(changes)?;

    Ok(String::new())
}
