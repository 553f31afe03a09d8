use crate::cli::StatusArgs;
use crate::status::status;
use crate::store::Store;

pub fn run(_args: StatusArgs) -> crate::Result<String> {
    let store = Store::discover(std::env::current_dir()?)?;
    let snapshot = store.load_snapshot()?;
    let root = store.root().to_path_buf();

    let entries = status(&snapshot, &root)?;
    let lines: Vec<String> = entries
        .iter()
        .map(|entry| format!("{} - {}", entry.name, entry.status.label()))
        .collect();

    Ok(lines.join("\n"))
}
