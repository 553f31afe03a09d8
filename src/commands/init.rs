use crate::cli::InitArgs;
use crate::store::Store;

pub fn run(_args: InitArgs) -> crate::Result<String> {
    let cwd = std::env::current_dir()?;
    Store::init(&cwd)?;
    Ok(format!("Initialized empty repository in {}", cwd.display()))
}
