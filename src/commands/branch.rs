use anyhow::bail;

use crate::cli::BranchArgs;
use crate::constants::TRUNK;
use crate::model::ChangeSet;
use crate::store::Store;
use crate::validate::validate_branch_name;

pub fn run(args: BranchArgs) -> crate::Result<String> {
    let mut store = Store::discover(std::env::current_dir()?)?;
    let snapshot = store.load_snapshot()?;

    let name = match args.name {
        Some(n) => n,
        None => {
            if args.delete {
                bail!("usage: git-branch -d <name>");
            }
            return Ok(snapshot.branches.keys().cloned().collect::<Vec<_>>().join("\n"));
        }
    };

    validate_branch_name(&name)?;

    if args.delete {
        if name == TRUNK {
            bail!("cannot delete the trunk branch");
        }
        if name == snapshot.current_branch {
            bail!("cannot delete the current branch");
        }
        let target_commits = snapshot
            .branch(&name)
            .ok_or_else(|| anyhow::anyhow!("no such branch: '{}'", name))?;
        let merged = match target_commits.iter().max() {
            Some(tip) => snapshot.current_commits().contains(tip),
            None => true,
        };
        if !merged {
            bail!(
                "branch '{}' is not fully merged into '{}'",
                name,
                snapshot.current_branch
            );
        }

        let mut changes = ChangeSet::default();
        changes.deleted_branches.push(name);
        store.apply(changes)?;
        Ok(String::new())
    } else {
        if snapshot.branches.contains_key(&name) {
            bail!("a branch named '{}' already exists", name);
        }
        let mut changes = ChangeSet::default();
        changes
            .new_branches
            .push((name, snapshot.current_commits().clone()));
        store.apply(changes)?;
        Ok(String::new())
    }
}
