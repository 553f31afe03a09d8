//! Removal Planner: decides whether removing each named file is safe,
//! cascading through four predicates, and builds the index/working-tree
//! mutations for the ones that pass.

use std::path::Path;

use anyhow::bail;

use crate::compare::equal;
use crate::graph;
use crate::model::{ChangeSet, Snapshot};
use crate::validate::validate_file_name;

/// The result of planning an `rm`: the index mutations to submit, plus
/// the working-tree files the caller still needs to delete (empty when
/// `--cached` was given).
#[derive(Debug, Default)]
pub struct RmPlan {
    pub changes: ChangeSet,
    pub delete_from_working: Vec<String>,
}

/// Plans removal of `names`. `cached` stages the removal without
/// touching the working tree; `force` suppresses every safety predicate
/// except `in_working_not_index`.
pub fn plan_rm(
    snapshot: &Snapshot,
    root: &Path,
    names: &[String],
    cached: bool,
    force: bool,
) -> crate::Result<RmPlan> {
    let tip = graph::tip(snapshot, &snapshot.current_branch);
    let head_files = tip.and_then(|id| snapshot.commit(id)).map(|c| &c.files);

    let mut plan = RmPlan::default();

    for name in names {
        validate_file_name(name)?;

        let working_path = root.join(name);
        let w = if working_path.is_file() {
            Some(std::fs::read(&working_path)?)
        } else {
            None
        };
        let i = snapshot.index.get(name);
        let h = head_files.and_then(|h| h.get(name));

        if w.is_none() && i.is_none() {
            bail!("pathspec '{}' did not match any files", name);
        }

        // in_working_not_index: always applied.
        if head_files.is_some() && i.is_none() {
            bail!("'{}' is not in the git repository", name);
        }

        if !force {
            // index_diverges_from_both: applied in plain and --cached modes.
            if let Some(i_blob) = i {
                if !equal(w.as_ref(), Some(i_blob)) && !equal(h, Some(i_blob)) {
                    bail!(
                        "'{}' in index is different to both the working file and the repository",
                        name
                    );
                }
            }

            if !cached {
                // in_working_same_index_diff_head: plain mode only.
                if let (Some(w_blob), Some(i_blob)) = (w.as_ref(), i) {
                    if equal(Some(w_blob), Some(i_blob)) && !equal(Some(i_blob), h) {
                        bail!("'{}' has staged changes in the index", name);
                    }
                }

                // in_working_diff_head: plain mode only.
                if let Some(w_blob) = w.as_ref() {
                    if !equal(Some(w_blob), h) {
                        bail!(
                            "'{}' in the repository is different to the working file",
                            name
                        );
                    }
                }
            }
        }

        if i.is_some() {
            plan.changes.delete_index(name.clone());
        }
        if !cached && w.is_some() {
            plan.delete_from_working.push(name.clone());
        }
    }

    Ok(plan)
}
