//! Command Dispatch: one thin module per CLI subcommand. Each `run`
//! resolves the repository, loads a `Snapshot`, hands it to the matching
//! core engine, applies the returned `ChangeSet` through the `Store`,
//! performs the working-tree side effects the engine can't (reading/
//! writing files lives outside the engines so they stay pure over
//! in-memory values), and returns the one line of output expected on
//! stdout (empty string for commands that print nothing on success).

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod rm;
pub mod show;
pub mod status;
