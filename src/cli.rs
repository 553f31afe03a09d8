use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[clap(version, about, long_about = None)]
pub struct GitCli {
    #[command(subcommand)]
    pub command: GitCommand,
}

#[derive(Subcommand, Clone)]
pub enum GitCommand {
    /// Create an empty repository in the current directory
    Init(InitArgs),
    /// Stage files, replacing any previous staged contents
    Add(AddArgs),
    /// Record the staged index as a new commit
    Commit(CommitArgs),
    /// Unstage and optionally delete files, subject to safety checks
    Rm(RmArgs),
    /// Show the working tree/index/commit status of every tracked file
    Status(StatusArgs),
    /// List every commit on the current branch, newest first
    Log(LogArgs),
    /// Print one commit's message and file listing
    Show(ShowArgs),
    /// Create or delete a branch
    Branch(BranchArgs),
    /// Switch the current branch
    Checkout(CheckoutArgs),
    /// Merge another branch into the current one
    Merge(MergeArgs),
}

#[derive(Args, Clone)]
pub struct InitArgs {}

#[derive(Args, Clone)]
pub struct AddArgs {
    /// Files to stage
    pub paths: Vec<String>,
}

#[derive(Args, Clone)]
pub struct CommitArgs {
    /// Commit message
    #[arg(short = 'm', long)]
    pub message: String,
    /// Stage tracked files from the working tree before committing
    #[arg(short = 'a', long)]
    pub all: bool,
}

#[derive(Args, Clone)]
pub struct RmArgs {
    /// Files to remove
    pub paths: Vec<String>,
    /// Unstage only; leave the working-tree copy in place
    #[arg(long)]
    pub cached: bool,
    /// Skip the safety checks that guard against losing uncommitted work
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Clone)]
pub struct StatusArgs {}

#[derive(Args, Clone)]
pub struct LogArgs {}

#[derive(Args, Clone)]
pub struct ShowArgs {
    /// `<commit>:<file>`; the commit part may be empty, meaning "from the index"
    pub spec: String,
}

#[derive(Args, Clone)]
pub struct BranchArgs {
    /// Name of the branch to create, or to delete with --delete. Omit to list.
    pub name: Option<String>,
    /// Delete the named branch instead of creating it
    #[arg(short = 'd', long)]
    pub delete: bool,
}

#[derive(Args, Clone)]
pub struct CheckoutArgs {
    /// Branch to switch to
    pub branch: String,
}

#[derive(Args, Clone)]
pub struct MergeArgs {
    /// Branch name or numeric commit id to merge into the current branch
    pub branch: String,
    /// Merge commit message
    #[arg(short = 'm', long)]
    pub message: String,
}
