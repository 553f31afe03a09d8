//! Fixed path fragments and the reserved names the data model carries.

pub const REPO_DIRECTORY: &str = ".gitlet-mini";
pub const DB_FILE_NAME: &str = "repository.db";
pub const LOCK_FILE_NAME: &str = "lock";

/// The only branch guaranteed to exist, and the one `init` creates.
pub const TRUNK: &str = "trunk";

/// Reserved pseudo-file name: inside a commit it denotes that commit's message
/// rather than a tracked file.
pub const MESSAGE_KEY: &str = "_MESSAGE";
