//! gitlet-mini: a flat-file-snapshot version control core, modeled on
//! the working-tree/index/commit mental model of Git. This crate is the
//! reconciliation engine behind `commit`, `status`, `rm`, `checkout` and
//! `merge`, plus the repository store and CLI dispatch that make it
//! runnable.

pub mod checkout;
pub mod cli;
pub mod commands;
pub mod commit;
pub mod compare;
pub mod constants;
pub mod graph;
pub mod index_ops;
pub mod merge;
pub mod model;
pub mod rm;
pub mod status;
pub mod store;
pub mod validate;

pub type Result<T, E = anyhow::Error> = std::result::Result<T, E>;
