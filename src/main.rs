use clap::Parser;

use gitlet_mini::cli::{self, GitCommand};
use gitlet_mini::commands;
use gitlet_mini::Result;

fn main() {
    env_logger::init();

    let cli = cli::GitCli::parse();

    let (label, result): (&str, Result<String>) = match cli.command {
        GitCommand::Init(args) => ("git-init", commands::init::run(args)),
        GitCommand::Add(args) => ("git-add", commands::add::run(args)),
        GitCommand::Commit(args) => ("git-commit", commands::commit::run(args)),
        GitCommand::Rm(args) => ("git-rm", commands::rm::run(args)),
        GitCommand::Status(args) => ("git-status", commands::status::run(args)),
        GitCommand::Log(args) => ("git-log", commands::log::run(args)),
        GitCommand::Show(args) => ("git-show", commands::show::run(args)),
        GitCommand::Branch(args) => ("git-branch", commands::branch::run(args)),
        GitCommand::Checkout(args) => ("git-checkout", commands::checkout::run(args)),
        GitCommand::Merge(args) => ("git-merge", commands::merge::run(args)),
    };

    match result {
        Ok(message) => {
            if !message.is_empty() {
                println!("{}", message);
            }
        }
        Err(err) => {
            eprintln!("{}: error: {}", label, err);
            std::process::exit(1);
        }
    }
}
