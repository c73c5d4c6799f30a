use anyhow::Result;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use std::path::Path;
use tracing_subscriber::EnvFilter;
use twig::areas::repository::Repository;
use twig::artifacts::core::config::LOG_FILTER_ENV;
use twig::artifacts::core::errors::RepositoryError;

#[derive(Parser)]
#[command(
    name = "twig",
    version = "0.1.0",
    about = "A small local version-control system",
    long_about = "twig snapshots a working directory into a content-addressed commit graph. \
    It supports branches, three-way merges and replication between stores that share a filesystem.",
    help_template = r"
{name} {version} - {about}

USAGE:
    {usage}

OPTIONS:
    {all-args}
"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(
        name = "init",
        about = "Initialize a new repository",
        long_about = "This command creates a .twig store in the current directory, \
        with an initial commit on the master branch."
    )]
    Init,
    #[command(name = "add", about = "Stage a file for the next commit")]
    Add {
        #[arg(index = 1, help = "The file to stage")]
        file: String,
    },
    #[command(
        name = "rm",
        about = "Unstage a file, or remove a tracked file from the next commit"
    )]
    Rm {
        #[arg(index = 1, help = "The file to remove")]
        file: String,
    },
    #[command(
        name = "commit",
        about = "Create a new commit with the specified message",
        long_about = "This command snapshots the head commit plus every staged change. \
        The timestamp can be pinned with the TWIG_COMMIT_DATE environment variable."
    )]
    Commit {
        #[arg(index = 1, help = "The commit message")]
        message: String,
    },
    #[command(
        name = "checkout",
        about = "Switch branches or restore a file",
        long_about = "Accepted forms are `checkout <branch>`, `checkout -- <file>` \
        and `checkout <commit id> -- <file>`."
    )]
    Checkout {
        #[arg(index = 1, help = "A branch name, or a commit id when a file is given")]
        target: Option<String>,
        #[arg(index = 2, last = true, help = "The file to restore")]
        file: Option<String>,
    },
    #[command(name = "branch", about = "Create a branch at the current head")]
    Branch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "rm-branch", about = "Delete a branch pointer")]
    RmBranch {
        #[arg(index = 1)]
        name: String,
    },
    #[command(
        name = "reset",
        about = "Check out a commit and move the current branch to it"
    )]
    Reset {
        #[arg(index = 1, help = "The commit id (any unique prefix)")]
        commit: String,
    },
    #[command(name = "merge", about = "Merge a branch into the current branch")]
    Merge {
        #[arg(index = 1)]
        branch: String,
    },
    #[command(name = "status", about = "Show branches, staged and untracked files")]
    Status,
    #[command(name = "log", about = "Show the first-parent history of the current head")]
    Log,
    #[command(name = "global-log", about = "Show every commit in the store")]
    GlobalLog,
    #[command(name = "find", about = "Print the ids of commits with the given message")]
    Find {
        #[arg(index = 1)]
        message: String,
    },
    #[command(name = "add-remote", about = "Register another store as a remote")]
    AddRemote {
        #[arg(index = 1)]
        name: String,
        #[arg(index = 2, help = "Path to the remote's .twig directory")]
        path: String,
    },
    #[command(name = "rm-remote", about = "Forget a registered remote")]
    RmRemote {
        #[arg(index = 1)]
        name: String,
    },
    #[command(name = "push", about = "Copy local history to a remote branch")]
    Push {
        #[arg(index = 1)]
        remote: String,
        #[arg(index = 2)]
        branch: String,
    },
    #[command(
        name = "fetch",
        about = "Copy a remote branch into the <remote>/<branch> tracking branch"
    )]
    Fetch {
        #[arg(index = 1)]
        remote: String,
        #[arg(index = 2)]
        branch: String,
    },
    #[command(name = "pull", about = "Fetch a remote branch and merge it")]
    Pull {
        #[arg(index = 1)]
        remote: String,
        #[arg(index = 2)]
        branch: String,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) if is_operand_error(error.kind()) => {
            tracing::debug!(kind = ?error.kind(), "rejected operands");
            println!("{}", RepositoryError::IncorrectOperands);
            return Ok(());
        }
        Err(error) => error.exit(),
    };
    let pwd = std::env::current_dir()?;

    match run(&cli.command, &pwd) {
        Ok(()) => Ok(()),
        Err(error) => match RepositoryError::find(&error) {
            Some(repository_error) => {
                tracing::debug!(kind = ?repository_error.kind(), "operation refused");
                println!("{repository_error}");
                Ok(())
            }
            None => Err(error),
        },
    }
}

/// Operand count mismatches on a known command, as opposed to help or an unknown command
fn is_operand_error(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::MissingRequiredArgument
            | ErrorKind::UnknownArgument
            | ErrorKind::TooManyValues
            | ErrorKind::WrongNumberOfValues
    )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}

fn run(command: &Commands, pwd: &Path) -> Result<()> {
    let mut repository = match command {
        Commands::Init => return Repository::init(pwd).map(|_| ()),
        _ => Repository::open(pwd)?,
    };

    match command {
        Commands::Init => {}
        Commands::Add { file } => repository.add(file)?,
        Commands::Rm { file } => repository.remove(file)?,
        Commands::Commit { message } => {
            repository.commit(message)?;
        }
        Commands::Checkout { target, file } => match (target, file) {
            (Some(branch), None) => repository.checkout_branch(branch)?,
            (None, Some(file)) => repository.checkout_file(file)?,
            (Some(commit), Some(file)) => repository.checkout_file_in_commit(commit, file)?,
            (None, None) => return Err(RepositoryError::IncorrectOperands.into()),
        },
        Commands::Branch { name } => repository.create_branch(name)?,
        Commands::RmBranch { name } => repository.remove_branch(name)?,
        Commands::Reset { commit } => {
            repository.reset(commit)?;
        }
        Commands::Merge { branch } => {
            let outcome = repository.merge(branch)?;
            print_outcome(&outcome.to_string());
        }
        Commands::Status => print!("{}", repository.status()?),
        Commands::Log => {
            for entry in repository.log()? {
                println!("{entry}");
            }
        }
        Commands::GlobalLog => {
            for entry in repository.global_log()? {
                println!("{entry}");
            }
        }
        Commands::Find { message } => {
            for oid in repository.find(message)? {
                println!("{oid}");
            }
        }
        Commands::AddRemote { name, path } => repository.add_remote(name, path)?,
        Commands::RmRemote { name } => repository.remove_remote(name)?,
        Commands::Push { remote, branch } => {
            repository.push(remote, branch)?;
        }
        Commands::Fetch { remote, branch } => {
            repository.fetch(remote, branch)?;
        }
        Commands::Pull { remote, branch } => {
            let outcome = repository.pull(remote, branch)?;
            print_outcome(&outcome.to_string());
        }
    }

    repository.save()
}

fn print_outcome(message: &str) {
    if !message.is_empty() {
        println!("{message}");
    }
}
