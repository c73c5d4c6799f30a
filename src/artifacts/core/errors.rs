//! User-visible error taxonomy
//!
//! Every condition a user can trigger is a `RepositoryError` variant whose `Display`
//! output is the message shown to the user. Operations raise them through `anyhow`
//! so infrastructure failures (I/O, corrupted objects) keep their context chains,
//! and callers recover the typed value with `downcast_ref`.

use thiserror::Error;

/// Coarse classification used by callers that react to a family of failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad operands, missing files, name collisions
    UserInput,
    /// The repository is not in a state that allows the operation
    State,
    /// An identifier, branch or remote could not be resolved
    Lookup,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Incorrect operands.")]
    IncorrectOperands,

    #[error("File does not exist.")]
    FileNotFound(String),

    #[error("Please enter a commit message.")]
    EmptyCommitMessage,

    #[error("A branch with that name already exists.")]
    BranchAlreadyExists(String),

    #[error("invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("A remote with that name already exists.")]
    RemoteAlreadyExists(String),

    #[error("A twig version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("Not in an initialized twig directory.")]
    NotInitialized,

    #[error("No changes added to the commit.")]
    NoChanges,

    #[error("No reason to remove the file.")]
    NothingToRemove(String),

    #[error("There is an untracked file in the way; delete it, or add and commit it first.")]
    UntrackedFileInTheWay(String),

    #[error("You have uncommitted changes.")]
    UncommittedChanges,

    #[error("Cannot merge a branch with itself.")]
    MergeWithSelf,

    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch(String),

    #[error("Cannot remove the current branch.")]
    CannotRemoveCurrentBranch(String),

    #[error("Please pull down remote changes before pushing.")]
    PullRequired,

    #[error("Another twig operation is in progress on {0}.")]
    StoreLocked(String),

    #[error("No commit with that id exists.")]
    CommitNotFound(String),

    #[error("Commit id prefix {0} is ambiguous.")]
    AmbiguousCommitId(String),

    #[error("File does not exist in that commit.")]
    FileNotInCommit(String),

    #[error("A branch with that name does not exist.")]
    BranchNotFound(String),

    #[error("Found no commit with that message.")]
    NoCommitWithMessage(String),

    #[error("No common ancestor between {0} and {1}.")]
    NoCommonAncestor(String, String),

    #[error("A remote with that name does not exist.")]
    RemoteNotFound(String),

    #[error("Remote directory not found.")]
    RemoteUnreachable(String),

    #[error("That remote does not have that branch.")]
    RemoteBranchNotFound(String),
}

impl RepositoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RepositoryError::IncorrectOperands
            | RepositoryError::FileNotFound(_)
            | RepositoryError::EmptyCommitMessage
            | RepositoryError::BranchAlreadyExists(_)
            | RepositoryError::InvalidBranchName(_)
            | RepositoryError::RemoteAlreadyExists(_)
            | RepositoryError::AlreadyInitialized => ErrorKind::UserInput,
            RepositoryError::NotInitialized
            | RepositoryError::NoChanges
            | RepositoryError::NothingToRemove(_)
            | RepositoryError::UntrackedFileInTheWay(_)
            | RepositoryError::UncommittedChanges
            | RepositoryError::MergeWithSelf
            | RepositoryError::AlreadyOnBranch(_)
            | RepositoryError::CannotRemoveCurrentBranch(_)
            | RepositoryError::PullRequired
            | RepositoryError::StoreLocked(_) => ErrorKind::State,
            RepositoryError::CommitNotFound(_)
            | RepositoryError::AmbiguousCommitId(_)
            | RepositoryError::FileNotInCommit(_)
            | RepositoryError::BranchNotFound(_)
            | RepositoryError::NoCommitWithMessage(_)
            | RepositoryError::NoCommonAncestor(_, _)
            | RepositoryError::RemoteNotFound(_)
            | RepositoryError::RemoteUnreachable(_)
            | RepositoryError::RemoteBranchNotFound(_) => ErrorKind::Lookup,
        }
    }

    /// Recover the typed error from an `anyhow` chain, if there is one
    pub fn find(error: &anyhow::Error) -> Option<&RepositoryError> {
        error.chain().find_map(|cause| cause.downcast_ref::<RepositoryError>())
    }
}
