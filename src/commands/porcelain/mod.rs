//! Local operations
//!
//! ## Commands
//!
//! - `init`: Create a store with its root commit
//! - `add`: Stage a file
//! - `rm`: Unstage a file or stage its removal
//! - `commit`: Record the staged changes
//! - `checkout`: Switch branches or restore files
//! - `branch`: Create or delete branches
//! - `reset`: Move the current branch to any commit
//! - `merge`: Merge another branch into the current one
//! - `status`: Report staged, removed, modified and untracked files
//! - `log`: Walk the history, list every commit, find commits by message

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
