//! Command implementations
//!
//! Every user-facing operation is an `impl Repository` block returning a typed result;
//! rendering is left to the caller.
//!
//! - `porcelain`: local operations (add, commit, checkout, merge, ...)
//! - `remote`: replication between stores (push, fetch, pull) and the remote registry

pub mod porcelain;
pub mod remote;
