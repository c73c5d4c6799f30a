//! Persistent components of a store
//!
//! Each area owns one part of the `.twig` directory:
//!
//! - `database`: content-addressed blobs and commits
//! - `index`: staging area and removed-file set
//! - `lock`: single-writer guard
//! - `refs`: branch heads and HEAD
//! - `remotes`: registered remote stores
//! - `repository`: the handle tying the areas together
//! - `workspace`: files in the working directory

pub mod database;
pub mod index;
pub mod lock;
pub mod refs;
pub mod remotes;
pub mod repository;
pub mod workspace;
