//! twig: a small local-first version-control engine
//!
//! Snapshots of a working directory are stored as an immutable, content-addressed
//! commit graph. Branches are movable pointers into that graph, merges are three-way,
//! and commits can be replicated between stores that share a filesystem.
//!
//! - `areas`: persistent components living under `.twig/`
//! - `artifacts`: value types and algorithms (objects, branches, merge, status)
//! - `commands`: one entry point per user-facing operation

pub mod areas;
pub mod artifacts;
pub mod commands;
