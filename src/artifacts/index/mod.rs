//! Staging area file format
//!
//! The index persists the pending changes for the next commit: the staged file names with
//! the blob captured at `add` time, and the names removed since the last commit.
//!
//! ## File Format
//!
//! ```text
//! Header line:
//!   TIDX <version> <entry count>
//!
//! Entries, one per line, sorted by name:
//!   staged <blob-sha> <file name>
//!   removed <file name>
//!
//! Checksum (20 bytes):
//!   - SHA-1 hash of all preceding bytes
//! ```

pub mod checksum;
pub mod stage;

/// Size of SHA-1 checksum in bytes
pub const CHECKSUM_SIZE: usize = 20;

/// Magic signature identifying index files
pub const SIGNATURE: &str = "TIDX";

/// Index file format version
pub const VERSION: u32 = 1;
