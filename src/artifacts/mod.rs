//! Value types and algorithms
//!
//! - `branch`: branch names and heads with their tracked-file cache
//! - `core`: error taxonomy and environment configuration
//! - `index`: staging area contents and the index file framing
//! - `log`: commit history traversal and rendering
//! - `merge`: split point search, file classification and conflict content
//! - `objects`: object IDs, blobs and commits
//! - `status`: working tree status report

pub mod branch;
pub mod core;
pub mod index;
pub mod log;
pub mod merge;
pub mod objects;
pub mod status;
