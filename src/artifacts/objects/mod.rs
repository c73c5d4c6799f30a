//! Stored object types
//!
//! Two kinds of objects live in the object database, both immutable and identified
//! by a SHA-1 hash:
//!
//! - **Blob**: the bytes of one named file at the time it was staged
//! - **Commit**: a full snapshot (file name to blob id) plus ancestry metadata
//!
//! On disk every object is framed as `<type> <size>\0<body>` and zlib-compressed.

pub mod blob;
pub mod commit;
pub mod object;
pub mod object_id;
pub mod object_type;

/// Length of a SHA-1 hash in hexadecimal format
pub const OBJECT_ID_LENGTH: usize = 40;
