//! Working tree status
//!
//! - `file_change`: how a working file differs from what the next commit would record
//! - `status_info`: the read-only status report and its rendering

pub mod file_change;
pub mod status_info;
