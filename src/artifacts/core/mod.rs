//! Shared building blocks
//!
//! - `errors`: the user-visible error taxonomy
//! - `config`: environment-driven settings

pub mod config;
pub mod errors;
