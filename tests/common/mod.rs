#![allow(dead_code)]

pub mod command;
pub mod file;
pub mod repository;

/// Date pinned on every commit made by the test helpers
pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";
