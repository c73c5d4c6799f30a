//! Environment-driven settings
//!
//! twig has no configuration file; everything tunable comes from the environment:
//!
//! - `TWIG_COMMIT_DATE`: fixed commit timestamp (RFC 2822 or `%Y-%m-%d %H:%M:%S %z`)
//! - `TWIG_LOG`: tracing filter directives for diagnostics on stderr

/// Name of the store directory at the working root
pub const STORE_DIR: &str = ".twig";

/// Branch created by `init`
pub const DEFAULT_BRANCH: &str = "master";

/// Message of the root commit
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

pub const COMMIT_DATE_ENV: &str = "TWIG_COMMIT_DATE";

pub const LOG_FILTER_ENV: &str = "TWIG_LOG";

/// Timestamp for a new commit: `TWIG_COMMIT_DATE` if it parses, local now otherwise
pub fn commit_timestamp() -> chrono::DateTime<chrono::FixedOffset> {
    std::env::var(COMMIT_DATE_ENV)
        .ok()
        .and_then(|date_str| parse_timestamp(&date_str))
        .unwrap_or_else(|| chrono::Local::now().fixed_offset())
}

pub fn parse_timestamp(date_str: &str) -> Option<chrono::DateTime<chrono::FixedOffset>> {
    chrono::DateTime::parse_from_rfc2822(date_str)
        .or_else(|_| chrono::DateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S %z"))
        .ok()
}

/// The UNIX epoch, used for the root commit so every fresh store shares its id
pub fn epoch() -> chrono::DateTime<chrono::FixedOffset> {
    chrono::DateTime::<chrono::Utc>::UNIX_EPOCH.fixed_offset()
}
