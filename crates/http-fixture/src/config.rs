//! Harness configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// All configuration for the fixture harness.
///
/// Loaded from env vars after `dotenv::dotenv().ok()`; no CLI parsing.
/// All values have safe defaults suitable for local development.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Overwrite fixtures with live data instead of comparing (`FIXTURE_REFRESH`).
    /// default: `false`
    pub refresh: bool,

    /// Request timeout handed to the HTTP client (`FIXTURE_HTTP_TIMEOUT_SECS`).
    /// default: 30 seconds
    pub http_timeout: Duration,

    /// Directory holding fixture files (`FIXTURE_DIR`).
    /// default: `None`, meaning `<cwd>/fixtures`
    pub fixture_dir: Option<PathBuf>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            refresh: false,
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            fixture_dir: None,
        }
    }
}

impl HarnessConfig {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            refresh: lookup("FIXTURE_REFRESH")
                .map(|v| parse_flag(&v))
                .unwrap_or(false),
            http_timeout: lookup("FIXTURE_HTTP_TIMEOUT_SECS")
                .and_then(|v| v.trim().parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS)),
            fixture_dir: lookup("FIXTURE_DIR")
                .filter(|v| !v.is_empty())
                .map(PathBuf::from),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}
