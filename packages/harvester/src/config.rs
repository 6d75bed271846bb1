//! Configuration constants and validation functions for the harvester.

use std::path::PathBuf;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

use crate::error::{HarvesterError, Result};

/// Base URL of the official legal information portal.
pub const PRAVO_BASE_URL: &str = "http://pravo.gov.ru";

/// HTTP timeout in seconds.
///
/// The portal is slow under load; large codes routinely take tens of seconds.
pub const HTTP_TIMEOUT_SECS: u64 = 60;

/// Minimum spacing between two outgoing requests (milliseconds).
pub const MIN_REQUEST_INTERVAL_MS: u64 = 1000;

/// Maximum number of attempts per request, including the first one.
pub const MAX_ATTEMPTS: u32 = 5;

/// Base backoff delay after an HTTP 429/5xx answer (milliseconds).
pub const HTTP_RETRY_BASE_DELAY_MS: u64 = 1000;

/// Base backoff delay after a network-level failure (milliseconds).
pub const NETWORK_RETRY_BASE_DELAY_MS: u64 = 2000;

/// Upper bound for a single backoff delay (milliseconds).
pub const MAX_RETRY_DELAY_MS: u64 = 60_000;

/// Bodies shorter than this (after cleaning, in bytes) are not real content.
pub const DEFAULT_MIN_CONTENT_BYTES: usize = 50;

/// Hosts known to serve windows-1251 regardless of what they declare.
pub const LEGACY_ENCODING_HOSTS: &[&str] = &["pravo.gov.ru"];

/// Default directory for seed records.
pub const DEFAULT_SEED_DIR: &str = "data/seed";

/// Default path of the census snapshot.
pub const DEFAULT_CENSUS_PATH: &str = "data/census.json";

/// Catalog identifiers that must be present before any run starts:
/// the Constitution, the Criminal Code, part one of the Civil Code and
/// the personal data law.
pub const REQUIRED_LAW_IDS: &[&str] = &["constitution-rf", "uk-rf", "gk-rf-1", "fz-152-2006"];

/// User agent string identifying this harvester.
pub const USER_AGENT: &str = concat!("ruslaw-harvester/", env!("CARGO_PKG_VERSION"));

/// Law ID pattern: lowercase slug usable as a file name.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static LAW_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9.-]*$").expect("valid regex"));

/// Date pattern: YYYY-MM-DD.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));

/// Validate a law ID.
///
/// IDs double as seed file names, so anything that could escape the seed
/// directory is rejected.
///
/// # Examples
/// ```
/// use ruslaw_harvester::config::validate_law_id;
///
/// assert!(validate_law_id("fz-152-2006").is_ok());
/// assert!(validate_law_id("../etc").is_err());
/// ```
pub fn validate_law_id(law_id: &str) -> Result<()> {
    if LAW_ID_PATTERN.is_match(law_id) && !law_id.contains("..") {
        Ok(())
    } else {
        Err(HarvesterError::InvalidLawId(law_id.to_string()))
    }
}

/// Validate date format (YYYY-MM-DD) and that it is a real calendar date.
///
/// # Examples
/// ```
/// use ruslaw_harvester::config::validate_date;
///
/// assert!(validate_date("1993-12-25").is_ok());
/// assert!(validate_date("25.12.1993").is_err());
/// ```
pub fn validate_date(date_str: &str) -> Result<()> {
    if !DATE_PATTERN.is_match(date_str) {
        return Err(HarvesterError::InvalidDate(date_str.to_string()));
    }

    chrono::NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|_| HarvesterError::InvalidDate(date_str.to_string()))?;

    Ok(())
}

/// Build the save-as-text URL for a document.
///
/// # Examples
/// ```
/// use ruslaw_harvester::config::text_url;
///
/// assert_eq!(
///     text_url("http://pravo.gov.ru", "102027595"),
///     "http://pravo.gov.ru/proxy/ips/?savetext=&nd=102027595"
/// );
/// ```
pub fn text_url(base_url: &str, nd: &str) -> String {
    format!("{}/proxy/ips/?savetext=&nd={nd}", base_url.trim_end_matches('/'))
}

/// Build the rendered-markup URL for a document.
///
/// This is also the public source URL recorded in seed records.
pub fn markup_url(base_url: &str, nd: &str) -> String {
    format!("{}/proxy/ips/?docbody=&nd={nd}", base_url.trim_end_matches('/'))
}

/// Settings for the rate-limited fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub timeout: Duration,
    pub min_interval: Duration,
    pub max_attempts: u32,
    pub http_base_delay: Duration,
    pub network_base_delay: Duration,
    pub max_delay: Duration,
    pub legacy_hosts: Vec<String>,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(HTTP_TIMEOUT_SECS),
            min_interval: Duration::from_millis(MIN_REQUEST_INTERVAL_MS),
            max_attempts: MAX_ATTEMPTS,
            http_base_delay: Duration::from_millis(HTTP_RETRY_BASE_DELAY_MS),
            network_base_delay: Duration::from_millis(NETWORK_RETRY_BASE_DELAY_MS),
            max_delay: Duration::from_millis(MAX_RETRY_DELAY_MS),
            legacy_hosts: LEGACY_ENCODING_HOSTS.iter().map(|h| (*h).to_string()).collect(),
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl FetchConfig {
    /// Defaults overridden by `RUSLAW_TIMEOUT_SECS`, `RUSLAW_MIN_INTERVAL_MS`
    /// and `RUSLAW_MAX_ATTEMPTS`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Some(secs) = env_number::<u64>("RUSLAW_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = env_number::<u64>("RUSLAW_MIN_INTERVAL_MS")? {
            config.min_interval = Duration::from_millis(ms);
        }
        if let Some(attempts) = env_number::<u32>("RUSLAW_MAX_ATTEMPTS")? {
            config = config.with_max_attempts(attempts);
        }
        Ok(config)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_min_interval(mut self, min_interval: Duration) -> Self {
        self.min_interval = min_interval;
        self
    }

    /// At least one attempt is always made.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_retry_delays(mut self, http_base: Duration, network_base: Duration) -> Self {
        self.http_base_delay = http_base;
        self.network_base_delay = network_base;
        self
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    pub fn with_legacy_hosts(mut self, hosts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.legacy_hosts = hosts.into_iter().map(Into::into).collect();
        self
    }
}

/// Settings for an ingestion run.
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    pub base_url: String,
    pub seed_dir: PathBuf,
    pub census_path: PathBuf,
    pub min_content_bytes: usize,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: PRAVO_BASE_URL.to_string(),
            seed_dir: PathBuf::from(DEFAULT_SEED_DIR),
            census_path: PathBuf::from(DEFAULT_CENSUS_PATH),
            min_content_bytes: DEFAULT_MIN_CONTENT_BYTES,
        }
    }
}

impl HarvestConfig {
    /// Defaults overridden by `RUSLAW_BASE_URL`, `RUSLAW_SEED_DIR`,
    /// `RUSLAW_CENSUS_PATH` and `RUSLAW_MIN_CONTENT_BYTES`.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("RUSLAW_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(dir) = std::env::var("RUSLAW_SEED_DIR") {
            config.seed_dir = PathBuf::from(dir);
        }
        if let Ok(path) = std::env::var("RUSLAW_CENSUS_PATH") {
            config.census_path = PathBuf::from(path);
        }
        if let Some(bytes) = env_number::<usize>("RUSLAW_MIN_CONTENT_BYTES")? {
            config.min_content_bytes = bytes;
        }
        Ok(config)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_seed_dir(mut self, seed_dir: impl Into<PathBuf>) -> Self {
        self.seed_dir = seed_dir.into();
        self
    }

    pub fn with_census_path(mut self, census_path: impl Into<PathBuf>) -> Self {
        self.census_path = census_path.into();
        self
    }

    pub fn with_min_content_bytes(mut self, min_content_bytes: usize) -> Self {
        self.min_content_bytes = min_content_bytes;
        self
    }
}

/// Read an optional numeric environment variable.
fn env_number<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| HarvesterError::Config(format!("{name} must be a number, got '{raw}'"))),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_law_id_valid() {
        assert!(validate_law_id("constitution-rf").is_ok());
        assert!(validate_law_id("gk-rf-1").is_ok());
        assert!(validate_law_id("fz-152-2006").is_ok());
        assert!(validate_law_id("law-1a2b3c4d").is_ok());
    }

    #[test]
    fn test_validate_law_id_invalid() {
        assert!(validate_law_id("").is_err());
        assert!(validate_law_id("UK-RF").is_err()); // Uppercase
        assert!(validate_law_id("-uk-rf").is_err()); // Leading dash
        assert!(validate_law_id("uk rf").is_err()); // Whitespace
        assert!(validate_law_id("a/b").is_err()); // Path separator
        assert!(validate_law_id("a..b").is_err()); // Parent traversal
        assert!(validate_law_id("ук-рф").is_err()); // Non-ASCII
    }

    #[test]
    fn test_validate_date_valid() {
        assert!(validate_date("1993-12-25").is_ok());
        assert!(validate_date("2006-07-27").is_ok());
    }

    #[test]
    fn test_validate_date_invalid() {
        assert!(validate_date("").is_err());
        assert!(validate_date("1993/12/25").is_err());
        assert!(validate_date("25.12.1993").is_err());
        assert!(validate_date("2025-13-01").is_err()); // Invalid month
        assert!(validate_date("2025-02-30").is_err()); // Invalid day
    }

    #[test]
    fn test_text_and_markup_urls() {
        assert_eq!(
            text_url("http://pravo.gov.ru/", "102108261"),
            "http://pravo.gov.ru/proxy/ips/?savetext=&nd=102108261"
        );
        assert_eq!(
            markup_url("http://pravo.gov.ru", "102108261"),
            "http://pravo.gov.ru/proxy/ips/?docbody=&nd=102108261"
        );
    }

    #[test]
    fn test_fetch_config_builders() {
        let config = FetchConfig::default()
            .with_min_interval(Duration::from_millis(10))
            .with_max_attempts(0)
            .with_retry_delays(Duration::from_millis(1), Duration::from_millis(2))
            .with_legacy_hosts(["example.test"]);

        assert_eq!(config.min_interval, Duration::from_millis(10));
        assert_eq!(config.max_attempts, 1);
        assert_eq!(config.http_base_delay, Duration::from_millis(1));
        assert_eq!(config.network_base_delay, Duration::from_millis(2));
        assert_eq!(config.legacy_hosts, vec!["example.test".to_string()]);
    }

    #[test]
    fn test_fetch_config_defaults() {
        let config = FetchConfig::default();
        assert_eq!(config.max_attempts, MAX_ATTEMPTS);
        assert!(config.network_base_delay > config.http_base_delay);
        assert!(config.user_agent.starts_with("ruslaw-harvester/"));
    }

    #[test]
    fn test_harvest_config_builders() {
        let config = HarvestConfig::default()
            .with_base_url("http://localhost:1234")
            .with_seed_dir("/tmp/seed")
            .with_min_content_bytes(10);

        assert_eq!(config.base_url, "http://localhost:1234");
        assert_eq!(config.seed_dir, PathBuf::from("/tmp/seed"));
        assert_eq!(config.census_path, PathBuf::from(DEFAULT_CENSUS_PATH));
        assert_eq!(config.min_content_bytes, 10);
    }
}
