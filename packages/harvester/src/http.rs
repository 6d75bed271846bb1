//! Rate-limited, retrying HTTP client for the portal.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;

use crate::config::FetchConfig;
use crate::encoding::{decode_body, select_encoding};
use crate::error::{HarvesterError, Result, RetryCause};
use crate::rate_limit::RateLimiter;
use crate::types::FetchOutcome;

/// Exponential backoff that never shrinks within one request.
///
/// Delays are `base * 2^(retry-1)` with a base that depends on the failure
/// kind, capped at `max_delay`. When the failure kind changes from network to
/// HTTP the smaller base would produce a shorter delay; the previous delay is
/// kept instead.
#[derive(Debug, Clone)]
pub struct Backoff {
    http_base: Duration,
    network_base: Duration,
    max_delay: Duration,
    last: Duration,
}

impl Backoff {
    #[must_use]
    pub fn new(config: &FetchConfig) -> Self {
        Self {
            http_base: config.http_base_delay,
            network_base: config.network_base_delay,
            max_delay: config.max_delay,
            last: Duration::ZERO,
        }
    }

    /// Delay before retry number `retry` (1-based) after a failure of kind `cause`.
    pub fn next_delay(&mut self, retry: u32, cause: RetryCause) -> Duration {
        let base = match cause {
            RetryCause::Network => self.network_base,
            RetryCause::RemoteService { .. } => self.http_base,
        };
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        let delay = base.saturating_mul(factor).min(self.max_delay).max(self.last);
        self.last = delay;
        delay
    }
}

/// HTTP client that spaces requests, retries transient failures and decodes
/// bodies to UTF-8.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    limiter: Arc<RateLimiter>,
    config: FetchConfig,
}

impl Fetcher {
    /// Create a fetcher with its own rate limiter.
    pub fn new(config: FetchConfig) -> Result<Self> {
        let limiter = Arc::new(RateLimiter::new(config.min_interval));
        Self::with_limiter(config, limiter)
    }

    /// Create a fetcher sharing an existing rate limiter.
    pub fn with_limiter(config: FetchConfig, limiter: Arc<RateLimiter>) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.as_str())
            .build()?;
        Ok(Self {
            client,
            limiter,
            config,
        })
    }

    /// Fetch a URL, retrying 429/5xx answers and network failures.
    ///
    /// Every attempt, retries included, goes through the rate limiter.
    /// Other non-success statuses and decoding failures are returned
    /// immediately.
    pub fn fetch(&self, url: &str) -> Result<FetchOutcome> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut backoff = Backoff::new(&self.config);
        let mut last_failure: Option<(RetryCause, String)> = None;

        for attempt in 1..=max_attempts {
            if let Some((cause, _)) = &last_failure {
                let delay = backoff.next_delay(attempt - 1, *cause);
                tracing::debug!(url, attempt, delay_ms = delay.as_millis() as u64, "Retrying after delay");
                thread::sleep(delay);
            }

            match self.attempt(url) {
                Ok(outcome) => return Ok(outcome),
                Err(err) => match retry_cause(&err) {
                    Some(cause) => {
                        tracing::warn!(
                            url,
                            attempt,
                            max_attempts,
                            error = %err,
                            "Transient failure, will retry"
                        );
                        last_failure = Some((cause, err.to_string()));
                    }
                    None => return Err(err),
                },
            }
        }

        let (cause, message) =
            last_failure.unwrap_or((RetryCause::Network, "Unknown error".to_string()));
        Err(HarvesterError::RetriesExhausted {
            url: url.to_string(),
            attempts: max_attempts,
            cause,
            message,
        })
    }

    /// One rate-limited request.
    fn attempt(&self, url: &str) -> Result<FetchOutcome> {
        self.limiter.acquire();

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| classify_send_error(url, e))?;

        let status = response.status();
        if is_retryable_status(status) {
            return Err(HarvesterError::RemoteService {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(HarvesterError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response
            .bytes()
            .map_err(|source| HarvesterError::Network {
                url: url.to_string(),
                source,
            })?;

        let encoding = select_encoding(url, content_type.as_deref(), &self.config.legacy_hosts);
        let body = decode_body(&bytes, encoding, url)?;

        Ok(FetchOutcome {
            status: status.as_u16(),
            body,
            content_type,
            encoding: encoding.name(),
        })
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn classify_send_error(url: &str, source: reqwest::Error) -> HarvesterError {
    if source.is_timeout() || source.is_connect() || source.is_request() || source.is_body() {
        HarvesterError::Network {
            url: url.to_string(),
            source,
        }
    } else {
        HarvesterError::Http(source)
    }
}

/// Which errors from a single attempt are worth another try.
fn retry_cause(err: &HarvesterError) -> Option<RetryCause> {
    match err {
        HarvesterError::Network { .. } => Some(RetryCause::Network),
        HarvesterError::RemoteService { status, .. } => {
            Some(RetryCause::RemoteService { status: *status })
        }
        _ => None,
    }
}
