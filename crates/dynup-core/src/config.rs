//! Run configuration
//!
//! A [`RunConfig`] is assembled once, validated before any network call,
//! and stays immutable for the rest of the run. There is no configuration
//! file layer; the binary builds this struct from environment variables.

use crate::error::{Error, Result};
use std::fmt;
use std::time::Duration;

/// Complete configuration for one update run
#[derive(Clone)]
pub struct RunConfig {
    /// Provider API token, sent as a bearer credential
    pub api_token: String,
    /// Provider zone identifier the record lives in
    pub zone_id: String,
    /// Fully qualified name of the managed A record
    pub record_name: String,
    /// Record TTL in seconds; 1 selects the provider's automatic TTL
    pub ttl: u32,
    /// Whether the record is proxied through the provider's edge
    pub proxied: bool,
    /// Write unconditionally instead of skipping when the address matches
    pub always_update: bool,
    /// Perform lookups normally but log the write instead of sending it
    pub dry_run: bool,
    /// Retry behavior for IP discovery
    pub retry: RetryPolicy,
    /// Upper bound for each individual HTTP request
    pub request_timeout: Duration,
}

impl RunConfig {
    /// Create a configuration with the required identity fields and
    /// defaults everywhere else.
    pub fn new(
        api_token: impl Into<String>,
        zone_id: impl Into<String>,
        record_name: impl Into<String>,
    ) -> Self {
        Self {
            api_token: api_token.into(),
            zone_id: zone_id.into(),
            record_name: record_name.into(),
            ttl: default_ttl(),
            proxied: false,
            always_update: true,
            dry_run: false,
            retry: RetryPolicy::default(),
            request_timeout: Duration::from_secs(default_request_timeout_secs()),
        }
    }

    /// Set the record TTL (1 = provider-automatic)
    pub fn with_ttl(mut self, ttl: u32) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set whether the record is proxied
    pub fn with_proxied(mut self, proxied: bool) -> Self {
        self.proxied = proxied;
        self
    }

    /// Set the decision policy (true = write even when unchanged)
    pub fn with_always_update(mut self, always_update: bool) -> Self {
        self.always_update = always_update;
        self
    }

    /// Enable or disable dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Set the discovery retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Set the per-request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Validate the configuration.
    ///
    /// Must pass before the pipeline is allowed to issue any network call.
    pub fn validate(&self) -> Result<()> {
        if self.api_token.trim().is_empty() {
            return Err(Error::config("API token must not be empty"));
        }
        if self.zone_id.trim().is_empty() {
            return Err(Error::config("zone id must not be empty"));
        }
        if self.record_name.trim().is_empty() {
            return Err(Error::config("record name must not be empty"));
        }
        if self.ttl == 0 {
            return Err(Error::config(
                "ttl must be at least 1 (1 selects the provider's automatic TTL)",
            ));
        }
        Ok(())
    }
}

// The token is a live credential; keep it out of debug dumps and logs.
impl fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RunConfig")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("record_name", &self.record_name)
            .field("ttl", &self.ttl)
            .field("proxied", &self.proxied)
            .field("always_update", &self.always_update)
            .field("dry_run", &self.dry_run)
            .field("retry", &self.retry)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Retry behavior for IP discovery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts per discovery endpoint
    pub max_retries: usize,
    /// Pause between attempts on the same endpoint
    pub retry_delay: Duration,
}

impl RetryPolicy {
    /// Create a retry policy
    pub fn new(max_retries: usize, retry_delay: Duration) -> Self {
        Self {
            max_retries,
            retry_delay,
        }
    }

    /// Attempts actually made per endpoint; every endpoint gets at least one.
    pub fn attempts_per_endpoint(&self) -> usize {
        self.max_retries.max(1)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_delay: Duration::from_secs(default_retry_delay_secs()),
        }
    }
}

fn default_ttl() -> u32 {
    1
}

fn default_max_retries() -> usize {
    3
}

fn default_retry_delay_secs() -> u64 {
    5
}

fn default_request_timeout_secs() -> u64 {
    10
}
