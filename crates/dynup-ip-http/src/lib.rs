// # HTTP IP Source
//
// Discovers the host's current public IPv4 address by asking external
// "what is my IP" services over HTTP.
//
// ## Discovery strategy
//
// A prioritized endpoint list is walked in order. Each endpoint gets a
// bounded number of attempts with a pause between them; the first body
// that yields a valid IPv4 address wins and short-circuits everything
// else. Moving on to the next endpoint carries no pause. Only when every
// endpoint is exhausted does discovery fail, so the worst case is exactly
// `endpoints x attempts` requests.
//
// ## Address extraction
//
// Services answer with a bare address, sometimes wrapped in whitespace or
// prose. The body is scanned for dotted-quad candidates and each candidate
// is validated with the real address parser; the first one that parses is
// the answer. Bodies of non-success responses are never scanned.

use dynup_core::config::RetryPolicy;
use dynup_core::{Error, IpSource, Result};

use regex::Regex;
use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;

/// Default IP check services, tried in order
const DEFAULT_IP_SERVICES: &[&str] = &[
    "https://api.ipify.org",  // 43KB/day free, returns plain text IP
    "https://ifconfig.me/ip", // No rate limit documented
    "https://icanhazip.com",  // No rate limit documented
];

/// Candidate pattern only; every hit is still validated by the address parser
static IPV4_CANDIDATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}\b").expect("pattern is well-formed"));

/// HTTP-based IP source with per-endpoint retry and endpoint fallback
pub struct HttpIpSource {
    /// Discovery endpoints in priority order
    endpoints: Vec<String>,

    /// Attempts per endpoint and the pause between them
    retry: RetryPolicy,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a source over the default service list
    pub fn new(retry: RetryPolicy, request_timeout: Duration) -> Result<Self> {
        Self::with_endpoints(
            DEFAULT_IP_SERVICES.iter().map(|s| s.to_string()).collect(),
            retry,
            request_timeout,
        )
    }

    /// Create a source over a custom endpoint list
    ///
    /// # Parameters
    ///
    /// - `endpoints`: discovery URLs, tried in list order
    /// - `retry`: attempts per endpoint and the pause between attempts
    /// - `request_timeout`: upper bound for each individual request
    pub fn with_endpoints(
        endpoints: Vec<String>,
        retry: RetryPolicy,
        request_timeout: Duration,
    ) -> Result<Self> {
        if endpoints.is_empty() {
            return Err(Error::config("discovery endpoint list must not be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| {
                Error::dependency(format!("cannot construct the discovery HTTP client: {e}"))
            })?;

        Ok(Self {
            endpoints,
            retry,
            client,
        })
    }

    /// One GET against one endpoint; any shortcoming is a failed attempt
    async fn fetch_candidate(&self, endpoint: &str) -> std::result::Result<Ipv4Addr, String> {
        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            // Error pages embed addresses of their own; do not scan them.
            return Err(format!("service answered with HTTP {status}"));
        }

        let body = response
            .text()
            .await
            .map_err(|e| format!("failed to read response body: {e}"))?;

        extract_ipv4(&body).ok_or_else(|| "no IPv4 address in response body".to_string())
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn resolve(&self) -> Result<Ipv4Addr> {
        let attempts = self.retry.attempts_per_endpoint();

        for endpoint in &self.endpoints {
            for attempt in 1..=attempts {
                match self.fetch_candidate(endpoint).await {
                    Ok(address) => {
                        tracing::info!("Public address {} discovered via {}", address, endpoint);
                        return Ok(address);
                    }
                    Err(reason) => {
                        tracing::warn!(
                            "Discovery attempt {}/{} against {} failed: {}",
                            attempt,
                            attempts,
                            endpoint,
                            reason
                        );
                        // Pause only between attempts on the same endpoint.
                        if attempt < attempts {
                            tokio::time::sleep(self.retry.retry_delay).await;
                        }
                    }
                }
            }
        }

        Err(Error::ip_discovery(format!(
            "all {} discovery endpoints failed after {} attempt(s) each",
            self.endpoints.len(),
            attempts
        )))
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}

/// Extract the first candidate that parses as a real IPv4 address
fn extract_ipv4(body: &str) -> Option<Ipv4Addr> {
    IPV4_CANDIDATE
        .find_iter(body)
        .find_map(|candidate| Ipv4Addr::from_str(candidate.as_str()).ok())
}
