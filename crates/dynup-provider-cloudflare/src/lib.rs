// # Cloudflare DNS Provider
//
// Implements the `DnsProvider` seam against the Cloudflare API v4 wire
// contract: one GET to find the managed record, one PUT to overwrite it.
//
// ## Behavior
//
// - One HTTP request per operation, no retry, no backoff (retry policy is
//   owned by the caller's architecture, not by providers)
// - Success is the application-level `success` flag in the response body;
//   for lookups it is trusted independently of the transport status
// - Update responses go through the shared classifier; the status buckets
//   only shape the diagnostic message
// - Dry-run mode performs lookups normally but logs the intended PUT
//   payload instead of sending it
//
// ## Security Requirements
//
// - API token NEVER appears in logs, Debug output, or error messages
// - Provider MUST fail fast if token or zone id is empty
//
// ## API Reference
//
// - Cloudflare API v4: https://developers.cloudflare.com/api/
// - List DNS Records: GET `/zones/:zone_id/dns_records?type=A&name=...`
// - Update DNS Record: PUT `/zones/:zone_id/dns_records/:record_id`

use async_trait::async_trait;
use dynup_core::traits::{DnsProvider, DnsRecord, UpdateRequest};
use dynup_core::{outcome, Error, Outcome, Result};
use serde::Deserialize;
use std::time::Duration;

/// Cloudflare API base URL
const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4";

/// Longest provider-response excerpt that gets logged
const SNIPPET_LEN: usize = 240;

/// Cloudflare DNS provider
///
/// # Dry-Run Mode
///
/// When `dry_run` is true, the provider will:
/// - Perform the record lookup GET normally
/// - Log the intended PUT payload
/// - **NOT** actually modify the DNS record
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the API token.
pub struct CloudflareProvider {
    /// Cloudflare API token
    /// ⚠️ NEVER log this value
    api_token: String,

    /// Zone the managed record lives in
    zone_id: String,

    /// API base URL; fixed in production, swapped out under test
    base_url: String,

    /// HTTP client for API requests
    client: reqwest::Client,

    /// Dry-run mode: if true, perform GET requests but skip PUT updates
    dry_run: bool,
}

// Custom Debug implementation that hides the API token
impl std::fmt::Debug for CloudflareProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudflareProvider")
            .field("api_token", &"<REDACTED>")
            .field("zone_id", &self.zone_id)
            .field("base_url", &self.base_url)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl CloudflareProvider {
    /// Create a new Cloudflare provider
    ///
    /// # Parameters
    ///
    /// - `api_token`: Cloudflare API token with Zone:DNS:Edit permission
    /// - `zone_id`: the zone the managed record lives in
    /// - `request_timeout`: upper bound for each API request
    /// - `dry_run`: if true, perform GET requests but skip PUT updates
    ///
    /// # Errors
    ///
    /// An empty token or zone id is a configuration error; a failed HTTP
    /// client construction (missing TLS backend) is a missing capability.
    pub fn new(
        api_token: impl Into<String>,
        zone_id: impl Into<String>,
        request_timeout: Duration,
        dry_run: bool,
    ) -> Result<Self> {
        Self::with_base_url(CLOUDFLARE_API_BASE, api_token, zone_id, request_timeout, dry_run)
    }

    fn with_base_url(
        base_url: impl Into<String>,
        api_token: impl Into<String>,
        zone_id: impl Into<String>,
        request_timeout: Duration,
        dry_run: bool,
    ) -> Result<Self> {
        let api_token = api_token.into();
        if api_token.is_empty() {
            return Err(Error::config("Cloudflare API token cannot be empty"));
        }
        let zone_id = zone_id.into();
        if zone_id.is_empty() {
            return Err(Error::config("Cloudflare zone id cannot be empty"));
        }

        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| {
                Error::dependency(format!("cannot construct the Cloudflare HTTP client: {e}"))
            })?;

        Ok(Self {
            api_token,
            zone_id,
            base_url: base_url.into(),
            client,
            dry_run,
        })
    }
}

/// Listing envelope for `GET /zones/:zone_id/dns_records`
#[derive(Debug, Deserialize)]
struct RecordListing {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    result: Vec<RecordPayload>,
}

/// One record object from a listing; only `id` and `content` are guaranteed
#[derive(Debug, Deserialize)]
struct RecordPayload {
    id: String,
    content: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type")]
    record_type: Option<String>,
    #[serde(default)]
    ttl: Option<u32>,
    #[serde(default)]
    proxied: Option<bool>,
}

#[async_trait]
impl DnsProvider for CloudflareProvider {
    /// Fetch the managed "A" record by name
    ///
    /// # API Call
    ///
    /// ```http
    /// GET /zones/:zone_id/dns_records?type=A&name=example.com
    /// Authorization: Bearer <token>
    /// ```
    ///
    /// The application-level `success` flag decides whether the lookup
    /// worked; the transport status alone does not.
    async fn fetch_record(&self, record_name: &str) -> Result<DnsRecord> {
        tracing::debug!("Looking up A record: {}", record_name);

        let url = format!(
            "{}/zones/{}/dns_records?type=A&name={}",
            self.base_url, self.zone_id, record_name
        );

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .send()
            .await
            .map_err(|e| Error::record_lookup(format!("record lookup request failed: {e}")))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::record_lookup(format!("failed to read lookup response: {e}")))?;

        let listing: RecordListing = match serde_json::from_str(&body) {
            Ok(listing) => listing,
            Err(_) => {
                tracing::error!(
                    "Unparseable record listing (HTTP {}): {}",
                    status,
                    body_snippet(&body)
                );
                return Err(Error::record_lookup(format!(
                    "provider returned an unparseable record listing (HTTP {status})"
                )));
            }
        };

        if !listing.success {
            tracing::error!(
                "Provider refused the record listing (HTTP {}): {}",
                status,
                body_snippet(&body)
            );
            return Err(Error::record_lookup(match outcome::first_error_message(&body) {
                Some(detail) => format!("provider refused the record listing: {detail}"),
                None => format!("provider refused the record listing (HTTP {status})"),
            }));
        }

        let payload = listing.result.into_iter().next().ok_or_else(|| {
            Error::record_lookup(format!(
                "no A record named {record_name} exists in zone {}; \
                 create the record once and dynup will keep it current",
                self.zone_id
            ))
        })?;

        tracing::debug!("Found record {} with content {}", payload.id, payload.content);

        Ok(DnsRecord {
            id: payload.id,
            name: payload.name.unwrap_or_else(|| record_name.to_string()),
            record_type: payload.record_type.unwrap_or_else(|| "A".to_string()),
            content: payload.content,
            ttl: payload.ttl.unwrap_or(1),
            proxied: payload.proxied.unwrap_or(false),
        })
    }

    /// Overwrite the record identified by `record_id` with `desired`
    ///
    /// # API Call
    ///
    /// ```http
    /// PUT /zones/:zone_id/dns_records/:record_id
    /// Authorization: Bearer <token>
    /// {"type":"A","name":"...","content":"...","ttl":1,"proxied":false}
    /// ```
    ///
    /// The transport status and response body go through the shared
    /// classifier; anything but a 200 with `success: true` is a failure.
    async fn update_record(&self, record_id: &str, desired: &UpdateRequest) -> Result<()> {
        let url = format!(
            "{}/zones/{}/dns_records/{}",
            self.base_url, self.zone_id, record_id
        );

        if self.dry_run {
            tracing::info!(
                "[DRY-RUN] Would send PUT request to {} with payload: {}",
                url,
                serde_json::to_string(desired).unwrap_or_else(|_| "<unserializable>".to_string())
            );
            return Ok(());
        }

        tracing::info!(
            "Updating record {}: {} -> {}",
            record_id,
            desired.name,
            desired.content
        );

        let response = self
            .client
            .put(&url)
            .bearer_auth(&self.api_token)
            .header("Content-Type", "application/json")
            .json(desired)
            .send()
            .await
            .map_err(|e| Error::update(format!("update request failed: {e}")))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::update(format!("failed to read update response: {e}")))?;

        match outcome::classify(status, &body) {
            Outcome::Success => {
                tracing::info!("Record updated: {} -> {}", desired.name, desired.content);
                Ok(())
            }
            _ => {
                tracing::error!(
                    "Provider rejected the update (HTTP {}): {}",
                    status,
                    body_snippet(&body)
                );
                Err(Error::update_rejected(
                    status,
                    outcome::update_failure_message(status, &body),
                ))
            }
        }
    }

    fn provider_name(&self) -> &'static str {
        "cloudflare"
    }
}

/// Clip a provider response for logging; bodies are external input and can
/// be arbitrarily large
fn body_snippet(body: &str) -> String {
    if body.chars().count() <= SNIPPET_LEN {
        body.to_string()
    } else {
        let clipped: String = body.chars().take(SNIPPET_LEN).collect();
        format!("{clipped}...")
    }
}
