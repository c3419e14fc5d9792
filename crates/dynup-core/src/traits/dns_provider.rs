// # DNS Provider Trait
//
// Defines the interface for reading and writing the managed record via
// provider APIs.
//
// ## Implementations
//
// - Cloudflare: `dynup-provider-cloudflare` crate
// - Future: Route53, DigitalOcean, GoDaddy, etc.
//
// ## Usage
//
// ```rust,ignore
// use dynup_core::{DnsProvider, UpdateRequest};
//
// let provider = /* DnsProvider implementation */;
// let record = provider.fetch_record("home.example.com").await?;
// let desired = UpdateRequest::a_record("home.example.com", address, 1, false);
// provider.update_record(&record.id, &desired).await?;
// ```

use async_trait::async_trait;
use serde::Serialize;
use std::net::Ipv4Addr;

/// The authoritative record as the provider currently holds it
///
/// Fetched once per run and never cached across runs; the provider's copy
/// is the only durable state this tool reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    /// Provider-assigned record identifier, required for updates
    pub id: String,
    /// Fully qualified record name
    pub name: String,
    /// Record type as reported by the provider
    pub record_type: String,
    /// Record content (the address, as the provider returned it)
    pub content: String,
    /// TTL in seconds; 1 is the provider's "automatic" sentinel
    pub ttl: u32,
    /// Whether the record is proxied through the provider's edge
    pub proxied: bool,
}

/// Desired record state sent to the provider on update
///
/// Serializes to exactly the five fields the provider's update endpoint
/// accepts; nothing else goes on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdateRequest {
    /// Record type, always "A" for this tool
    #[serde(rename = "type")]
    pub record_type: String,
    /// Fully qualified record name
    pub name: String,
    /// New record content (dotted-quad address)
    pub content: String,
    /// TTL in seconds; 1 selects the provider's automatic TTL
    pub ttl: u32,
    /// Whether the record should be proxied
    pub proxied: bool,
}

impl UpdateRequest {
    /// Build the desired state for an "A" record pointing at `address`
    pub fn a_record(name: impl Into<String>, address: Ipv4Addr, ttl: u32, proxied: bool) -> Self {
        Self {
            record_type: "A".to_string(),
            name: name.into(),
            content: address.to_string(),
            ttl,
            proxied,
        }
    }
}

/// Trait for DNS provider implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Retry
///
/// Implementations make exactly one API call per invocation and never
/// retry internally. A failed call returns an error; whether anything is
/// tried again is the caller's decision (today: nothing is).
///
/// # Decision Ownership
///
/// Providers never decide whether an update is needed. The
/// [`Pipeline`](crate::Pipeline) compares the fetched record against the
/// resolved address and calls `update_record` only when a write is due.
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// Fetch the managed "A" record by name
    ///
    /// # Parameters
    ///
    /// - `record_name`: the fully qualified record name (e.g. "home.example.com")
    ///
    /// # Returns
    ///
    /// - `Ok(DnsRecord)`: the record as the provider currently holds it
    /// - `Err(Error)`: the lookup failed or no such record exists
    async fn fetch_record(&self, record_name: &str) -> Result<DnsRecord, crate::Error>;

    /// Overwrite the record identified by `record_id` with `desired`
    ///
    /// # Parameters
    ///
    /// - `record_id`: the provider-assigned identifier from a prior fetch
    /// - `desired`: the complete desired record state
    ///
    /// # Returns
    ///
    /// - `Ok(())`: the provider acknowledged the write
    /// - `Err(Error)`: the provider refused or the request failed
    async fn update_record(&self, record_id: &str, desired: &UpdateRequest)
    -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
