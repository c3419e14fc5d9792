//! One-shot update pipeline
//!
//! The pipeline runs four stages in a fixed order and stops at the first
//! failure:
//!
//! ```text
//! resolve ──▶ fetch ──▶ decide ──▶ apply
//! (source)   (provider)  (here)    (provider)
//! ```
//!
//! Stage outputs flow into the next stage's parameters; there is no shared
//! mutable state and nothing is retried at this level. Retry and fallback
//! belong to the [`IpSource`] implementation alone.

use crate::config::RunConfig;
use crate::error::Result;
use crate::traits::{DnsProvider, DnsRecord, IpSource, UpdateRequest};
use std::net::Ipv4Addr;
use tracing::{debug, info};

/// What a completed run did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateAction {
    /// The record was written
    Updated,
    /// The record already carried the resolved address and the write was skipped
    Unchanged,
}

/// Result of a successful run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// The public address discovery produced
    pub address: Ipv4Addr,
    /// Whether the record was written or left alone
    pub action: UpdateAction,
}

/// Sequential orchestrator for one update run
pub struct Pipeline {
    source: Box<dyn IpSource>,
    provider: Box<dyn DnsProvider>,
    config: RunConfig,
}

impl Pipeline {
    /// Assemble a pipeline from a source, a provider, and a validated
    /// configuration.
    ///
    /// Validation happens here so that an invalid configuration can never
    /// reach a network call.
    pub fn new(
        source: Box<dyn IpSource>,
        provider: Box<dyn DnsProvider>,
        config: RunConfig,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            source,
            provider,
            config,
        })
    }

    /// Execute one run: resolve, fetch, decide, apply.
    pub async fn run(&self) -> Result<RunSummary> {
        info!(
            record = %self.config.record_name,
            source = self.source.source_name(),
            provider = self.provider.provider_name(),
            "starting update run"
        );

        let resolved = self.source.resolve().await?;
        info!(address = %resolved, "public address resolved");

        let existing = self.provider.fetch_record(&self.config.record_name).await?;
        debug!(
            record_id = %existing.id,
            current = %existing.content,
            "authoritative record fetched"
        );

        if !self.config.always_update && record_is_current(&existing, resolved) {
            info!(address = %resolved, "record already current, skipping write");
            return Ok(RunSummary {
                address: resolved,
                action: UpdateAction::Unchanged,
            });
        }

        let desired = UpdateRequest::a_record(
            self.config.record_name.clone(),
            resolved,
            self.config.ttl,
            self.config.proxied,
        );
        self.provider.update_record(&existing.id, &desired).await?;
        info!(record = %self.config.record_name, address = %resolved, "record updated");

        Ok(RunSummary {
            address: resolved,
            action: UpdateAction::Updated,
        })
    }
}

/// A record counts as current only when its content parses as an IPv4
/// address equal to the resolved one. Unparseable content forces a write.
fn record_is_current(existing: &DnsRecord, resolved: Ipv4Addr) -> bool {
    existing
        .content
        .parse::<Ipv4Addr>()
        .map(|current| current == resolved)
        .unwrap_or(false)
}
