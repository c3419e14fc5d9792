//! Test doubles and common utilities for pipeline contract tests
//!
//! The doubles count every call through the trait seams so tests can
//! assert exactly how often each stage ran.

use dynup_core::error::Result;
use dynup_core::traits::{DnsProvider, DnsRecord, IpSource, UpdateRequest};
use dynup_core::RunConfig;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// An IP source that always resolves the same address and counts calls
pub struct FixedIpSource {
    address: Ipv4Addr,
    resolve_call_count: Arc<AtomicUsize>,
}

impl FixedIpSource {
    pub fn new(address: Ipv4Addr) -> Self {
        Self {
            address,
            resolve_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of times resolve() was called
    pub fn resolve_call_count(&self) -> usize {
        self.resolve_call_count.load(Ordering::SeqCst)
    }

    /// Create a new FixedIpSource that shares counters with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            address: other.address,
            resolve_call_count: Arc::clone(&other.resolve_call_count),
        }
    }
}

#[async_trait::async_trait]
impl IpSource for FixedIpSource {
    async fn resolve(&self) -> Result<Ipv4Addr> {
        self.resolve_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.address)
    }

    fn source_name(&self) -> &'static str {
        "fixed-test"
    }
}

/// A stateful mock DnsProvider: updates rewrite the stored record, so a
/// later fetch observes what an earlier run wrote
pub struct MockDnsProvider {
    record: Arc<std::sync::Mutex<DnsRecord>>,
    fetch_call_count: Arc<AtomicUsize>,
    update_call_count: Arc<AtomicUsize>,
    last_update: Arc<std::sync::Mutex<Option<(String, UpdateRequest)>>>,
}

impl MockDnsProvider {
    pub fn new(record: DnsRecord) -> Self {
        Self {
            record: Arc::new(std::sync::Mutex::new(record)),
            fetch_call_count: Arc::new(AtomicUsize::new(0)),
            update_call_count: Arc::new(AtomicUsize::new(0)),
            last_update: Arc::new(std::sync::Mutex::new(None)),
        }
    }

    /// Get the number of times fetch_record() was called
    pub fn fetch_call_count(&self) -> usize {
        self.fetch_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of times update_record() was called
    pub fn update_call_count(&self) -> usize {
        self.update_call_count.load(Ordering::SeqCst)
    }

    /// Get the record id and request of the most recent update, if any
    pub fn last_update(&self) -> Option<(String, UpdateRequest)> {
        self.last_update.lock().unwrap().clone()
    }

    /// Get the record content as the provider currently holds it
    pub fn current_content(&self) -> String {
        self.record.lock().unwrap().content.clone()
    }

    /// Create a new MockDnsProvider that shares state with an existing one
    pub fn sharing_counters_with(other: &Self) -> Self {
        Self {
            record: Arc::clone(&other.record),
            fetch_call_count: Arc::clone(&other.fetch_call_count),
            update_call_count: Arc::clone(&other.update_call_count),
            last_update: Arc::clone(&other.last_update),
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn fetch_record(&self, _record_name: &str) -> Result<DnsRecord> {
        self.fetch_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.record.lock().unwrap().clone())
    }

    async fn update_record(&self, record_id: &str, desired: &UpdateRequest) -> Result<()> {
        self.update_call_count.fetch_add(1, Ordering::SeqCst);
        *self.last_update.lock().unwrap() = Some((record_id.to_string(), desired.clone()));

        let mut record = self.record.lock().unwrap();
        record.content = desired.content.clone();
        record.ttl = desired.ttl;
        record.proxied = desired.proxied;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Helper to seed the mock provider with an authoritative record
pub fn existing_record(content: &str) -> DnsRecord {
    DnsRecord {
        id: "rec123".to_string(),
        name: "home.example.com".to_string(),
        record_type: "A".to_string(),
        content: content.to_string(),
        ttl: 1,
        proxied: false,
    }
}

/// Helper to create a minimal valid RunConfig for testing
pub fn minimal_config(record_name: &str) -> RunConfig {
    RunConfig::new("test-token", "zone-test", record_name)
}
