//! Minimal embedding example for dynup-core
//!
//! This example demonstrates using dynup-core as a library in a custom
//! application: bring your own IP source and DNS provider, assemble a
//! pipeline, and run it on your own schedule.

use async_trait::async_trait;
use dynup_core::traits::{DnsProvider, DnsRecord, IpSource, UpdateRequest};
use dynup_core::{Pipeline, Result, RunConfig, UpdateAction};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Custom IP source for embedded usage
struct EmbeddedIpSource {
    current: Ipv4Addr,
}

#[async_trait]
impl IpSource for EmbeddedIpSource {
    async fn resolve(&self) -> Result<Ipv4Addr> {
        Ok(self.current)
    }

    fn source_name(&self) -> &'static str {
        "embedded"
    }
}

/// Custom DNS provider for embedded usage: an in-memory record plus a
/// write counter
struct EmbeddedProvider {
    record: Arc<Mutex<DnsRecord>>,
    update_calls: Arc<AtomicUsize>,
}

impl EmbeddedProvider {
    fn new(initial_content: &str) -> Self {
        Self {
            record: Arc::new(Mutex::new(DnsRecord {
                id: "embedded-id".to_string(),
                name: "home.example.com".to_string(),
                record_type: "A".to_string(),
                content: initial_content.to_string(),
                ttl: 300,
                proxied: false,
            })),
            update_calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

#[async_trait]
impl DnsProvider for EmbeddedProvider {
    async fn fetch_record(&self, _record_name: &str) -> Result<DnsRecord> {
        Ok(self.record.lock().unwrap().clone())
    }

    async fn update_record(&self, record_id: &str, desired: &UpdateRequest) -> Result<()> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        println!("[Embedded] Updating {} -> {}", record_id, desired.content);

        let mut record = self.record.lock().unwrap();
        record.content = desired.content.clone();
        record.ttl = desired.ttl;
        record.proxied = desired.proxied;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "embedded"
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Embedded dynup-core Example ===\n");

    // Create custom components
    let source = EmbeddedIpSource {
        current: Ipv4Addr::new(203, 0, 113, 7),
    };
    let provider = EmbeddedProvider::new("198.51.100.1");
    let update_calls = provider.update_calls.clone();

    // Change-gated policy: write only when the address differs
    let config = RunConfig::new("embedded-token", "embedded-zone", "home.example.com")
        .with_always_update(false);

    println!("1. Assembling pipeline...");
    let pipeline = Pipeline::new(Box::new(source), Box::new(provider), config)?;

    println!("2. First run (record is stale, expect a write)...");
    let summary = pipeline.run().await?;
    assert_eq!(summary.action, UpdateAction::Updated);
    println!("   {} -> {:?}", summary.address, summary.action);

    println!("3. Second run (record is current, expect a no-op)...");
    let summary = pipeline.run().await?;
    assert_eq!(summary.action, UpdateAction::Unchanged);
    println!("   {} -> {:?}", summary.address, summary.action);

    println!("\n=== Embedding Successful ===");
    println!("Key Points:");
    println!("- Pipeline lifecycle is fully controlled by the application");
    println!("- No global state");
    println!("- All components are custom (not the dynup binary defaults)");
    println!("- Writes performed: {}", update_calls.load(Ordering::SeqCst));

    Ok(())
}
