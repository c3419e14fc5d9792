//! Contract tests for stage dataflow
//!
//! Each stage's output feeds the next stage's input: the update must be
//! aimed at the record id the lookup produced and carry the configured
//! name plus the resolved address, nothing else.

mod common;

use common::*;
use dynup_core::{Pipeline, UpdateAction};
use std::net::Ipv4Addr;

#[tokio::test]
async fn the_write_targets_the_fetched_record_id() {
    let address = Ipv4Addr::new(203, 0, 113, 7);
    let source = FixedIpSource::new(address);
    let provider = MockDnsProvider::new(existing_record("198.51.100.1"));
    let provider_handle = MockDnsProvider::sharing_counters_with(&provider);

    let pipeline = Pipeline::new(
        Box::new(source),
        Box::new(provider),
        minimal_config("home.example.com"),
    )
    .unwrap();
    let summary = pipeline.run().await.unwrap();

    assert_eq!(summary.address, address);
    assert_eq!(summary.action, UpdateAction::Updated);

    let (record_id, _) = provider_handle.last_update().expect("a write happened");
    assert_eq!(record_id, "rec123");
}

#[tokio::test]
async fn the_request_carries_the_configured_name_and_resolved_address() {
    let address = Ipv4Addr::new(203, 0, 113, 7);
    let source = FixedIpSource::new(address);
    let provider = MockDnsProvider::new(existing_record("198.51.100.1"));
    let provider_handle = MockDnsProvider::sharing_counters_with(&provider);
    let config = minimal_config("home.example.com")
        .with_ttl(300)
        .with_proxied(true);

    let pipeline = Pipeline::new(Box::new(source), Box::new(provider), config).unwrap();
    pipeline.run().await.unwrap();

    let (_, request) = provider_handle.last_update().expect("a write happened");
    assert_eq!(request.record_type, "A");
    assert_eq!(request.name, "home.example.com");
    assert_eq!(request.content, "203.0.113.7");
    assert_eq!(request.ttl, 300);
    assert!(request.proxied);
}
