// # Cloudflare Provider Real Environment Validation Tool
//
// Drives the real Cloudflare provider (and, optionally, real IP discovery)
// in a controlled environment. Defaults to dry-run; live mode sends the PUT.
//
// ## Usage
//
// ```bash
// # Dry-run mode (default - safe)
// DYNUP_MODE=dry-run \
// DYNUP_API_TOKEN=your_token \
// DYNUP_ZONE_ID=your_zone_id \
// DYNUP_RECORD_NAME=dynup-test.example.com \
// cargo run --bin cloudflare_validation
//
// # Live mode (makes actual changes!)
// DYNUP_MODE=live \
// DYNUP_API_TOKEN=your_token \
// DYNUP_ZONE_ID=your_zone_id \
// DYNUP_RECORD_NAME=dynup-test.example.com \
// DYNUP_TEST_IP=203.0.113.7 \
// cargo run --bin cloudflare_validation
// ```
//
// ## Environment Variables
//
// Required:
// - `DYNUP_API_TOKEN`: Cloudflare API token
// - `DYNUP_ZONE_ID`: Zone the record lives in
// - `DYNUP_RECORD_NAME`: Full record name (e.g., "dynup-test.example.com")
//
// Optional:
// - `DYNUP_TEST_IP`: Address to write (default: discover via HTTP)
// - `DYNUP_MODE`: "dry-run" or "live" (default: dry-run)

use dynup_core::RetryPolicy;
use dynup_core::traits::{DnsProvider, IpSource, UpdateRequest};
use dynup_ip_http::HttpIpSource;
use dynup_provider_cloudflare::CloudflareProvider;
use std::env;
use std::net::Ipv4Addr;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    tracing::info!("=== Cloudflare Provider Real Environment Validation ===");

    // Read environment variables
    let api_token = env::var("DYNUP_API_TOKEN").unwrap_or_else(|_| {
        tracing::error!("DYNUP_API_TOKEN environment variable is required");
        std::process::exit(1);
    });

    let zone_id = env::var("DYNUP_ZONE_ID").unwrap_or_else(|_| {
        tracing::error!("DYNUP_ZONE_ID environment variable is required");
        std::process::exit(1);
    });

    let record_name = env::var("DYNUP_RECORD_NAME").unwrap_or_else(|_| {
        tracing::error!("DYNUP_RECORD_NAME environment variable is required");
        std::process::exit(1);
    });

    let mode = env::var("DYNUP_MODE").unwrap_or_else(|_| "dry-run".to_string());
    let dry_run = mode.to_lowercase() != "live";

    if dry_run {
        tracing::warn!("Running in DRY-RUN mode - no changes will be made");
    } else {
        tracing::warn!("Running in LIVE mode - will make actual DNS changes!");
    }

    tracing::info!("Configuration:");
    tracing::info!("  Record: {}", record_name);
    tracing::info!("  Zone ID: {}", zone_id);
    tracing::info!("  Mode: {}", mode);

    // Step 1: determine the address to write
    tracing::info!("--- Step 1: Determining Address ---");
    let address: Ipv4Addr = match env::var("DYNUP_TEST_IP") {
        Ok(raw) => raw.parse()?,
        Err(_) => {
            tracing::info!("DYNUP_TEST_IP not set, discovering the public address");
            let source = HttpIpSource::new(
                RetryPolicy::new(2, Duration::from_secs(2)),
                Duration::from_secs(10),
            )?;
            source.resolve().await?
        }
    };
    tracing::info!("Address under test: {}", address);

    // Step 2: create the provider
    tracing::info!("--- Step 2: Creating Cloudflare Provider ---");
    let provider = CloudflareProvider::new(api_token, zone_id, Duration::from_secs(10), dry_run)?;
    tracing::info!("Provider created (API token not shown for security)");

    // Step 3: fetch the record (tests auth and the managed-record precondition)
    tracing::info!("--- Step 3: Fetching Record ---");
    let record = provider.fetch_record(&record_name).await?;
    tracing::info!(
        "Record {} currently points at {} (ttl {}, proxied {})",
        record.name,
        record.content,
        record.ttl,
        record.proxied
    );

    // Step 4: update, preserving the record's existing ttl/proxied shape
    tracing::info!("--- Step 4: Updating Record ---");
    let desired = UpdateRequest::a_record(record_name.clone(), address, record.ttl, record.proxied);
    provider.update_record(&record.id, &desired).await?;
    tracing::info!("Update accepted");

    if dry_run {
        tracing::info!("=== DRY-RUN COMPLETE ===");
        tracing::info!("No changes were made to DNS records.");
        tracing::info!("To make actual changes, set DYNUP_MODE=live");
    } else {
        tracing::info!("=== LIVE MODE COMPLETE ===");
        tracing::info!("Verify at: https://dnschecker.org/#A/{}", record_name);
    }

    Ok(())
}
