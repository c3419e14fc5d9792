// # IP Source Trait
//
// Defines the interface for discovering the host's current public IPv4
// address.
//
// ## Implementations
//
// - HTTP discovery services: `dynup-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use dynup_core::IpSource;
//
// let source = /* IpSource implementation */;
// let address = source.resolve().await?;
// ```

use async_trait::async_trait;
use std::net::Ipv4Addr;

/// Trait for public-address discovery implementations
///
/// A source owns its own retry and fallback policy: when `resolve`
/// returns an error, every avenue the source knows about has already
/// been tried. The pipeline never retries a source.
///
/// The address type is IPv4-only on purpose; records other than "A" are
/// out of scope for this tool.
#[async_trait]
pub trait IpSource: Send + Sync {
    /// Resolve the host's current public IPv4 address
    ///
    /// # Returns
    ///
    /// - `Ok(Ipv4Addr)`: the first address any discovery avenue produced
    /// - `Err(Error)`: all avenues failed; the run cannot proceed
    async fn resolve(&self) -> Result<Ipv4Addr, crate::Error>;

    /// Get the source name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
