// # Trait seams
//
// The pipeline talks to the outside world through exactly two traits:
// one that discovers the public address and one that reads/writes the
// authoritative record. Tests mock through the same seams.

pub mod dns_provider;
pub mod ip_source;

pub use dns_provider::{DnsProvider, DnsRecord, UpdateRequest};
pub use ip_source::IpSource;
