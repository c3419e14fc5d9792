// # dynup-core
//
// Core library for the one-shot dynamic DNS updater.
//
// ## Architecture Overview
//
// This library provides everything above the wire:
// - **IpSource**: Trait for discovering the current public IPv4 address
// - **DnsProvider**: Trait for reading and writing the managed record
// - **Pipeline**: Sequential orchestrator (resolve → fetch → decide → apply)
// - **Outcome**: Terminal run classification with stable exit codes
// - **RunConfig**: Validated, immutable per-run configuration
//
// ## Design Principles
//
// 1. **Strict pipeline**: Each stage's output feeds the next stage's input;
//    no shared mutable state, no cycles.
// 2. **One failure signal per stage**: Every error maps to exactly one
//    outcome and one exit code.
// 3. **Retry confinement**: Only IP discovery retries; the pipeline and the
//    provider never do.
// 4. **Library-first**: The binary is a thin assembly layer; everything
//    here is usable embedded.

pub mod config;
pub mod error;
pub mod outcome;
pub mod pipeline;
pub mod traits;

// Re-export core types for convenience
pub use config::{RetryPolicy, RunConfig};
pub use error::{Error, Result};
pub use outcome::{Outcome, UpdateRejection};
pub use pipeline::{Pipeline, RunSummary, UpdateAction};
pub use traits::{DnsProvider, DnsRecord, IpSource, UpdateRequest};
