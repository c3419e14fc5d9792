//! Error types for the update pipeline
//!
//! Each variant corresponds to one pipeline stage, so any error maps to
//! exactly one [`Outcome`](crate::Outcome) and one exit code.

use crate::outcome::UpdateRejection;
use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the update pipeline
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (missing or malformed run settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// A required runtime capability could not be constructed
    #[error("Missing capability: {0}")]
    Dependency(String),

    /// Public IP discovery failed across all endpoints
    #[error("IP discovery error: {0}")]
    IpDiscovery(String),

    /// The authoritative record could not be fetched or does not exist
    #[error("Record lookup error: {0}")]
    RecordLookup(String),

    /// The provider refused or failed the record update
    #[error("Record update error: {message}")]
    Update {
        /// Transport status of the rejected update, when one was received
        status: Option<u16>,
        /// Coarse reason bucket derived from the transport status
        rejection: UpdateRejection,
        /// Human-readable diagnostic, safe to log
        message: String,
    },
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a missing-capability error
    pub fn dependency(msg: impl Into<String>) -> Self {
        Self::Dependency(msg.into())
    }

    /// Create an IP discovery error
    pub fn ip_discovery(msg: impl Into<String>) -> Self {
        Self::IpDiscovery(msg.into())
    }

    /// Create a record lookup error
    pub fn record_lookup(msg: impl Into<String>) -> Self {
        Self::RecordLookup(msg.into())
    }

    /// Create an update error with no transport status (request never completed)
    pub fn update(msg: impl Into<String>) -> Self {
        Self::Update {
            status: None,
            rejection: UpdateRejection::Unexpected,
            message: msg.into(),
        }
    }

    /// Create an update error for a response the provider answered with
    pub fn update_rejected(status: u16, msg: impl Into<String>) -> Self {
        Self::Update {
            status: Some(status),
            rejection: UpdateRejection::from_status(status),
            message: msg.into(),
        }
    }
}
