//! Run outcomes and provider-response classification
//!
//! A run finishes with exactly one [`Outcome`], and every outcome owns a
//! stable process exit code. The classifier in this module is the single
//! place that decides whether a provider's update response counts as a
//! success: transport status and response body go in, an outcome comes out.

use serde::Deserialize;
use std::fmt;

/// Terminal result of a single update run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The record was written, or was already current and the write was skipped
    Success,
    /// No discovery endpoint produced a usable public address
    IpDiscoveryFailed,
    /// The authoritative record could not be fetched or does not exist
    RecordLookupFailed,
    /// The provider refused or failed the record write
    UpdateFailed,
    /// The run configuration was rejected before any network call
    ConfigInvalid,
    /// A required capability (HTTP client, runtime) could not be constructed
    DependencyMissing,
}

impl Outcome {
    /// Stable process exit code for this outcome.
    ///
    /// The mapping is part of the tool's contract; scripts key on it:
    /// 0 success, 1 discovery, 2 lookup, 3 update, 4 operator error
    /// (invalid configuration or missing capability, both pre-network).
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Success => 0,
            Outcome::IpDiscoveryFailed => 1,
            Outcome::RecordLookupFailed => 2,
            Outcome::UpdateFailed => 3,
            Outcome::ConfigInvalid => 4,
            Outcome::DependencyMissing => 4,
        }
    }
}

impl From<&crate::Error> for Outcome {
    fn from(err: &crate::Error) -> Self {
        match err {
            crate::Error::Config(_) => Outcome::ConfigInvalid,
            crate::Error::Dependency(_) => Outcome::DependencyMissing,
            crate::Error::IpDiscovery(_) => Outcome::IpDiscoveryFailed,
            crate::Error::RecordLookup(_) => Outcome::RecordLookupFailed,
            crate::Error::Update { .. } => Outcome::UpdateFailed,
        }
    }
}

/// Coarse reason bucket for a rejected update.
///
/// The bucket only shapes the diagnostic message; every rejected update is
/// the same [`Outcome::UpdateFailed`] regardless of bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateRejection {
    /// 400: the request body did not pass provider validation
    MalformedPayload,
    /// 401: the API token was rejected outright
    BadCredentials,
    /// 403: the token authenticated but may not edit this record
    InsufficientPermission,
    /// 404: the zone or record id does not exist
    UnknownTarget,
    /// 429: the provider throttled the client
    RateLimited,
    /// 5xx: the provider itself failed
    ProviderSide,
    /// Anything else, including responses with no status at all
    Unexpected,
}

impl UpdateRejection {
    /// Bucket a transport status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => UpdateRejection::MalformedPayload,
            401 => UpdateRejection::BadCredentials,
            403 => UpdateRejection::InsufficientPermission,
            404 => UpdateRejection::UnknownTarget,
            429 => UpdateRejection::RateLimited,
            500..=599 => UpdateRejection::ProviderSide,
            _ => UpdateRejection::Unexpected,
        }
    }
}

impl fmt::Display for UpdateRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            UpdateRejection::MalformedPayload => "malformed update payload",
            UpdateRejection::BadCredentials => "bad credentials, the API token was rejected",
            UpdateRejection::InsufficientPermission => {
                "insufficient permission to modify the record"
            }
            UpdateRejection::UnknownTarget => "unknown zone or record",
            UpdateRejection::RateLimited => "rate limited by the provider, retry later",
            UpdateRejection::ProviderSide => "provider-side error, likely transient",
            UpdateRejection::Unexpected => "unexpected provider response",
        };
        f.write_str(text)
    }
}

/// Application-level envelope the provider wraps every response in
#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    code: Option<i64>,
    message: String,
}

impl ApiErrorDetail {
    fn detail(&self) -> String {
        match self.code {
            Some(code) => format!("{code}: {}", self.message),
            None => self.message.clone(),
        }
    }
}

/// Classify an update response into an outcome.
///
/// An update succeeded only when the transport answered 200 AND the body
/// carries an application-level `success: true`. A missing, false, or
/// unparseable flag is a failure even on HTTP 200; any non-200 status is a
/// failure regardless of body.
pub fn classify(status: u16, body: &str) -> Outcome {
    if status != 200 {
        return Outcome::UpdateFailed;
    }
    match serde_json::from_str::<ApiEnvelope>(body) {
        Ok(envelope) if envelope.success => Outcome::Success,
        _ => Outcome::UpdateFailed,
    }
}

/// Extract the first `errors[].message` (with its code, when present) from
/// a provider response body, if the body parses as the envelope at all.
pub fn first_error_message(body: &str) -> Option<String> {
    let envelope: ApiEnvelope = serde_json::from_str(body).ok()?;
    envelope.errors.first().map(ApiErrorDetail::detail)
}

/// Build the human-readable diagnostic for a rejected update.
///
/// HTTP 200 rejections quote the provider's own error detail; non-200
/// rejections lead with the status bucket and append the detail when the
/// body offers one.
pub fn update_failure_message(status: u16, body: &str) -> String {
    if status == 200 {
        return match first_error_message(body) {
            Some(detail) => format!("provider rejected the update: {detail}"),
            None => "provider rejected the update without an error detail".to_string(),
        };
    }
    let rejection = UpdateRejection::from_status(status);
    match first_error_message(body) {
        Some(detail) => format!("{rejection} (HTTP {status}): {detail}"),
        None => format!("{rejection} (HTTP {status})"),
    }
}
