// # dynup - One-Shot Dynamic DNS Updater
//
// The dynup binary is a thin integration layer. It is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing tracing and the async runtime
// 3. Assembling the pipeline (HTTP IP discovery + Cloudflare provider)
// 4. Mapping the run outcome to a process exit code
//
// All update logic lives in dynup-core; this binary adds none.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Provider
// - `DYNUP_API_TOKEN`: Cloudflare API token (required)
// - `DYNUP_ZONE_ID`: Zone the managed record lives in (required)
// - `DYNUP_RECORD_NAME`: FQDN of the managed A record (required)
//
// ### Record shape
// - `DYNUP_TTL`: Record TTL in seconds, 1 = provider-automatic (default: 1)
// - `DYNUP_PROXIED`: Proxy the record through the provider edge (default: false)
//
// ### Decision policy
// - `DYNUP_ALWAYS_UPDATE`: Write even when the address is unchanged (default: true)
// - `DYNUP_DRY_RUN`: Log the write instead of sending it (default: false)
//
// ### Discovery
// - `DYNUP_IP_ENDPOINTS`: Comma-separated discovery URLs (default: built-in list)
// - `DYNUP_MAX_RETRIES`: Attempts per discovery endpoint (default: 3)
// - `DYNUP_RETRY_DELAY_SECS`: Pause between attempts on one endpoint (default: 5)
//
// ### Transport
// - `DYNUP_TIMEOUT_SECS`: Per-request timeout in seconds (default: 10)
//
// ### Logging
// - `DYNUP_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Exit Codes
//
// - 0: record updated or already current
// - 1: public IP discovery failed
// - 2: record lookup failed
// - 3: record update failed
// - 4: invalid configuration or missing capability
//
// ## Example
//
// ```bash
// export DYNUP_API_TOKEN=your_token
// export DYNUP_ZONE_ID=023e105f4ecef8ad9ca31a8372d0c353
// export DYNUP_RECORD_NAME=home.example.com
//
// dynup
// ```

use anyhow::Result;
use dynup_core::{Outcome, Pipeline, RetryPolicy, RunConfig, UpdateAction};
use dynup_ip_http::HttpIpSource;
use dynup_provider_cloudflare::CloudflareProvider;
use std::env;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;

/// Application configuration
struct Config {
    api_token: String,
    zone_id: String,
    record_name: String,
    ttl: u32,
    proxied: bool,
    always_update: bool,
    dry_run: bool,
    ip_endpoints: Vec<String>,
    max_retries: usize,
    retry_delay_secs: u64,
    timeout_secs: u64,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Absent variables fall back to defaults. A present but unparseable
    /// value is a hard error, not a silent default.
    fn from_env() -> Result<Self> {
        Ok(Self {
            api_token: env::var("DYNUP_API_TOKEN").unwrap_or_default(),
            zone_id: env::var("DYNUP_ZONE_ID").unwrap_or_default(),
            record_name: env::var("DYNUP_RECORD_NAME").unwrap_or_default(),
            ttl: env_parsed("DYNUP_TTL", 1u32)?,
            proxied: env_bool("DYNUP_PROXIED", false)?,
            always_update: env_bool("DYNUP_ALWAYS_UPDATE", true)?,
            dry_run: env_bool("DYNUP_DRY_RUN", false)?,
            ip_endpoints: env::var("DYNUP_IP_ENDPOINTS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            max_retries: env_parsed("DYNUP_MAX_RETRIES", 3usize)?,
            retry_delay_secs: env_parsed("DYNUP_RETRY_DELAY_SECS", 5u64)?,
            timeout_secs: env_parsed("DYNUP_TIMEOUT_SECS", 10u64)?,
            log_level: env::var("DYNUP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    ///
    /// This performs comprehensive validation including:
    /// - Required field presence
    /// - Value format validation (API token, domain name)
    /// - Numeric range validation
    /// - Security checks (placeholder secrets, URL schemes)
    fn validate(&self) -> Result<()> {
        // Validate API token presence and format
        if self.api_token.is_empty() {
            anyhow::bail!(
                "DYNUP_API_TOKEN is required. \
                Set it via: export DYNUP_API_TOKEN=your_token"
            );
        }

        // Cloudflare API tokens are typically 40 characters alphanumeric
        if self.api_token.len() < 20 {
            anyhow::bail!(
                "DYNUP_API_TOKEN appears too short ({} chars). \
                Cloudflare tokens are typically 40 characters. \
                Verify your token is correct.",
                self.api_token.len()
            );
        }

        // Check for obvious placeholder tokens (common mistake)
        let token_lower = self.api_token.to_lowercase();
        if token_lower.contains("your_token")
            || token_lower.contains("replace_me")
            || token_lower.contains("example")
            || token_lower == "token"
        {
            anyhow::bail!(
                "DYNUP_API_TOKEN appears to be a placeholder. \
                Use an actual API token from your DNS provider."
            );
        }

        if self.zone_id.is_empty() {
            anyhow::bail!(
                "DYNUP_ZONE_ID is required. \
                Set it via: export DYNUP_ZONE_ID=your_zone_id"
            );
        }

        if self.record_name.is_empty() {
            anyhow::bail!(
                "DYNUP_RECORD_NAME is required. \
                Set it via: export DYNUP_RECORD_NAME=home.example.com"
            );
        }

        validate_domain_name(&self.record_name)?;

        // Validate discovery endpoint URLs
        for endpoint in &self.ip_endpoints {
            if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
                anyhow::bail!(
                    "DYNUP_IP_ENDPOINTS entries must use HTTP or HTTPS scheme. Got: {}",
                    endpoint
                );
            }

            // Warn if using HTTP (not HTTPS)
            if endpoint.starts_with("http://") {
                eprintln!(
                    "WARNING: discovery endpoint {} uses HTTP (not HTTPS). \
                    This is less secure. Consider using HTTPS.",
                    endpoint
                );
            }
        }

        // Validate numeric ranges
        if self.ttl != 1 && !(60..=86400).contains(&self.ttl) {
            anyhow::bail!(
                "DYNUP_TTL must be 1 (automatic) or between 60 and 86400 seconds. Got: {}",
                self.ttl
            );
        }

        if self.max_retries == 0 || self.max_retries > 10 {
            anyhow::bail!(
                "DYNUP_MAX_RETRIES must be between 1 and 10. Got: {}",
                self.max_retries
            );
        }

        if !(1..=300).contains(&self.retry_delay_secs) {
            anyhow::bail!(
                "DYNUP_RETRY_DELAY_SECS must be between 1 and 300 seconds. Got: {}",
                self.retry_delay_secs
            );
        }

        if !(1..=120).contains(&self.timeout_secs) {
            anyhow::bail!(
                "DYNUP_TIMEOUT_SECS must be between 1 and 120 seconds. Got: {}",
                self.timeout_secs
            );
        }

        // Validate log level
        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "DYNUP_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

/// Parse an environment variable, falling back to `default` when absent
fn env_parsed<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{} has an invalid value '{}': {}", name, raw.trim(), e)),
        Err(_) => Ok(default),
    }
}

/// Boolean spellings accepted in the environment
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Parse a boolean environment variable, falling back to `default` when absent
fn env_bool(name: &str, default: bool) -> Result<bool> {
    match env::var(name) {
        Ok(raw) => parse_bool(&raw).ok_or_else(|| {
            anyhow::anyhow!(
                "{} has an invalid boolean value '{}'. \
                Valid: 1, true, yes, on, 0, false, no, off",
                name,
                raw
            )
        }),
        Err(_) => Ok(default),
    }
}

fn main() -> ExitCode {
    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return exit_code_for(Outcome::ConfigInvalid);
        }
    };

    // Validate configuration
    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return exit_code_for(Outcome::ConfigInvalid);
    }

    // Initialize tracing
    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return exit_code_for(Outcome::ConfigInvalid);
    }

    // One run is strictly sequential; a single-threaded runtime is enough.
    // A runtime that cannot be built is a missing host capability.
    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return exit_code_for(Outcome::DependencyMissing);
        }
    };

    exit_code_for(rt.block_on(run(config)))
}

fn exit_code_for(outcome: Outcome) -> ExitCode {
    ExitCode::from(outcome.exit_code())
}

/// Run one update
///
/// Every failure is mapped to its outcome here; the exit code is the only
/// channel the caller observes.
async fn run(config: Config) -> Outcome {
    let retry = RetryPolicy::new(
        config.max_retries,
        Duration::from_secs(config.retry_delay_secs),
    );
    let timeout = Duration::from_secs(config.timeout_secs);

    let source = if config.ip_endpoints.is_empty() {
        HttpIpSource::new(retry.clone(), timeout)
    } else {
        HttpIpSource::with_endpoints(config.ip_endpoints, retry.clone(), timeout)
    };
    let source = match source {
        Ok(source) => source,
        Err(e) => {
            error!("Failed to construct the IP source: {}", e);
            return Outcome::from(&e);
        }
    };

    let provider = match CloudflareProvider::new(
        config.api_token.clone(),
        config.zone_id.clone(),
        timeout,
        config.dry_run,
    ) {
        Ok(provider) => provider,
        Err(e) => {
            error!("Failed to construct the DNS provider: {}", e);
            return Outcome::from(&e);
        }
    };

    let run_config = RunConfig::new(config.api_token, config.zone_id, config.record_name)
        .with_ttl(config.ttl)
        .with_proxied(config.proxied)
        .with_always_update(config.always_update)
        .with_dry_run(config.dry_run)
        .with_retry(retry)
        .with_request_timeout(timeout);

    let pipeline = match Pipeline::new(Box::new(source), Box::new(provider), run_config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            error!("Failed to assemble the pipeline: {}", e);
            return Outcome::from(&e);
        }
    };

    match pipeline.run().await {
        Ok(summary) => {
            match summary.action {
                UpdateAction::Updated => info!("Record now points at {}", summary.address),
                UpdateAction::Unchanged => {
                    info!("Record already pointed at {}, nothing to do", summary.address)
                }
            }
            Outcome::Success
        }
        Err(e) => {
            error!("Update run failed: {}", e);
            Outcome::from(&e)
        }
    }
}

/// Validate that a string is a valid domain name
///
/// This implements basic DNS domain name validation per RFC 1035.
/// It's not comprehensive but catches common errors.
fn validate_domain_name(domain: &str) -> Result<()> {
    if domain.is_empty() {
        anyhow::bail!("Domain name cannot be empty");
    }

    // Total length limit (RFC 1035: 253 chars max)
    if domain.len() > 253 {
        anyhow::bail!(
            "Domain name too long: {} chars (max 253). Got: {}",
            domain.len(),
            domain
        );
    }

    // Split into labels and validate each
    for label in domain.split('.') {
        if label.is_empty() {
            anyhow::bail!("Domain name has empty label: '{}'", domain);
        }

        if label.len() > 63 {
            anyhow::bail!(
                "Domain label too long: {} chars (max 63). Label: '{}'",
                label.len(),
                label
            );
        }

        // Check for valid characters (alphanumeric and hyphen)
        if !label.chars().all(|c| c.is_alphanumeric() || c == '-') {
            anyhow::bail!(
                "Domain label contains invalid characters. Label: '{}'. \
                Valid: alphanumeric and hyphen only.",
                label
            );
        }

        // Label cannot start or end with hyphen
        if label.starts_with('-') || label.ends_with('-') {
            anyhow::bail!(
                "Domain label cannot start or end with hyphen. Label: '{}'",
                label
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config {
            api_token: "cf-a1b2c3d4e5f6a7b8c9d0a1b2c3d4e5f6a7b8c9d0".to_string(),
            zone_id: "zone123".to_string(),
            record_name: "home.example.com".to_string(),
            ttl: 1,
            proxied: false,
            always_update: true,
            dry_run: false,
            ip_endpoints: vec![],
            max_retries: 3,
            retry_delay_secs: 5,
            timeout_secs: 10,
            log_level: "info".to_string(),
        }
    }

    #[test]
    fn a_complete_configuration_validates() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn missing_api_token_is_rejected() {
        let mut config = valid_config();
        config.api_token = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("DYNUP_API_TOKEN"));
    }

    #[test]
    fn short_api_token_is_rejected() {
        let mut config = valid_config();
        config.api_token = "short".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("too short"));
    }

    #[test]
    fn placeholder_api_token_is_rejected() {
        for placeholder in [
            "your_token_goes_here_please",
            "replace_me_with_a_real_token",
            "example-token-0123456789abcdef",
        ] {
            let mut config = valid_config();
            config.api_token = placeholder.to_string();
            let err = config.validate().unwrap_err();
            assert!(
                err.to_string().contains("placeholder"),
                "'{placeholder}' should be rejected as a placeholder"
            );
        }
    }

    #[test]
    fn missing_zone_id_is_rejected() {
        let mut config = valid_config();
        config.zone_id = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("DYNUP_ZONE_ID"));
    }

    #[test]
    fn missing_record_name_is_rejected() {
        let mut config = valid_config();
        config.record_name = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("DYNUP_RECORD_NAME"));
    }

    #[test]
    fn valid_domain_names_are_accepted() {
        for domain in [
            "example.com",
            "home.example.com",
            "my-host.example.com",
            "a.b.c.d.example.com",
        ] {
            assert!(validate_domain_name(domain).is_ok(), "{domain}");
        }
    }

    #[test]
    fn invalid_domain_names_are_rejected() {
        let too_long_label = format!("{}.example.com", "a".repeat(64));
        let too_long_domain = format!("{}.com", "a.".repeat(130));
        for domain in [
            "",
            ".example.com",
            "example..com",
            "example.com.",
            "-host.example.com",
            "host-.example.com",
            "my_host.example.com",
            too_long_label.as_str(),
            too_long_domain.as_str(),
        ] {
            assert!(validate_domain_name(domain).is_err(), "{domain}");
        }
    }

    #[test]
    fn discovery_endpoints_must_be_http_or_https() {
        let mut config = valid_config();
        config.ip_endpoints = vec!["ftp://ip.example.net".to_string()];
        assert!(config.validate().is_err());

        config.ip_endpoints = vec!["https://ip.example.net".to_string()];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn ttl_must_be_automatic_or_in_range() {
        for (ttl, ok) in [(1, true), (59, false), (60, true), (86400, true), (86401, false)] {
            let mut config = valid_config();
            config.ttl = ttl;
            assert_eq!(config.validate().is_ok(), ok, "ttl = {ttl}");
        }
    }

    #[test]
    fn retry_and_timeout_ranges_are_enforced() {
        let mut config = valid_config();
        config.max_retries = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.max_retries = 11;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.retry_delay_secs = 301;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = valid_config();
        config.timeout_secs = 121;
        assert!(config.validate().is_err());
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let mut config = valid_config();
        config.log_level = "loud".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("DYNUP_LOG_LEVEL"));
    }

    #[test]
    fn boolean_spellings_are_flexible() {
        for raw in ["1", "true", "TRUE", "yes", "on", " On "] {
            assert_eq!(parse_bool(raw), Some(true), "{raw}");
        }
        for raw in ["0", "false", "False", "no", "off"] {
            assert_eq!(parse_bool(raw), Some(false), "{raw}");
        }
        for raw in ["", "2", "maybe", "enabled"] {
            assert_eq!(parse_bool(raw), None, "{raw}");
        }
    }
}
