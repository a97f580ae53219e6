//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate URLs, addresses and value ranges
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ThorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use alloy::primitives::Address;

use crate::config::schema::ThorConfig;

/// One semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check a parsed configuration.
pub fn validate_config(config: &ThorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "node.url", &config.node.url);
    for (i, url) in config.node.failover_urls.iter().enumerate() {
        check_url(&mut errors, &format!("node.failover_urls[{}]", i), url);
    }
    if config.node.timeout_secs == 0 {
        errors.push(ValidationError::new("node.timeout_secs", "must be greater than 0"));
    }

    if config.transactions.expiration == 0 {
        errors.push(ValidationError::new(
            "transactions.expiration",
            "must be greater than 0",
        ));
    }

    if config.confirmation.wait_blocks == 0 {
        errors.push(ValidationError::new(
            "confirmation.wait_blocks",
            "must be greater than 0",
        ));
    }
    if config.confirmation.wait_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "confirmation.wait_timeout_secs",
            "must be greater than 0",
        ));
    }
    if config.confirmation.poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "confirmation.poll_interval_ms",
            "must be greater than 0",
        ));
    }

    let delegation = &config.delegation;
    match (&delegation.url, &delegation.gas_payer) {
        (Some(url), Some(payer)) => {
            check_url(&mut errors, "delegation.url", url);
            if payer.parse::<Address>().is_err() {
                errors.push(ValidationError::new(
                    "delegation.gas_payer",
                    format!("'{}' is not an address", payer),
                ));
            }
        }
        (Some(_), None) => errors.push(ValidationError::new(
            "delegation.gas_payer",
            "required when delegation.url is set",
        )),
        (None, Some(_)) => errors.push(ValidationError::new(
            "delegation.url",
            "required when delegation.gas_payer is set",
        )),
        (None, None) => {}
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<std::net::SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &str, value: &str) {
    match value.parse::<url::Url>() {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}'", url.scheme()),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("invalid URL: {}", e))),
    }
}
