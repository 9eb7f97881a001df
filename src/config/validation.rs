//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Reject base paths that cannot prefix a route
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("base_url `{0}` must not contain a query or fragment")]
    BaseUrlHasQuery(String),

    #[error("base_url `{0}` must not contain whitespace")]
    BaseUrlWhitespace(String),

    #[error("server.bind_address `{0}` is not a socket address")]
    BindAddress(String),

    #[error("server.request_timeout_secs must be greater than 0")]
    ZeroTimeout,

    #[error("observability.log_level `{0}` is not one of trace, debug, info, warn, error")]
    LogLevel(String),
}

/// Check every field and collect all problems.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let base = config.base_url.trim();
    if base.contains(['?', '#']) {
        errors.push(ValidationError::BaseUrlHasQuery(config.base_url.clone()));
    }
    if base.chars().any(char::is_whitespace) {
        errors.push(ValidationError::BaseUrlWhitespace(config.base_url.clone()));
    }

    if config.server.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.server.bind_address.clone()));
    }
    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let level = config.observability.log_level.to_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&AppConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = AppConfig::default();
        config.base_url = "/app?x=1".into();
        config.server.bind_address = "localhost".into();
        config.server.request_timeout_secs = 0;
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::BaseUrlHasQuery("/app?x=1".into()),
                ValidationError::BindAddress("localhost".into()),
                ValidationError::ZeroTimeout,
                ValidationError::LogLevel("loud".into()),
            ]
        );
    }

    #[test]
    fn test_inner_whitespace_rejected() {
        let mut config = AppConfig::default();
        config.base_url = "/my app/".into();
        assert_eq!(
            validate_config(&config),
            Err(vec![ValidationError::BaseUrlWhitespace("/my app/".into())])
        );
    }
}
