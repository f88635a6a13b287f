//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the default locale is one of the supported locales
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Check every policy path is absolute
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GateConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use crate::config::schema::GateConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("at least one locale must be configured")]
    NoLocales,
    #[error("default locale '{0}' is not in the supported locale list")]
    UnknownDefaultLocale(String),
    #[error("locale '{0}' is listed more than once")]
    DuplicateLocale(String),
    #[error("locale code '{0}' must be a non-empty single path segment")]
    InvalidLocale(String),
    #[error("{field}: path '{value}' must start with '/'")]
    RelativePath { field: &'static str, value: String },
    #[error("cookie name for {0} must not be empty")]
    EmptyCookieName(&'static str),
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },
    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,
    #[error("listener.max_connections must be greater than zero")]
    ZeroMaxConnections,
}

/// Validate a parsed configuration, collecting every error.
pub fn validate_config(config: &GateConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let locales = &config.locales;
    if locales.locales.is_empty() {
        errors.push(ValidationError::NoLocales);
    } else if locales.supported(&locales.default_locale).is_none() {
        errors.push(ValidationError::UnknownDefaultLocale(locales.default_locale.clone()));
    }

    let mut seen = HashSet::new();
    for code in &locales.locales {
        if code.is_empty() || code.contains('/') {
            errors.push(ValidationError::InvalidLocale(code.clone()));
        }
        if !seen.insert(code.as_str()) {
            errors.push(ValidationError::DuplicateLocale(code.clone()));
        }
    }

    let paths = &config.paths;
    let mut check_path = |field: &'static str, value: &str| {
        if !value.starts_with('/') {
            errors.push(ValidationError::RelativePath {
                field,
                value: value.to_string(),
            });
        }
    };
    for p in &paths.static_prefixes {
        check_path("paths.static_prefixes", p);
    }
    for p in &paths.public_paths {
        check_path("paths.public_paths", p);
    }
    for p in &paths.public_prefixes {
        check_path("paths.public_prefixes", p);
    }
    for p in &paths.company_pages {
        check_path("paths.company_pages", p);
    }
    check_path("paths.auth", &paths.auth);
    check_path("paths.company_login", &paths.company_login);
    check_path("paths.profile", &paths.profile);
    check_path("paths.company_landing", &paths.company_landing);

    let cookies = &config.cookies;
    for (name, value) in [
        ("cookies.access_token", &cookies.access_token),
        ("cookies.refresh_token", &cookies.refresh_token),
        ("cookies.role", &cookies.role),
        ("locales.locale_cookie", &locales.locale_cookie),
    ] {
        if value.trim().is_empty() {
            errors.push(ValidationError::EmptyCookieName(name));
        }
    }

    let mut check_addr = |field: &'static str, value: &str| {
        if value.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidAddress {
                field,
                value: value.to_string(),
            });
        }
    };
    check_addr("listener.bind_address", &config.listener.bind_address);
    check_addr("upstream.address", &config.upstream.address);
    if config.observability.metrics_enabled {
        check_addr("observability.metrics_address", &config.observability.metrics_address);
    }
    if config.admin.enabled {
        check_addr("admin.bind_address", &config.admin.bind_address);
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }
    if config.listener.max_connections == 0 {
        errors.push(ValidationError::ZeroMaxConnections);
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
        assert!(validate_config(&GateConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = GateConfig::default();
        config.locales.default_locale = "de".into();
        config.paths.auth = "auth".into();
        config.cookies.role = "".into();
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::UnknownDefaultLocale("de".into())));
        assert!(errors.contains(&ValidationError::EmptyCookieName("cookies.role")));
        assert!(errors.contains(&ValidationError::ZeroRequestTimeout));
    }

    #[test]
    fn test_locale_codes() {
        let mut config = GateConfig::default();
        config.locales.locales = vec!["en".into(), "en".into(), "en/us".into()];

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::DuplicateLocale("en".into())));
        assert!(errors.contains(&ValidationError::InvalidLocale("en/us".into())));
    }

    #[test]
    fn test_empty_locales() {
        let mut config = GateConfig::default();
        config.locales.locales.clear();
        assert_eq!(validate_config(&config).unwrap_err(), vec![ValidationError::NoLocales]);
    }

    #[test]
    fn test_bad_upstream_address() {
        let mut config = GateConfig::default();
        config.upstream.address = "frontend".into();
        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(
            errors.as_slice(),
            [ValidationError::InvalidAddress { field: "upstream.address", .. }]
        ));
    }
}
