//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gate.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the edge gate.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GateConfig {
    /// Listener configuration (bind address, connection limit).
    pub listener: ListenerConfig,

    /// Frontend the gate forwards allowed requests to.
    pub upstream: UpstreamConfig,

    /// Supported locales and prefix policy.
    pub locales: LocaleConfig,

    /// Names of the session cookies set by the backend.
    pub cookies: CookieConfig,

    /// Static, public and role landing paths.
    pub paths: PathConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub admin: AdminConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Maximum concurrent in-flight requests (backpressure).
    pub max_connections: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            max_connections: 10_000,
        }
    }
}

/// Upstream frontend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Frontend address (e.g., "127.0.0.1:3000").
    pub address: String,

    /// Header carrying the resolved locale to the frontend.
    pub locale_header: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1:3000".to_string(),
            locale_header: "x-gate-locale".to_string(),
        }
    }
}

/// Whether every URL carries its locale segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum PrefixMode {
    /// `/profile` is redirected to `/{locale}/profile`.
    #[default]
    Always,
    /// The default locale is served without a prefix.
    AsNeeded,
}

/// Locale configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Supported locale codes, in preference order.
    pub locales: Vec<String>,

    /// Locale used when none can be resolved from the request.
    pub default_locale: String,

    pub prefix_mode: PrefixMode,

    /// Cookie remembering the visitor's last chosen locale.
    pub locale_cookie: String,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            locales: vec!["en".to_string(), "th".to_string()],
            default_locale: "en".to_string(),
            prefix_mode: PrefixMode::Always,
            locale_cookie: "NEXT_LOCALE".to_string(),
        }
    }
}

impl LocaleConfig {
    /// Returns the configured code equal to `candidate`, if supported.
    pub fn supported(&self, candidate: &str) -> Option<&str> {
        self.locales
            .iter()
            .find(|l| l.as_str() == candidate)
            .map(String::as_str)
    }

    /// Prefix `path` with the locale segment as the prefix mode requires.
    pub fn localize(&self, locale: &str, path: &str) -> String {
        if self.prefix_mode == PrefixMode::AsNeeded && locale == self.default_locale {
            path.to_string()
        } else {
            Self::prefixed(locale, path)
        }
    }

    /// `path` under the `/{locale}` segment, regardless of prefix mode.
    pub fn prefixed(locale: &str, path: &str) -> String {
        match path {
            "" | "/" => format!("/{}", locale),
            _ => format!("/{}{}", locale, path),
        }
    }
}

/// Cookie names written by the backend on login.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CookieConfig {
    pub access_token: String,
    pub refresh_token: String,
    pub role: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            access_token: "act".to_string(),
            refresh_token: "rft".to_string(),
            role: "user_role".to_string(),
        }
    }
}

/// Path policy, all values compared against the normalized path.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathConfig {
    /// Raw-path prefixes that skip every check (assets, API).
    pub static_prefixes: Vec<String>,

    /// Paths reachable without a session.
    pub public_paths: Vec<String>,

    /// Prefixes reachable without a session.
    pub public_prefixes: Vec<String>,

    /// Generic sign-in page.
    pub auth: String,

    /// Company sign-in page.
    pub company_login: String,

    /// Landing page for persona users and admins.
    pub profile: String,

    /// Landing page for company users.
    pub company_landing: String,

    /// Company-only dashboard pages.
    pub company_pages: Vec<String>,
}

impl Default for PathConfig {
    fn default() -> Self {
        let strings = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            static_prefixes: strings(&[
                "/_next",
                "/favicon.ico",
                "/images",
                "/videos",
                "/fonts",
                "/api",
                "/static",
                "/.well-known",
            ]),
            public_paths: strings(&[
                "/",
                "/auth",
                "/jobs",
                "/companies",
                "/company-login",
                "/company-register",
                "/company-pending-approval",
                "/about",
                "/contact",
            ]),
            public_prefixes: strings(&["/companies/"]),
            auth: "/auth".to_string(),
            company_login: "/company-login".to_string(),
            profile: "/profile".to_string(),
            company_landing: "/company-public-profile".to_string(),
            company_pages: strings(&["/company-public-profile", "/company-profile"]),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout to the upstream in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    pub log_format: LogFormat,

    /// Log every routing decision step at debug level.
    pub trace_decisions: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            trace_decisions: true,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// Admin API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AdminConfig {
    /// Enable admin API.
    pub enabled: bool,

    /// API key for authentication (Bearer token).
    pub api_key: String,

    /// Admin API bind address.
    pub bind_address: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            // WARNING: This is a placeholder! Change this in production.
            api_key: "CHANGE_ME_IN_PRODUCTION".to_string(),
            bind_address: "127.0.0.1:8081".to_string(),
        }
    }
}
