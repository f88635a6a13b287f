//! Routing decisions.

use serde::Serialize;

/// Why a redirect was issued. Used for logs and metrics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectReason {
    /// The locale normalizer moved the request to a locale-qualified path.
    Locale,
    /// No session cookie on a protected path.
    Unauthenticated,
    /// A signed-in user opened a sign-in page.
    SignedIn,
    /// The page belongs to a different account type.
    RoleMismatch,
}

impl RedirectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RedirectReason::Locale => "locale",
            RedirectReason::Unauthenticated => "unauthenticated",
            RedirectReason::SignedIn => "signed_in",
            RedirectReason::RoleMismatch => "role_mismatch",
        }
    }
}

/// The single outcome of routing one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RoutingDecision {
    /// Forward the request unchanged.
    Continue,
    /// Forward the request to `path`, served in `locale`.
    Rewrite { locale: String, path: String },
    /// Answer with a redirect to `location`.
    Redirect { location: String, reason: RedirectReason },
}

impl RoutingDecision {
    pub fn kind(&self) -> &'static str {
        match self {
            RoutingDecision::Continue => "continue",
            RoutingDecision::Rewrite { .. } => "rewrite",
            RoutingDecision::Redirect { .. } => "redirect",
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            RoutingDecision::Redirect { location, .. } => Some(location),
            _ => None,
        }
    }
}
