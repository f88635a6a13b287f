//! Path matching logic.
//!
//! # Responsibilities
//! - Match exact paths (static allow-lists)
//! - Match path prefixes (asset namespaces, public detail pages)
//! - Combine conditions with OR semantics
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Prefix matching is a plain string prefix test: `/api` also covers `/apiary`
//! - No regex, so matching stays linear in the number of entries

use std::collections::HashSet;

/// Trait for matching a path against a condition.
pub trait PathMatcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// Matches any path from a fixed set.
#[derive(Debug, Clone, Default)]
pub struct ExactMatcher {
    paths: HashSet<String>,
}

impl ExactMatcher {
    pub fn new<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

impl PathMatcher for ExactMatcher {
    fn matches(&self, path: &str) -> bool {
        self.paths.contains(path)
    }
}

/// Matches paths starting with any of the given prefixes.
#[derive(Debug, Clone, Default)]
pub struct PrefixMatcher {
    prefixes: Vec<String>,
}

impl PrefixMatcher {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }
}

impl PathMatcher for PrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        self.prefixes.iter().any(|p| path.starts_with(p.as_str()))
    }
}

/// Combines multiple matchers with OR semantics.
#[derive(Debug)]
pub struct AnyMatcher {
    matchers: Vec<Box<dyn PathMatcher>>,
}

impl AnyMatcher {
    pub fn new(matchers: Vec<Box<dyn PathMatcher>>) -> Self {
        Self { matchers }
    }
}

impl PathMatcher for AnyMatcher {
    fn matches(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(path))
    }
}
