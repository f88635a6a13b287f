//! Cookie header parsing.

use std::collections::HashMap;

use axum::http::{header, HeaderMap};

/// Read-only view of the cookies sent with a request.
///
/// When a name repeats, the first occurrence wins, matching how browsers
/// order the more specific cookie first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    values: HashMap<String, String>,
}

impl CookieJar {
    /// Parse a single `Cookie` header value. Malformed pairs are skipped.
    pub fn parse(header: &str) -> Self {
        let mut jar = Self::default();
        jar.extend_from(header);
        jar
    }

    /// Collect every `Cookie` header of a request. Non-UTF-8 headers are ignored.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let mut jar = Self::default();
        for value in headers.get_all(header::COOKIE) {
            if let Ok(s) = value.to_str() {
                jar.extend_from(s);
            }
        }
        jar
    }

    fn extend_from(&mut self, header: &str) {
        for pair in header.split(';') {
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            let value = value.trim();
            let value = value
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(value);
            self.values
                .entry(name.to_string())
                .or_insert_with(|| value.to_string());
        }
    }

    /// Insert or replace a cookie.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Like [`get`](Self::get) but treats an empty value as absent.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for CookieJar {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut jar = Self::default();
        for (k, v) in iter {
            jar.insert(k, v);
        }
        jar
    }
}
