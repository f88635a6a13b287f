//! Per-request routing input.

use axum::http::{header, HeaderMap, Uri};

use crate::session::CookieJar;

/// Everything the router reads about one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    /// Request path as received, possibly carrying a locale segment.
    pub path: String,
    /// Raw query string, preserved across locale redirects.
    pub query: Option<String>,
    pub cookies: CookieJar,
    /// `Accept-Language` header, used only for locale detection.
    pub accept_language: Option<String>,
}

impl RequestContext {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Build from the parts of an incoming HTTP request.
    pub fn from_parts(uri: &Uri, headers: &HeaderMap) -> Self {
        Self {
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            cookies: CookieJar::from_headers(headers),
            accept_language: headers
                .get(header::ACCEPT_LANGUAGE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        }
    }

    pub fn with_cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name, value);
        self
    }

    pub fn with_cookies(mut self, cookies: CookieJar) -> Self {
        self.cookies = cookies;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_accept_language(mut self, value: impl Into<String>) -> Self {
        self.accept_language = Some(value.into());
        self
    }
}
