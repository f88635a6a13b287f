//! Locale resolution and normalization.
//!
//! The router hands every non-static request to a [`LocaleNormalizer`] before
//! any access check. A normalizer redirect ends routing for that request.
//!
//! [`PrefixNormalizer`] is the default. Paths that carry a supported locale
//! segment pass untouched. Bare paths get a locale detected from the locale
//! cookie, then `Accept-Language`, then the configured default, and are
//! redirected to the prefixed URL (or, in as-needed mode for the default
//! locale, rewritten to it).

use crate::config::{LocaleConfig, PrefixMode};
use crate::error::GateError;
use crate::routing::context::RequestContext;

/// What the locale normalizer wants done with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocaleOutcome {
    /// The path already carries an acceptable locale.
    Pass,
    /// Serve `path` internally without changing the visible URL.
    Rewrite { locale: String, path: String },
    /// Send the client to `location`.
    Redirect { location: String },
}

/// Maps bare paths to locale-prefixed paths and back.
pub trait LocaleNormalizer: Send + Sync {
    fn normalize(&self, ctx: &RequestContext, locales: &LocaleConfig) -> Result<LocaleOutcome, GateError>;
}

/// Split a leading supported locale segment off `path`.
///
/// Returns the configured locale code and the remaining path, which is empty
/// for a bare `/{locale}`.
pub fn split_locale<'a, 'c>(path: &'a str, locales: &'c LocaleConfig) -> Option<(&'c str, &'a str)> {
    let trimmed = path.strip_prefix('/')?;
    let (candidate, rest) = match trimmed.find('/') {
        Some(pos) => (&trimmed[..pos], &trimmed[pos..]),
        None => (trimmed, ""),
    };
    let locale = locales.supported(candidate)?;
    Some((locale, rest))
}

/// Resolve the active locale and the normalized path used for policy checks.
pub fn resolve<'c>(path: &str, locales: &'c LocaleConfig) -> (&'c str, String) {
    match split_locale(path, locales) {
        Some((locale, "")) => (locale, "/".to_string()),
        Some((locale, rest)) => (locale, rest.to_string()),
        None if path.is_empty() => (locales.default_locale.as_str(), "/".to_string()),
        None => (locales.default_locale.as_str(), path.to_string()),
    }
}

/// Parse an `Accept-Language` value into language tags ordered by quality.
///
/// Tags with `q=0` are dropped. Equal qualities keep header order.
pub fn parse_accept_language(header: &str) -> Vec<String> {
    let mut langs: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|part| {
            let part = part.trim();
            if part.is_empty() {
                return None;
            }

            let mut segments = part.split(';');
            let lang = segments.next()?.trim().to_lowercase();

            let quality = segments
                .find_map(|s| s.trim().strip_prefix("q=").and_then(|q| q.trim().parse::<f32>().ok()))
                .unwrap_or(1.0)
                .clamp(0.0, 1.0);

            (quality > 0.0).then_some((lang, quality))
        })
        .collect();

    langs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    langs.into_iter().map(|(lang, _)| lang).collect()
}

/// Best supported locale for an `Accept-Language` value.
///
/// Exact tags win over primary subtags (`th-TH` → `th`). `*` is ignored.
pub fn negotiate<'c>(header: &str, locales: &'c LocaleConfig) -> Option<&'c str> {
    parse_accept_language(header).iter().find_map(|lang| {
        locales
            .locales
            .iter()
            .find(|l| l.eq_ignore_ascii_case(lang))
            .or_else(|| {
                let primary = lang.split('-').next()?;
                locales.locales.iter().find(|l| l.eq_ignore_ascii_case(primary))
            })
            .map(String::as_str)
    })
}

fn with_query(location: String, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{}?{}", location, q),
        _ => location,
    }
}

/// Default normalizer keeping the locale segment in the URL.
#[derive(Debug, Clone, Default)]
pub struct PrefixNormalizer;

impl PrefixNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Locale for a request whose path carries none.
    pub fn detect<'c>(&self, ctx: &RequestContext, locales: &'c LocaleConfig) -> &'c str {
        ctx.cookies
            .non_empty(&locales.locale_cookie)
            .and_then(|c| locales.supported(c))
            .or_else(|| ctx.accept_language.as_deref().and_then(|h| negotiate(h, locales)))
            .unwrap_or(locales.default_locale.as_str())
    }
}

impl LocaleNormalizer for PrefixNormalizer {
    fn normalize(&self, ctx: &RequestContext, locales: &LocaleConfig) -> Result<LocaleOutcome, GateError> {
        let query = ctx.query.as_deref();

        // An explicit segment is honored in both modes, the default locale included.
        if split_locale(&ctx.path, locales).is_some() {
            return Ok(LocaleOutcome::Pass);
        }

        let detected = self.detect(ctx, locales);
        match locales.prefix_mode {
            PrefixMode::AsNeeded if detected == locales.default_locale => Ok(LocaleOutcome::Rewrite {
                locale: detected.to_string(),
                path: LocaleConfig::prefixed(detected, &ctx.path),
            }),
            _ => Ok(LocaleOutcome::Redirect {
                location: with_query(LocaleConfig::prefixed(detected, &ctx.path), query),
            }),
        }
    }
}
