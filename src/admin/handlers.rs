use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::Ordering;
use crate::config::PrefixMode;
use crate::http::server::AppState;
use crate::routing::{RequestContext, RoutingDecision};
use crate::session::CookieJar;

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub status: &'static str,
    pub locales: Vec<String>,
    pub default_locale: String,
    pub prefix_mode: PrefixMode,
    pub upstream: String,
    pub config_reloads: usize,
}

/// A request to route without sending it.
#[derive(Debug, Deserialize)]
pub struct DecideRequest {
    pub path: String,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub cookies: HashMap<String, String>,
    #[serde(default)]
    pub accept_language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DecideResponse {
    pub locale: String,
    pub normalized_path: String,
    #[serde(flatten)]
    pub decision: RoutingDecision,
}

pub async fn get_status(State(state): State<AppState>) -> Json<SystemStatus> {
    let inner = state.inner.load();
    let locales = &inner.config.locales;
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
        locales: locales.locales.clone(),
        default_locale: locales.default_locale.clone(),
        prefix_mode: locales.prefix_mode,
        upstream: inner.config.upstream.address.clone(),
        config_reloads: state.reloads.load(Ordering::Relaxed),
    })
}

pub async fn post_decide(
    State(state): State<AppState>,
    Json(request): Json<DecideRequest>,
) -> Response {
    let inner = state.inner.load_full();

    let mut ctx = RequestContext::new(request.path)
        .with_cookies(request.cookies.into_iter().collect::<CookieJar>());
    ctx.query = request.query;
    ctx.accept_language = request.accept_language;

    match inner.router.decide(&ctx) {
        Ok(decision) => {
            let (locale, normalized_path) = inner.router.resolve_locale(&ctx.path);
            Json(DecideResponse {
                locale,
                normalized_path,
                decision,
            })
            .into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
