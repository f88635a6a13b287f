//! Edge gate middleware.
//! Runs the edge router on every request before it reaches the frontend.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::request::request_id;
use crate::http::response;
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::routing::{RequestContext, RoutingDecision};

/// Locale the request is served in, attached for downstream handlers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedLocale(pub String);

pub async fn gate_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let inner = state.inner.load_full();
    let ctx = RequestContext::from_parts(req.uri(), req.headers());

    let decision = match inner.router.decide(&ctx) {
        Ok(d) => d,
        Err(e) => {
            tracing::error!(request_id = %request_id(&req), path = %ctx.path, error = %e, "Routing failed");
            return e.into_response();
        }
    };
    metrics::record_decision(decision.kind());

    let locale = match &decision {
        RoutingDecision::Redirect { location, reason } => {
            tracing::info!(
                request_id = %request_id(&req),
                path = %ctx.path,
                location = %location,
                reason = reason.as_str(),
                "Redirecting request"
            );
            metrics::record_redirect(reason.as_str());
            return match response::redirect(location) {
                Ok(r) => r,
                Err(e) => e.into_response(),
            };
        }
        RoutingDecision::Rewrite { locale, .. } => locale.clone(),
        RoutingDecision::Continue => inner.router.resolve_locale(&ctx.path).0,
    };

    req.extensions_mut().insert(ResolvedLocale(locale));
    req.extensions_mut().insert(decision);
    next.run(req).await
}
