//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with the gate middleware and forwarding handler
//! - Wire up layers (tracing, timeout, concurrency limit, request ID)
//! - Forward allowed requests to the frontend
//! - Swap in reloaded configuration without dropping connections
//! - Serve the admin API when enabled

use axum::{
    body::Body,
    extract::State,
    http::{header::HeaderName, HeaderValue, Request, Uri},
    middleware,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use arc_swap::ArcSwap;
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client},
    rt::TokioExecutor,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::admin::setup_admin_router;
use crate::config::GateConfig;
use crate::error::GateError;
use crate::http::middleware::{gate_middleware, ResolvedLocale};
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::observability::metrics;
use crate::routing::{EdgeRouter, RoutingDecision};

/// Configuration and the router compiled from it, swapped as one unit.
#[derive(Debug)]
pub struct InnerState {
    pub config: GateConfig,
    pub router: EdgeRouter,
}

impl InnerState {
    pub fn new(config: GateConfig) -> Self {
        let router = EdgeRouter::from_config(&config);
        Self { config, router }
    }
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub inner: Arc<ArcSwap<InnerState>>,
    pub client: Client<HttpConnector, Body>,
    pub reloads: Arc<AtomicUsize>,
}

impl AppState {
    pub fn new(config: GateConfig) -> Self {
        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(Duration::from_secs(config.timeouts.connect_secs)));
        let client = Client::builder(TokioExecutor::new()).build(connector);

        Self {
            inner: Arc::new(ArcSwap::from_pointee(InnerState::new(config))),
            client,
            reloads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Replace configuration and router atomically.
    ///
    /// In-flight requests finish on the state they started with.
    pub fn reload(&self, config: GateConfig) {
        let current = self.inner.load();
        let pending = startup_only_changes(&current.config, &config);
        if !pending.is_empty() {
            tracing::warn!(
                settings = ?pending,
                "Changed settings take effect after a restart; keeping the running values"
            );
        }
        self.inner.store(Arc::new(InnerState::new(config)));
        self.reloads.fetch_add(1, Ordering::Relaxed);
        metrics::record_config_reload(true);
        tracing::info!("Configuration reloaded");
    }
}

/// Settings consumed once at startup (sockets, layers, exporters, logging).
/// Reloads swap routing and forwarding state only.
fn startup_only_changes(current: &GateConfig, next: &GateConfig) -> Vec<&'static str> {
    let checks = [
        ("listener.bind_address", current.listener.bind_address != next.listener.bind_address),
        ("listener.max_connections", current.listener.max_connections != next.listener.max_connections),
        ("timeouts.connect_secs", current.timeouts.connect_secs != next.timeouts.connect_secs),
        ("timeouts.request_secs", current.timeouts.request_secs != next.timeouts.request_secs),
        ("admin.enabled", current.admin.enabled != next.admin.enabled),
        ("admin.bind_address", current.admin.bind_address != next.admin.bind_address),
        (
            "observability.metrics_enabled",
            current.observability.metrics_enabled != next.observability.metrics_enabled,
        ),
        (
            "observability.metrics_address",
            current.observability.metrics_address != next.observability.metrics_address,
        ),
        ("observability.log_level", current.observability.log_level != next.observability.log_level),
        ("observability.log_format", current.observability.log_format != next.observability.log_format),
    ];
    checks
        .into_iter()
        .filter_map(|(name, changed)| changed.then_some(name))
        .collect()
}

/// HTTP server for the edge gate.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GateConfig) -> Self {
        let state = AppState::new(config);
        let router = Self::build_router(state.clone());
        Self { router, state }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn build_router(state: AppState) -> Router {
        let inner = state.inner.load();
        Router::new()
            .route("/{*path}", any(forward_handler))
            .route("/", any(forward_handler))
            .layer(middleware::from_fn_with_state(state.clone(), gate_middleware))
            .with_state(state.clone())
            .layer(TimeoutLayer::new(Duration::from_secs(inner.config.timeouts.request_secs)))
            .layer(GlobalConcurrencyLimitLayer::new(inner.config.listener.max_connections))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Shared state, for reloads and the admin API.
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Get a snapshot of the current config.
    pub fn config(&self) -> GateConfig {
        self.state.inner.load().config.clone()
    }

    /// Run the server until `shutdown` fires, applying config updates as they arrive.
    pub async fn run(
        self,
        listener: TcpListener,
        mut config_updates: mpsc::UnboundedReceiver<GateConfig>,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let reload_state = self.state.clone();
        tokio::spawn(async move {
            while let Some(config) = config_updates.recv().await {
                reload_state.reload(config);
            }
        });

        let admin_config = self.state.inner.load().config.admin.clone();
        if admin_config.enabled {
            let admin_listener = TcpListener::bind(&admin_config.bind_address).await?;
            let admin_app = setup_admin_router(self.state.clone());
            let mut admin_shutdown = shutdown.resubscribe();
            tracing::info!(address = %admin_config.bind_address, "Admin API listening");
            tokio::spawn(async move {
                let result = axum::serve(admin_listener, admin_app)
                    .with_graceful_shutdown(async move {
                        let _ = admin_shutdown.recv().await;
                    })
                    .await;
                if let Err(e) = result {
                    tracing::error!(error = %e, "Admin API stopped with error");
                }
            });
        }

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Forward an allowed request to the frontend.
///
/// Rewrite decisions change the forwarded path; the visible URL stays as is.
async fn forward_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let inner = state.inner.load_full();
    let request_id = request_id(&request).to_string();

    let (mut parts, body) = request.into_parts();

    let path_and_query = match parts.extensions.get::<RoutingDecision>() {
        Some(RoutingDecision::Rewrite { path, .. }) => match parts.uri.query() {
            Some(q) => format!("{}?{}", path, q),
            None => path.clone(),
        },
        _ => parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str().to_string())
            .unwrap_or_else(|| "/".to_string()),
    };

    let uri: Uri = match format!("http://{}{}", inner.config.upstream.address, path_and_query).parse() {
        Ok(u) => u,
        Err(e) => return GateError::Upstream(e.to_string()).into_response(),
    };

    if let Some(ResolvedLocale(locale)) = parts.extensions.get::<ResolvedLocale>() {
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(inner.config.upstream.locale_header.as_bytes()),
            HeaderValue::from_str(locale),
        ) {
            parts.headers.insert(name, value);
        }
    }

    tracing::debug!(request_id = %request_id, upstream = %uri, "Forwarding request");
    parts.uri = uri;
    let upstream_request = Request::from_parts(parts, body);

    match state.client.request(upstream_request).await {
        Ok(response) => {
            metrics::record_upstream(response.status().as_u16(), start_time);
            let (parts, body) = response.into_parts();
            Response::from_parts(parts, Body::new(body))
        }
        Err(e) => {
            tracing::error!(request_id = %request_id, error = %e, "Upstream error");
            metrics::record_upstream(502, start_time);
            GateError::Upstream(e.to_string()).into_response()
        }
    }
}
