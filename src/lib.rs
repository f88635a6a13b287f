//! Locale-aware edge gate.
//!
//! Sits in front of the web frontend and decides, per request, whether to
//! forward it, rewrite it to a locale-qualified path, or redirect it for
//! locale normalization or access control.

pub mod admin;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod session;

pub use config::GateConfig;
pub use error::GateError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{EdgeRouter, RequestContext, RoutingDecision};
