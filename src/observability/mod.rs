//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Edge router decision points
//!     → events.rs (injected DecisionObserver)
//!
//! HTTP layer and config reloads
//!     → metrics.rs (counters, histograms)
//!     → logging.rs (structured log events)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through every log line via the trace span
//! - Decision logging is injected so it can be disabled without changing behavior

pub mod events;
pub mod logging;
pub mod metrics;

pub use events::{DecisionEvent, DecisionObserver, NoopObserver, RecordingObserver, TracingObserver};
