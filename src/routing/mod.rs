//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, cookies, Accept-Language)
//!     → context.rs (RequestContext)
//!     → router.rs
//!         → matcher.rs (static bypass)
//!         → locale.rs (normalizer: pass / rewrite / redirect)
//!         → matcher.rs (public allow-list)
//!         → session (token presence, role)
//!     → decision.rs: Continue | Rewrite | Redirect
//!
//! Router Compilation (at startup and on reload):
//!     GateConfig
//!     → Compile path matchers
//!     → Freeze as immutable EdgeRouter
//! ```
//!
//! # Design Decisions
//! - Router compiled from config, immutable at runtime
//! - No regex in hot path (exact and prefix matching only)
//! - Deterministic: same path and cookies always give the same decision
//! - Locale redirects take priority over access redirects

pub mod context;
pub mod decision;
pub mod locale;
pub mod matcher;
pub mod router;

pub use context::RequestContext;
pub use decision::{RedirectReason, RoutingDecision};
pub use locale::{LocaleNormalizer, LocaleOutcome, PrefixNormalizer};
pub use router::EdgeRouter;
