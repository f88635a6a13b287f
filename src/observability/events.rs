//! Decision observers.
//!
//! The router reports each decision point to an injected observer. Observers
//! only watch; nothing they do feeds back into the decision.

use std::sync::Mutex;

use crate::routing::decision::RedirectReason;
use crate::session::Role;

/// A decision point reached while routing one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionEvent {
    StaticBypass { path: String },
    LocaleRedirect { location: String },
    Classified { locale: String, normalized_path: String, public: bool },
    Token { present: bool },
    RoleResolved { role: Option<Role> },
    Redirect { location: String, reason: RedirectReason },
    Allowed { normalized_path: String },
}

/// Sink for decision events.
pub trait DecisionObserver: Send + Sync {
    fn observe(&self, event: &DecisionEvent);
}

/// Drops every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl DecisionObserver for NoopObserver {
    fn observe(&self, _event: &DecisionEvent) {}
}

/// Emits each event as a structured `debug!` record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl DecisionObserver for TracingObserver {
    fn observe(&self, event: &DecisionEvent) {
        match event {
            DecisionEvent::StaticBypass { path } => {
                tracing::debug!(path = %path, "Static/API path - allowed");
            }
            DecisionEvent::LocaleRedirect { location } => {
                tracing::debug!(location = %location, "Locale redirect");
            }
            DecisionEvent::Classified { locale, normalized_path, public } => {
                tracing::debug!(locale = %locale, normalized_path = %normalized_path, public, "Path classified");
            }
            DecisionEvent::Token { present } => {
                tracing::debug!(present, "Session token checked");
            }
            DecisionEvent::RoleResolved { role } => {
                tracing::debug!(role = ?role, "Role cookie read");
            }
            DecisionEvent::Redirect { location, reason } => {
                tracing::debug!(location = %location, reason = reason.as_str(), "Redirecting");
            }
            DecisionEvent::Allowed { normalized_path } => {
                tracing::debug!(normalized_path = %normalized_path, "Access allowed");
            }
        }
    }
}

/// Keeps events in memory, for inspecting decision traces.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<DecisionEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the recorded events, leaving the buffer empty.
    pub fn drain(&self) -> Vec<DecisionEvent> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl DecisionObserver for RecordingObserver {
    fn observe(&self, event: &DecisionEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
