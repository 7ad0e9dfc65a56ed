use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::classifier::Zone;

/// NavigationEvent
///
/// One structured record per navigation attempt, emitted on every guard
/// exit path. The `id` correlates all log lines produced while the attempt
/// was in flight.
#[derive(Debug, Clone)]
pub struct NavigationEvent {
    /// Correlation id, unique per navigation attempt.
    pub id: Uuid,
    pub at: DateTime<Utc>,
    pub from: String,
    pub to: String,
    pub zone: Zone,
    pub had_token: bool,
    /// Whether this attempt performed a principal-info fetch.
    pub fetched: bool,
    /// Terse outcome label: "proceed", "proceed-override", or
    /// "redirect:<location>".
    pub outcome: String,
}

/// NavObserver
///
/// Pluggable observability hook. The guard calls `on_decision` exactly once
/// per navigation, on every exit path, so downstream consumers (progress
/// indicators included) always see a terminal event.
pub trait NavObserver: Send + Sync {
    fn on_decision(&self, event: &NavigationEvent);
}

/// The concrete type used to share the observer across the guard.
pub type ObserverState = Arc<dyn NavObserver>;

/// TracingObserver
///
/// Default implementation: one structured info line per decision.
#[derive(Default)]
pub struct TracingObserver;

impl NavObserver for TracingObserver {
    fn on_decision(&self, event: &NavigationEvent) {
        tracing::info!(
            nav_id = %event.id,
            from = %event.from,
            to = %event.to,
            zone = event.zone.label(),
            had_token = event.had_token,
            fetched = event.fetched,
            outcome = %event.outcome,
            "navigation decided"
        );
    }
}

/// RecordingObserver
///
/// Test implementation that keeps every emitted event.
#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<NavigationEvent>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<NavigationEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl NavObserver for RecordingObserver {
    fn on_decision(&self, event: &NavigationEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}
