//! Named target-date events.
//!
//! Events have no lifecycle state and nothing to reconcile on load --
//! remaining time is always computed live from `target_date` by the
//! formatting module. The store mirrors the timer store's persistence and
//! notification behavior.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::Clock;
use crate::id::new_id;
use crate::observers::{Observers, SubscriberId};
use crate::storage::{self, StorageBackend, EVENTS_KEY};

/// One target-date marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownEvent {
    pub id: String,
    pub name: String,
    pub target_date: DateTime<Utc>,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
}

/// A target date supplied either as an absolute timestamp or as RFC3339
/// text. Text is normalized on application; unparseable text leaves the
/// field unchanged.
#[derive(Debug, Clone)]
pub enum DateInput {
    At(DateTime<Utc>),
    Text(String),
}

impl DateInput {
    fn resolve(&self) -> Option<DateTime<Utc>> {
        match self {
            DateInput::At(at) => Some(*at),
            DateInput::Text(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|parsed| parsed.with_timezone(&Utc)),
        }
    }
}

impl From<DateTime<Utc>> for DateInput {
    fn from(at: DateTime<Utc>) -> Self {
        DateInput::At(at)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

/// Field patch for [`EventStore::update`].
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub name: Option<String>,
    pub target_date: Option<DateInput>,
}

pub struct EventStore {
    events: Vec<CountdownEvent>,
    storage: Box<dyn StorageBackend>,
    clock: Box<dyn Clock>,
    observers: Observers<[CountdownEvent]>,
}

impl EventStore {
    /// Restore the persisted collection; an unreadable blob falls back to
    /// an empty one.
    pub fn new(storage: Box<dyn StorageBackend>, clock: Box<dyn Clock>) -> Self {
        let events = storage::load_collection(storage.as_ref(), EVENTS_KEY);
        Self {
            events,
            storage,
            clock,
            observers: Observers::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Ordered view of the collection.
    pub fn events(&self) -> &[CountdownEvent] {
        &self.events
    }

    /// Point lookup by id.
    pub fn get_event(&self, id: &str) -> Option<CountdownEvent> {
        self.events.iter().find(|e| e.id == id).cloned()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Create an event, returning its id. `created_at` comes from the
    /// injected clock.
    pub fn add(&mut self, name: impl Into<String>, target_date: DateTime<Utc>) -> String {
        let event = CountdownEvent {
            id: new_id(),
            name: name.into(),
            target_date,
            created_at: self.clock.now(),
        };
        let id = event.id.clone();
        self.events.push(event);
        self.commit();
        id
    }

    /// Patch name and/or target date, no-op if absent or unchanged.
    pub fn update(&mut self, id: &str, patch: EventPatch) {
        let Some(event) = self.events.iter_mut().find(|e| e.id == id) else {
            return;
        };

        let mut changed = false;
        if let Some(name) = patch.name {
            if event.name != name {
                event.name = name;
                changed = true;
            }
        }
        if let Some(input) = patch.target_date {
            match input.resolve() {
                Some(at) => {
                    if event.target_date != at {
                        event.target_date = at;
                        changed = true;
                    }
                }
                None => tracing::warn!(id, "ignoring unparseable target date"),
            }
        }

        if changed {
            self.commit();
        }
    }

    /// Delete by id, no-op if absent.
    pub fn remove(&mut self, id: &str) {
        let before = self.events.len();
        self.events.retain(|e| e.id != id);
        if self.events.len() != before {
            self.commit();
        }
    }

    /// Drop every event.
    pub fn clear_all(&mut self) {
        if self.events.is_empty() {
            return;
        }
        self.events.clear();
        self.commit();
    }

    // ── Subscriptions ────────────────────────────────────────────────

    pub fn subscribe(&mut self, callback: impl FnMut(&[CountdownEvent]) + 'static) -> SubscriberId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.observers.unsubscribe(id)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn commit(&mut self) {
        storage::save_collection(self.storage.as_ref(), EVENTS_KEY, &self.events);
        self.observers.notify(&self.events);
    }
}
