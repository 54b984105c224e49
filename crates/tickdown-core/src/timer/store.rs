//! Timer collection with persistence and change notification.
//!
//! The store owns the ordered timer list (insertion order = display order).
//! Every mutation persists the whole collection synchronously, then
//! notifies subscribers; persistence failures are logged and swallowed so
//! the in-memory state stays authoritative for the session.
//!
//! Construction restores the persisted collection and reconciles each
//! record against the injected clock exactly once, before any subscriber
//! can observe it. The store never schedules its own ticks -- an external
//! driver calls `tick` per running timer at whatever cadence it manages.

use crate::clock::Clock;
use crate::observers::{Observers, SubscriberId};
use crate::storage::{self, StorageBackend, TIMERS_KEY};

use super::model::Timer;

/// Optional overrides for [`TimerStore::add`]. Unset fields fall back to
/// the defaults: 0h 5m 0s, empty label.
#[derive(Debug, Clone, Default)]
pub struct TimerOptions {
    pub hours: Option<u64>,
    pub minutes: Option<u64>,
    pub seconds: Option<u64>,
    pub label: Option<String>,
}

/// Display-field patch for [`TimerStore::update_timer`]. Lifecycle fields
/// (`status`, `end_epoch_ms`) are deliberately absent; they move only
/// through the transition commands.
#[derive(Debug, Clone, Default)]
pub struct TimerPatch {
    pub label: Option<String>,
}

pub struct TimerStore {
    timers: Vec<Timer>,
    storage: Box<dyn StorageBackend>,
    clock: Box<dyn Clock>,
    observers: Observers<[Timer]>,
}

impl TimerStore {
    /// Restore the persisted collection and reconcile it against the clock.
    ///
    /// Reconciliation adjustments are not written back here; they persist
    /// with the next real mutation.
    pub fn new(storage: Box<dyn StorageBackend>, clock: Box<dyn Clock>) -> Self {
        let mut timers: Vec<Timer> = storage::load_collection(storage.as_ref(), TIMERS_KEY);
        let now_ms = clock.now_ms();
        for timer in &mut timers {
            if timer.reconcile_loaded(now_ms) {
                tracing::debug!(id = %timer.id, status = ?timer.status, "reconciled timer on load");
            }
        }
        Self {
            timers,
            storage,
            clock,
            observers: Observers::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Ordered view of the collection.
    pub fn timers(&self) -> &[Timer] {
        &self.timers
    }

    /// Point lookup by id.
    pub fn get_timer(&self, id: &str) -> Option<Timer> {
        self.timers.iter().find(|t| t.id == id).cloned()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Create a new idle timer, returning its id.
    pub fn add(&mut self, options: TimerOptions) -> String {
        let timer = Timer::new(
            options.hours.unwrap_or(0),
            options.minutes.unwrap_or(5),
            options.seconds.unwrap_or(0),
            options.label.unwrap_or_default(),
        );
        let id = timer.id.clone();
        self.timers.push(timer);
        self.commit();
        id
    }

    /// Delete by id, no-op if absent.
    pub fn remove(&mut self, id: &str) {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        if self.timers.len() != before {
            self.commit();
        }
    }

    /// Patch display fields, no-op if absent or unchanged.
    pub fn update_timer(&mut self, id: &str, patch: TimerPatch) {
        self.apply(id, |timer| match patch.label {
            Some(label) if timer.label != label => {
                timer.label = label;
                true
            }
            _ => false,
        });
    }

    /// Reconfigure the duration triple; the timer lands in idle.
    pub fn set_duration(&mut self, id: &str, hours: u64, minutes: u64, seconds: u64) {
        self.apply(id, |timer| timer.set_duration(hours, minutes, seconds));
    }

    pub fn start(&mut self, id: &str) {
        let now_ms = self.clock.now_ms();
        self.apply(id, |timer| timer.start(now_ms));
    }

    pub fn pause(&mut self, id: &str) {
        let now_ms = self.clock.now_ms();
        self.apply(id, |timer| timer.pause(now_ms));
    }

    pub fn reset(&mut self, id: &str) {
        self.apply(id, |timer| timer.reset());
    }

    /// Advance one running timer. Cheap and idempotent-safe; tolerates
    /// removed ids and completed timers as no-ops.
    pub fn tick(&mut self, id: &str) {
        let now_ms = self.clock.now_ms();
        self.apply(id, |timer| timer.tick(now_ms));
    }

    /// Drop every timer.
    pub fn clear_all(&mut self) {
        if self.timers.is_empty() {
            return;
        }
        self.timers.clear();
        self.commit();
    }

    // ── Subscriptions ────────────────────────────────────────────────

    /// Observe the collection after every persisted mutation.
    pub fn subscribe(&mut self, callback: impl FnMut(&[Timer]) + 'static) -> SubscriberId {
        self.observers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriberId) -> bool {
        self.observers.unsubscribe(id)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn apply(&mut self, id: &str, op: impl FnOnce(&mut Timer) -> bool) {
        let changed = match self.timers.iter_mut().find(|t| t.id == id) {
            Some(timer) => op(timer),
            None => false,
        };
        if changed {
            self.commit();
        }
    }

    /// Persist, then notify. Order matters: a subscriber reading storage
    /// must already see the state it was notified about.
    fn commit(&mut self) {
        storage::save_collection(self.storage.as_ref(), TIMERS_KEY, &self.timers);
        self.observers.notify(&self.timers);
    }
}
