//! Single countdown timer state machine.
//!
//! Wall-clock based: a running timer stores the absolute instant it will
//! reach zero (`end_epoch_ms`) and re-derives remaining seconds from it on
//! demand. Remaining time never depends on how often progress was observed,
//! so ticks may arrive at any cadence -- or stop entirely while the host
//! process is suspended -- without losing accuracy.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused | Completed) -> Idle
//! ```
//!
//! Command methods take the current time in epoch milliseconds and return
//! whether the timer changed; calls outside the transition table are no-ops.

use serde::{Deserialize, Serialize};

use crate::format::parse_time_to_seconds;
use crate::id::new_id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Completed,
}

/// One countdown instance.
///
/// Invariant: `status == Running` exactly when `end_epoch_ms` is set.
/// `remaining_secs` is authoritative only while not running; while running
/// the truth is derived from `end_epoch_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    pub id: String,
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    /// Derived from the h/m/s triple; never set independently.
    pub total_secs: u64,
    pub remaining_secs: u64,
    /// Wall-clock completion instant, present only while running.
    /// Persisted blobs may carry anything here; non-integer values read
    /// as absent and load reconciliation demotes the timer.
    #[serde(default, deserialize_with = "lenient_epoch_ms")]
    pub end_epoch_ms: Option<u64>,
    pub status: TimerStatus,
    #[serde(default)]
    pub label: String,
}

/// Ceiling of `(end - now) / 1000`, clamped at zero.
pub(crate) fn remaining_secs_from(end_epoch_ms: u64, now_ms: u64) -> u64 {
    end_epoch_ms.saturating_sub(now_ms).saturating_add(999) / 1000
}

impl Timer {
    /// Create an idle timer from a duration triple.
    pub fn new(hours: u64, minutes: u64, seconds: u64, label: impl Into<String>) -> Self {
        let total_secs = parse_time_to_seconds(hours, minutes, seconds);
        Self {
            id: new_id(),
            hours,
            minutes,
            seconds,
            total_secs,
            remaining_secs: total_secs,
            end_epoch_ms: None,
            status: TimerStatus::Idle,
            label: label.into(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Seconds remaining at `now_ms`. For a running timer this re-derives
    /// from `end_epoch_ms` without mutating; otherwise `remaining_secs`
    /// is already authoritative.
    pub fn remaining_at(&self, now_ms: u64) -> u64 {
        match (self.status, self.end_epoch_ms) {
            (TimerStatus::Running, Some(end)) => remaining_secs_from(end, now_ms),
            _ => self.remaining_secs,
        }
    }

    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin counting down. No-op while running or with nothing remaining.
    pub fn start(&mut self, now_ms: u64) -> bool {
        match self.status {
            TimerStatus::Idle | TimerStatus::Paused | TimerStatus::Completed => {
                if self.remaining_secs == 0 {
                    return false;
                }
                self.status = TimerStatus::Running;
                self.end_epoch_ms = Some(self.end_for(now_ms));
                true
            }
            TimerStatus::Running => false,
        }
    }

    /// Freeze the countdown, making `remaining_secs` authoritative again.
    pub fn pause(&mut self, now_ms: u64) -> bool {
        if self.status != TimerStatus::Running {
            return false;
        }
        let end = self.end_epoch_ms.unwrap_or_else(|| self.end_for(now_ms));
        self.remaining_secs = remaining_secs_from(end, now_ms);
        self.status = TimerStatus::Paused;
        self.end_epoch_ms = None;
        true
    }

    /// Recompute remaining time from the end instant; detects natural
    /// completion. Safe to call at any cadence, no-op while not running.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        if self.status != TimerStatus::Running {
            return false;
        }
        let before = (self.remaining_secs, self.status, self.end_epoch_ms);

        let end = self.end_epoch_ms.unwrap_or_else(|| self.end_for(now_ms));
        let remaining = remaining_secs_from(end, now_ms);
        self.remaining_secs = remaining;
        if remaining == 0 {
            self.status = TimerStatus::Completed;
            self.end_epoch_ms = None;
        } else {
            self.end_epoch_ms = Some(end);
        }

        (self.remaining_secs, self.status, self.end_epoch_ms) != before
    }

    /// Back to idle with the configured duration restored.
    pub fn reset(&mut self) -> bool {
        let before = (self.remaining_secs, self.status, self.end_epoch_ms);

        self.remaining_secs = self.total_secs;
        self.status = TimerStatus::Idle;
        self.end_epoch_ms = None;

        (self.remaining_secs, self.status, self.end_epoch_ms) != before
    }

    /// Reconfigure the duration triple; always lands in idle.
    pub fn set_duration(&mut self, hours: u64, minutes: u64, seconds: u64) -> bool {
        let before = (
            self.hours,
            self.minutes,
            self.seconds,
            self.remaining_secs,
            self.status,
            self.end_epoch_ms,
        );

        self.hours = hours;
        self.minutes = minutes;
        self.seconds = seconds;
        self.total_secs = parse_time_to_seconds(hours, minutes, seconds);
        self.remaining_secs = self.total_secs;
        self.status = TimerStatus::Idle;
        self.end_epoch_ms = None;

        (
            self.hours,
            self.minutes,
            self.seconds,
            self.remaining_secs,
            self.status,
            self.end_epoch_ms,
        ) != before
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn end_for(&self, now_ms: u64) -> u64 {
        now_ms.saturating_add(self.remaining_secs.saturating_mul(1000))
    }

    /// Re-derive ground truth after restoring from persistence. A timer
    /// saved as running had no live countdown while the process was gone:
    /// a missing end instant demotes to paused (fail safe), a passed one
    /// completes, a future one keeps running with remaining recomputed.
    /// Non-running timers pass through unchanged.
    pub(crate) fn reconcile_loaded(&mut self, now_ms: u64) -> bool {
        if self.status != TimerStatus::Running {
            return false;
        }

        let Some(end) = self.end_epoch_ms else {
            self.status = TimerStatus::Paused;
            return true;
        };

        let before = (self.remaining_secs, self.status, self.end_epoch_ms);
        let remaining = remaining_secs_from(end, now_ms);
        self.remaining_secs = remaining;
        if remaining == 0 {
            self.status = TimerStatus::Completed;
            self.end_epoch_ms = None;
        }
        (self.remaining_secs, self.status, self.end_epoch_ms) != before
    }
}

fn lenient_epoch_ms<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_u64()))
}
