//! # Tickdown Core Library
//!
//! This library provides the core business logic for Tickdown countdown
//! timers. It implements a host-agnostic design: all state lives in plain
//! stores that a CLI binary, a GUI shell, or a test harness drives in
//! exactly the same way.
//!
//! ## Architecture
//!
//! - **Timer Store**: A wall-clock-based state machine that requires the
//!   caller to periodically invoke `tick()` for progress updates; restarts
//!   and missed ticks are absorbed by reconciling against the persisted
//!   end timestamp
//! - **Event Store**: Named target-date markers whose remaining time is
//!   always computed live
//! - **Storage**: Keyed JSON blobs behind a swappable backend trait
//! - **Alarm**: Injected audio playback with a tone-generator fallback
//!
//! ## Key Components
//!
//! - [`TimerStore`]: Countdown collection and lifecycle commands
//! - [`EventStore`]: Target-date collection
//! - [`SettingsStore`]: Persisted user preferences
//! - [`Alarm`]: Completion sound orchestration
//! - [`StorageBackend`] / [`Clock`]: Capability seams injected at
//!   construction

pub mod alarm;
pub mod clock;
pub mod error;
pub mod events;
pub mod format;
pub mod id;
pub mod observers;
pub mod settings;
pub mod storage;
pub mod timer;

pub use alarm::{Alarm, AudioSink, NullSink, ToneGenerator};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AudioError, StorageError};
pub use events::{CountdownEvent, DateInput, EventPatch, EventStore};
pub use observers::SubscriberId;
pub use settings::{Settings, SettingsStore, Theme};
pub use storage::{FileStore, MemoryStore, StorageBackend};
pub use timer::{Timer, TimerOptions, TimerPatch, TimerStatus, TimerStore};
