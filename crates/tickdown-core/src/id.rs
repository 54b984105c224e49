//! Opaque unique identifiers for timers and events.

use uuid::Uuid;

/// Generate a new session-unique opaque id.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
