mod model;
mod store;

pub use model::{Timer, TimerStatus};
pub use store::{TimerOptions, TimerPatch, TimerStore};
