//! Completion alarm with a beeping fallback.
//!
//! Playback capability is injected: hosts hand the [`Alarm`] an
//! [`AudioSink`] for real audio and a [`ToneGenerator`] for the degraded
//! path. When the sink refuses to play, a background task toggles the tone
//! generator on a fixed cadence until [`Alarm::stop`] is called. If the
//! tone generator fails too, the alarm stays silent and only the log knows.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;

use crate::error::AudioError;

/// Source handed to the sink when the host never picked one.
pub const DEFAULT_SOURCE: &str = "alarm-sound.mp3";

const DEFAULT_VOLUME: f64 = 0.7;
const FALLBACK_TOGGLE: Duration = Duration::from_millis(500);

/// Primary playback capability.
#[async_trait]
pub trait AudioSink: Send + Sync {
    /// Prepare the given source for looped playback.
    fn init(&self, source: &str);

    async fn play(&self) -> Result<(), AudioError>;

    fn stop(&self);

    /// Volume in 0.0..=1.0.
    fn set_volume(&self, volume: f64);

    fn is_playing(&self) -> bool;
}

/// Degraded-path oscillator. Implementations must make `stop_tone`
/// idempotent; the alarm calls it even when no tone is sounding.
pub trait ToneGenerator: Send + Sync {
    fn start_tone(&self) -> Result<(), AudioError>;

    fn stop_tone(&self);
}

/// Sink for hosts with no audio output at all. `play` always fails, which
/// routes ringing straight to the fallback tone.
#[derive(Debug, Default)]
pub struct NullSink;

#[async_trait]
impl AudioSink for NullSink {
    fn init(&self, _source: &str) {}

    async fn play(&self) -> Result<(), AudioError> {
        Err(AudioError::Unavailable("no audio output".into()))
    }

    fn stop(&self) {}

    fn set_volume(&self, _volume: f64) {}

    fn is_playing(&self) -> bool {
        false
    }
}

pub struct Alarm {
    sink: Arc<dyn AudioSink>,
    tone: Arc<dyn ToneGenerator>,
    volume: f64,
    initialized: bool,
    fallback: Option<JoinHandle<()>>,
}

impl Alarm {
    pub fn new(sink: Arc<dyn AudioSink>, tone: Arc<dyn ToneGenerator>) -> Self {
        Self {
            sink,
            tone,
            volume: DEFAULT_VOLUME,
            initialized: false,
            fallback: None,
        }
    }

    /// Begin ringing. The sink is initialized lazily on the first ring so
    /// an alarm that never fires never touches the audio backend.
    pub async fn ring(&mut self) {
        if !self.initialized {
            self.sink.init(DEFAULT_SOURCE);
            self.sink.set_volume(self.volume);
            self.initialized = true;
        }
        if let Err(error) = self.sink.play().await {
            tracing::warn!(%error, "audio sink failed, engaging fallback tone");
            self.start_fallback();
        }
    }

    fn start_fallback(&mut self) {
        if self.fallback.as_ref().map_or(false, |task| !task.is_finished()) {
            return;
        }
        let tone = Arc::clone(&self.tone);
        self.fallback = Some(tokio::spawn(async move {
            // The first tick completes immediately, so the beep starts
            // without waiting out a full toggle period.
            let mut ticker = tokio::time::interval(FALLBACK_TOGGLE);
            let mut sounding = false;
            loop {
                ticker.tick().await;
                if sounding {
                    tone.stop_tone();
                    sounding = false;
                } else if let Err(error) = tone.start_tone() {
                    tracing::error!(%error, "fallback tone failed");
                    break;
                } else {
                    sounding = true;
                }
            }
        }));
    }

    /// Stop both playback paths. Aborting the toggle task only lands at
    /// its next tick, so this waits for the task to finish before
    /// silencing the tone; an iteration already inside `start_tone`
    /// cannot leave the tone sounding.
    pub async fn stop(&mut self) {
        if let Some(task) = self.fallback.take() {
            task.abort();
            let _ = task.await;
        }
        // The task may have stopped mid-beep.
        self.tone.stop_tone();
        self.sink.stop();
    }

    /// Clamped into 0.0..=1.0 and forwarded once the sink exists.
    pub fn set_volume(&mut self, volume: f64) {
        self.volume = volume.clamp(0.0, 1.0);
        if self.initialized {
            self.sink.set_volume(self.volume);
        }
    }

    pub fn is_ringing(&self) -> bool {
        self.sink.is_playing()
            || self
                .fallback
                .as_ref()
                .map_or(false, |task| !task.is_finished())
    }
}
