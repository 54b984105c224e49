//! Countdown timer commands.

use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

use clap::Subcommand;
use tickdown_core::format::format_time;
use tickdown_core::{
    Alarm, AudioError, FileStore, NullSink, SettingsStore, SystemClock, Timer, TimerOptions,
    TimerPatch, TimerStatus, TimerStore, ToneGenerator,
};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Create a new countdown
    Add {
        /// Hours component (default 0)
        #[arg(long)]
        hours: Option<u64>,
        /// Minutes component (default 5)
        #[arg(long)]
        minutes: Option<u64>,
        /// Seconds component (default 0)
        #[arg(long)]
        seconds: Option<u64>,
        /// Display label
        #[arg(long)]
        label: Option<String>,
    },
    /// List countdowns
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Start or resume a countdown
    Start {
        /// Timer ID
        id: String,
    },
    /// Pause a running countdown
    Pause {
        /// Timer ID
        id: String,
    },
    /// Reset a countdown to its configured duration
    Reset {
        /// Timer ID
        id: String,
    },
    /// Change a countdown's duration
    Set {
        /// Timer ID
        id: String,
        /// Hours component
        hours: u64,
        /// Minutes component
        minutes: u64,
        /// Seconds component
        seconds: u64,
    },
    /// Rename a countdown
    Label {
        /// Timer ID
        id: String,
        /// New label
        label: String,
    },
    /// Delete a countdown
    Remove {
        /// Timer ID
        id: String,
    },
    /// Delete every countdown
    Clear,
    /// Print reconciled timer state as JSON
    Status,
    /// Drive running countdowns once per second until none remain
    Watch,
}

/// Rings the terminal bell. A bell that already sounded cannot be
/// unsounded, so stop_tone is a no-op.
struct BellTone;

impl ToneGenerator for BellTone {
    fn start_tone(&self) -> Result<(), AudioError> {
        eprint!("\x07");
        io::stderr()
            .flush()
            .map_err(|e| AudioError::ToneFailed(e.to_string()))
    }

    fn stop_tone(&self) {}
}

fn open_store() -> Result<TimerStore, Box<dyn std::error::Error>> {
    Ok(TimerStore::new(
        Box::new(FileStore::open()?),
        Box::new(SystemClock),
    ))
}

fn fetch(store: &TimerStore, id: &str) -> Result<Timer, Box<dyn std::error::Error>> {
    Ok(store
        .get_timer(id)
        .ok_or_else(|| format!("Timer not found: {id}"))?)
}

fn status_str(status: TimerStatus) -> &'static str {
    match status {
        TimerStatus::Idle => "idle",
        TimerStatus::Running => "running",
        TimerStatus::Paused => "paused",
        TimerStatus::Completed => "completed",
    }
}

fn display_name(timer: &Timer) -> &str {
    if timer.label.is_empty() {
        &timer.id
    } else {
        &timer.label
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;

    match action {
        TimerAction::Add {
            hours,
            minutes,
            seconds,
            label,
        } => {
            let id = store.add(TimerOptions {
                hours,
                minutes,
                seconds,
                label,
            });
            println!("Timer created: {id}");
            println!("{}", serde_json::to_string_pretty(&fetch(&store, &id)?)?);
        }
        TimerAction::List { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(store.timers())?);
            } else if store.timers().is_empty() {
                println!("No timers.");
            } else {
                for timer in store.timers() {
                    println!(
                        "{}  {:<9}  {}  {}",
                        timer.id,
                        status_str(timer.status),
                        format_time(timer.remaining_secs as i64),
                        timer.label
                    );
                }
            }
        }
        TimerAction::Start { id } => {
            fetch(&store, &id)?;
            store.start(&id);
            println!("{}", serde_json::to_string_pretty(&fetch(&store, &id)?)?);
        }
        TimerAction::Pause { id } => {
            fetch(&store, &id)?;
            store.pause(&id);
            println!("{}", serde_json::to_string_pretty(&fetch(&store, &id)?)?);
        }
        TimerAction::Reset { id } => {
            fetch(&store, &id)?;
            store.reset(&id);
            println!("{}", serde_json::to_string_pretty(&fetch(&store, &id)?)?);
        }
        TimerAction::Set {
            id,
            hours,
            minutes,
            seconds,
        } => {
            fetch(&store, &id)?;
            store.set_duration(&id, hours, minutes, seconds);
            println!("{}", serde_json::to_string_pretty(&fetch(&store, &id)?)?);
        }
        TimerAction::Label { id, label } => {
            fetch(&store, &id)?;
            store.update_timer(&id, TimerPatch { label: Some(label) });
            println!("{}", serde_json::to_string_pretty(&fetch(&store, &id)?)?);
        }
        TimerAction::Remove { id } => {
            fetch(&store, &id)?;
            store.remove(&id);
            println!("Timer removed: {id}");
        }
        TimerAction::Clear => {
            store.clear_all();
            println!("All timers removed.");
        }
        TimerAction::Status => {
            // Tick running timers so remaining reflects the wall clock.
            let running: Vec<String> = store
                .timers()
                .iter()
                .filter(|t| t.is_running())
                .map(|t| t.id.clone())
                .collect();
            for id in &running {
                store.tick(id);
            }
            println!("{}", serde_json::to_string_pretty(store.timers())?);
        }
        TimerAction::Watch => watch(&mut store)?,
    }

    Ok(())
}

/// Per-second external driver. The stores never tick themselves; this
/// loop is the CLI's stand-in for a host UI's scheduler.
fn watch(store: &mut TimerStore) -> Result<(), Box<dyn std::error::Error>> {
    if !store.timers().iter().any(Timer::is_running) {
        println!("No running timers.");
        return Ok(());
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        loop {
            ticker.tick().await;
            let running: Vec<String> = store
                .timers()
                .iter()
                .filter(|t| t.is_running())
                .map(|t| t.id.clone())
                .collect();
            if running.is_empty() {
                break;
            }
            for id in &running {
                store.tick(id);
                let Some(timer) = store.get_timer(id) else {
                    continue;
                };
                if timer.status == TimerStatus::Completed {
                    println!("Timer completed: {}", display_name(&timer));
                    ring_completion().await?;
                } else {
                    println!(
                        "{}  {}",
                        format_time(timer.remaining_secs as i64),
                        display_name(&timer)
                    );
                }
            }
        }
        Ok::<(), Box<dyn std::error::Error>>(())
    })
}

/// Sound the completion alarm for a couple of seconds, honoring the
/// persisted sound settings.
async fn ring_completion() -> Result<(), Box<dyn std::error::Error>> {
    let settings = SettingsStore::new(Box::new(FileStore::open()?));
    if !settings.settings().sound_enabled {
        return Ok(());
    }

    let mut alarm = Alarm::new(Arc::new(NullSink), Arc::new(BellTone));
    alarm.set_volume(f64::from(settings.settings().volume) / 100.0);
    alarm.ring().await;
    tokio::time::sleep(Duration::from_secs(2)).await;
    alarm.stop().await;
    Ok(())
}
