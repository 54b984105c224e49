//! Target-date event commands.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use tickdown_core::format::format_event_remaining;
use tickdown_core::{CountdownEvent, DateInput, EventPatch, EventStore, FileStore, SystemClock};

#[derive(Subcommand)]
pub enum EventAction {
    /// Create a target-date event
    Add {
        /// Event name
        name: String,
        /// Target date, RFC3339 (e.g. 2026-12-31T00:00:00Z)
        date: String,
    },
    /// List events with time remaining
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update an event
    Update {
        /// Event ID
        id: String,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// New target date, RFC3339
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete an event
    Remove {
        /// Event ID
        id: String,
    },
    /// Delete every event
    Clear,
}

fn open_store() -> Result<EventStore, Box<dyn std::error::Error>> {
    Ok(EventStore::new(
        Box::new(FileStore::open()?),
        Box::new(SystemClock),
    ))
}

fn fetch(store: &EventStore, id: &str) -> Result<CountdownEvent, Box<dyn std::error::Error>> {
    Ok(store
        .get_event(id)
        .ok_or_else(|| format!("Event not found: {id}"))?)
}

pub fn run(action: EventAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;

    match action {
        EventAction::Add { name, date } => {
            let target = DateTime::parse_from_rfc3339(&date)?.with_timezone(&Utc);
            let id = store.add(name, target);
            println!("Event created: {id}");
            println!("{}", serde_json::to_string_pretty(&fetch(&store, &id)?)?);
        }
        EventAction::List { json } => {
            let now = Utc::now();
            if json {
                let rows: Vec<serde_json::Value> = store
                    .events()
                    .iter()
                    .map(|event| {
                        serde_json::json!({
                            "id": event.id,
                            "name": event.name,
                            "target_date": event.target_date,
                            "created_at": event.created_at,
                            "remaining": format_event_remaining(event.target_date, now),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            } else if store.events().is_empty() {
                println!("No events.");
            } else {
                for event in store.events() {
                    println!(
                        "{}  {}: {}",
                        event.id,
                        event.name,
                        format_event_remaining(event.target_date, now)
                    );
                }
            }
        }
        EventAction::Update { id, name, date } => {
            fetch(&store, &id)?;
            store.update(
                &id,
                EventPatch {
                    name,
                    target_date: date.map(DateInput::from),
                },
            );
            println!("Event updated:");
            println!("{}", serde_json::to_string_pretty(&fetch(&store, &id)?)?);
        }
        EventAction::Remove { id } => {
            fetch(&store, &id)?;
            store.remove(&id);
            println!("Event removed: {id}");
        }
        EventAction::Clear => {
            store.clear_all();
            println!("All events removed.");
        }
    }

    Ok(())
}
