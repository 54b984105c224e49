use clap::Subcommand;
use tickdown_core::{FileStore, SettingsStore};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print current settings as JSON
    Show,
    /// Set a settings value
    Set {
        /// Settings key: sound_enabled, volume, or theme
        key: String,
        /// New value
        value: String,
    },
    /// Reset settings to defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = SettingsStore::new(Box::new(FileStore::open()?));

    match action {
        ConfigAction::Show => {
            println!("{}", serde_json::to_string_pretty(store.settings())?);
        }
        ConfigAction::Set { key, value } => {
            match key.as_str() {
                "sound_enabled" => store.set_sound_enabled(value.parse()?),
                "volume" => store.set_volume(value.parse()?),
                "theme" => store.set_theme(value.parse()?),
                _ => return Err(format!("unknown key: {key}").into()),
            }
            println!("ok");
        }
        ConfigAction::Reset => {
            store.reset();
            println!("config reset to defaults");
        }
    }

    Ok(())
}
