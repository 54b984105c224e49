//! User preferences with persisted overrides.
//!
//! Unlike the collection stores this one holds a single struct, so every
//! field carries a serde default and a half-written blob still loads.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::storage::{StorageBackend, SETTINGS_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    System,
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            "system" => Ok(Theme::System),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
    /// Alarm volume in percent, 0 to 100.
    #[serde(default = "default_volume")]
    pub volume: u8,
    #[serde(default = "default_theme")]
    pub theme: Theme,
}

fn default_sound_enabled() -> bool {
    true
}

fn default_volume() -> u8 {
    70
}

fn default_theme() -> Theme {
    Theme::Light
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: default_sound_enabled(),
            volume: default_volume(),
            theme: default_theme(),
        }
    }
}

pub struct SettingsStore {
    settings: Settings,
    storage: Box<dyn StorageBackend>,
}

impl SettingsStore {
    /// Restore persisted settings, falling back to defaults when the blob
    /// is missing or unreadable.
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        let settings = match storage.load(SETTINGS_KEY) {
            Ok(Some(text)) => serde_json::from_str(&text).unwrap_or_else(|error| {
                tracing::warn!(%error, "discarding unreadable settings");
                Settings::default()
            }),
            Ok(None) => Settings::default(),
            Err(error) => {
                tracing::warn!(%error, "failed to load settings");
                Settings::default()
            }
        };
        Self { settings, storage }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn set_sound_enabled(&mut self, enabled: bool) {
        if self.settings.sound_enabled != enabled {
            self.settings.sound_enabled = enabled;
            self.persist();
        }
    }

    /// Values above 100 are clamped down.
    pub fn set_volume(&mut self, volume: u8) {
        let volume = volume.min(100);
        if self.settings.volume != volume {
            self.settings.volume = volume;
            self.persist();
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        if self.settings.theme != theme {
            self.settings.theme = theme;
            self.persist();
        }
    }

    /// Restore defaults and persist them.
    pub fn reset(&mut self) {
        self.settings = Settings::default();
        self.persist();
    }

    fn persist(&self) {
        match serde_json::to_string(&self.settings) {
            Ok(text) => {
                if let Err(error) = self.storage.save(SETTINGS_KEY, &text) {
                    tracing::error!(%error, "failed to persist settings");
                }
            }
            Err(error) => tracing::error!(%error, "failed to serialize settings"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn defaults_when_nothing_persisted() {
        let store = SettingsStore::new(Box::new(MemoryStore::new()));
        assert_eq!(store.settings(), &Settings::default());
        assert!(store.settings().sound_enabled);
        assert_eq!(store.settings().volume, 70);
        assert_eq!(store.settings().theme, Theme::Light);
    }

    #[test]
    fn setters_persist_changes() {
        let memory = MemoryStore::new();
        let mut store = SettingsStore::new(Box::new(memory.clone()));

        store.set_volume(30);
        store.set_theme(Theme::Dark);
        store.set_sound_enabled(false);

        let reloaded = SettingsStore::new(Box::new(memory));
        assert_eq!(reloaded.settings().volume, 30);
        assert_eq!(reloaded.settings().theme, Theme::Dark);
        assert!(!reloaded.settings().sound_enabled);
    }

    #[test]
    fn unchanged_value_does_not_write() {
        let memory = MemoryStore::new();
        let mut store = SettingsStore::new(Box::new(memory.clone()));

        store.set_volume(70);
        assert!(memory.load(SETTINGS_KEY).unwrap().is_none());
    }

    #[test]
    fn volume_clamps_to_100() {
        let mut store = SettingsStore::new(Box::new(MemoryStore::new()));
        store.set_volume(250);
        assert_eq!(store.settings().volume, 100);
    }

    #[test]
    fn partial_blob_fills_missing_fields() {
        let memory = MemoryStore::new();
        memory.save(SETTINGS_KEY, r#"{"volume":15}"#).unwrap();

        let store = SettingsStore::new(Box::new(memory));
        assert_eq!(store.settings().volume, 15);
        assert!(store.settings().sound_enabled);
        assert_eq!(store.settings().theme, Theme::Light);
    }

    #[test]
    fn corrupt_blob_falls_back_to_defaults() {
        let memory = MemoryStore::new();
        memory.save(SETTINGS_KEY, "{broken").unwrap();

        let store = SettingsStore::new(Box::new(memory));
        assert_eq!(store.settings(), &Settings::default());
    }

    #[test]
    fn reset_restores_and_persists_defaults() {
        let memory = MemoryStore::new();
        let mut store = SettingsStore::new(Box::new(memory.clone()));
        store.set_volume(5);

        store.reset();
        assert_eq!(store.settings(), &Settings::default());

        let blob = memory.load(SETTINGS_KEY).unwrap().unwrap();
        let persisted: Settings = serde_json::from_str(&blob).unwrap();
        assert_eq!(persisted, Settings::default());
    }

    #[test]
    fn theme_parses_from_str() {
        assert_eq!("dark".parse::<Theme>().unwrap(), Theme::Dark);
        assert!("solarized".parse::<Theme>().is_err());
    }
}
