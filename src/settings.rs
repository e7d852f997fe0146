//! User settings persisted through eframe storage.

use log::info;
use serde::{Deserialize, Serialize};

pub const STORAGE_KEY: &str = "crew_map.settings";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Show editable names in the roster panel.
    pub names: bool,
    /// Draw entity bounding boxes on the map.
    pub debug_bounds: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            names: true,
            debug_bounds: false,
        }
    }
}

impl Settings {
    /// Stored settings, or the defaults when none decode.
    pub fn load(storage: Option<&dyn eframe::Storage>) -> Self {
        let settings = storage
            .and_then(|s| eframe::get_value::<Self>(s, STORAGE_KEY))
            .unwrap_or_default();
        info!("settings: {settings:?}");
        settings
    }

    pub fn store(&self, storage: &mut dyn eframe::Storage) {
        eframe::set_value(storage, STORAGE_KEY, self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    #[derive(Default)]
    struct MemoryStorage(FxHashMap<String, String>);

    impl eframe::Storage for MemoryStorage {
        fn get_string(&self, key: &str) -> Option<String> {
            self.0.get(key).cloned()
        }

        fn set_string(&mut self, key: &str, value: String) {
            self.0.insert(key.to_owned(), value);
        }

        fn flush(&mut self) {}
    }

    #[test]
    fn missing_storage_yields_defaults() {
        assert_eq!(Settings::load(None), Settings::default());
        let empty = MemoryStorage::default();
        assert_eq!(Settings::load(Some(&empty)), Settings::default());
    }

    #[test]
    fn settings_survive_a_restart() {
        let mut storage = MemoryStorage::default();
        let saved = Settings {
            names: false,
            debug_bounds: true,
        };
        saved.store(&mut storage);
        assert_eq!(Settings::load(Some(&storage)), saved);
    }

    #[test]
    fn garbage_falls_back_to_defaults() {
        let mut storage = MemoryStorage::default();
        eframe::Storage::set_string(&mut storage, STORAGE_KEY, "not settings".to_owned());
        assert_eq!(Settings::load(Some(&storage)), Settings::default());
    }
}
