use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock};

/// Small persisted preferences: the "last selected" values the UI restores
/// on startup. Not part of the record store; corrupt or missing files fall
/// back to defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Prefs {
    active_project_id: Option<String>,
    last_deck_id: Option<String>,
    tag_filter_and: bool,
}

pub struct PrefStore {
    path: PathBuf,
    data: RwLock<Prefs>,
}

impl PrefStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read preferences from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            Prefs::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn active_project_id(&self) -> Option<String> {
        self.data.read().unwrap().active_project_id.clone()
    }

    pub fn set_active_project_id(&self, id: Option<String>) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.active_project_id = id;
        self.persist(&guard)
    }

    pub fn last_deck_id(&self) -> Option<String> {
        self.data.read().unwrap().last_deck_id.clone()
    }

    pub fn set_last_deck_id(&self, id: Option<String>) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.last_deck_id = id;
        self.persist(&guard)
    }

    pub fn tag_filter_and(&self) -> bool {
        self.data.read().unwrap().tag_filter_and
    }

    pub fn set_tag_filter_and(&self, and_mode: bool) -> Result<()> {
        let mut guard = self.data.write().unwrap();
        guard.tag_filter_and = and_mode;
        self.persist(&guard)
    }

    fn persist(&self, data: &Prefs) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write preferences to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("duelog-prefs-{}.json", Uuid::new_v4()))
    }

    #[test]
    fn round_trips_through_file() {
        let path = temp_path();
        let store = PrefStore::new(path.clone()).unwrap();
        store.set_active_project_id(Some("p1".into())).unwrap();
        store.set_last_deck_id(Some("d1".into())).unwrap();
        store.set_tag_filter_and(true).unwrap();

        let reloaded = PrefStore::new(path.clone()).unwrap();
        assert_eq!(reloaded.active_project_id(), Some("p1".to_string()));
        assert_eq!(reloaded.last_deck_id(), Some("d1".to_string()));
        assert!(reloaded.tag_filter_and());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn corrupt_file_falls_back_to_defaults() {
        let path = temp_path();
        fs::write(&path, "not json at all").unwrap();
        let store = PrefStore::new(path.clone()).unwrap();
        assert_eq!(store.active_project_id(), None);
        assert!(!store.tag_filter_and());

        let _ = fs::remove_file(path);
    }
}
