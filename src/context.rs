use std::path::Path;

use anyhow::{Context, Result};
use log::info;

use crate::db::Database;
use crate::prefs::PrefStore;

/// Everything a UI collaborator needs, passed explicitly instead of living
/// in globals: the record store handle and the preference store.
pub struct AppContext {
    pub db: Database,
    pub prefs: PrefStore,
}

impl AppContext {
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("failed to create data directory {}", data_dir.display()))?;

        let db = Database::new(data_dir.join("duelog.sqlite3"))?;
        let prefs = PrefStore::new(data_dir.join("prefs.json"))?;

        info!("Application context ready at {}", data_dir.display());

        Ok(Self { db, prefs })
    }
}
