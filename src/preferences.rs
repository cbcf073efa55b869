use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;

use eyre::Result;
use rusqlite::{Connection, OptionalExtension, params};

use crate::config::get_app_data_prefix;
use crate::logging;

/// Durable key/value flags.
///
/// Neither call may fail observably: a backend that cannot read reports
/// "no value", and a backend that cannot write drops the write. Callers never
/// assume a write landed.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
}

pub struct SqlitePreferences {
    conn: Connection,
}

impl SqlitePreferences {
    pub fn new() -> Result<Self> {
        let prefix = get_app_data_prefix()?;
        Self::open(&prefix.join("preferences.db"))
    }

    pub fn open(filepath: &Path) -> Result<Self> {
        if let Some(parent) = filepath.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(filepath)?;
        Self::init_db(&conn)?;
        Ok(Self { conn })
    }

    fn init_db(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS preferences (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at DATETIME DEFAULT (datetime('now'))
            );
            ",
        )?;
        Ok(())
    }

    fn try_get(&self, key: &str) -> rusqlite::Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM preferences WHERE key=?",
                params![key],
                |row| row.get(0),
            )
            .optional()
    }

    fn try_set(&self, key: &str, value: &str) -> rusqlite::Result<usize> {
        self.conn.execute(
            "INSERT OR REPLACE INTO preferences (key, value, updated_at) VALUES (?, ?, datetime('now'))",
            params![key, value],
        )
    }
}

impl PreferenceStore for SqlitePreferences {
    fn get(&self, key: &str) -> Option<String> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(err) => {
                logging::warn(format!("Could not read preference {key}: {err}"));
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(err) = self.try_set(key, value) {
            logging::warn(format!("Dropped preference write {key}={value}: {err}"));
        }
    }
}

/// Non-persistent store, used in tests and when the database is unreachable
/// but the session should still remember choices until exit.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(entries: &[(&str, &str)]) -> Self {
        let store = Self::new();
        for (key, value) in entries {
            store.set(key, value);
        }
        store
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

/// Storage disabled: nothing is ever stored.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPreferences;

impl PreferenceStore for NullPreferences {
    fn get(&self, _key: &str) -> Option<String> {
        None
    }

    fn set(&self, key: &str, _value: &str) {
        logging::debug(format!("Persistence unavailable, dropping {key}"));
    }
}

/// Open the on-disk store, degrading to a null store when that fails.
pub fn open_default() -> Box<dyn PreferenceStore> {
    match SqlitePreferences::new() {
        Ok(store) => Box::new(store),
        Err(err) => {
            logging::warn(format!(
                "Preferences unavailable, choices will not be remembered: {err}"
            ));
            Box::new(NullPreferences)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_store() -> (SqlitePreferences, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = SqlitePreferences::open(&temp_dir.path().join("prefs.db")).unwrap();
        (store, temp_dir)
    }

    #[test]
    fn test_missing_key_is_none() {
        let (store, _dir) = setup_store();
        assert_eq!(store.get("theme"), None);
    }

    #[test]
    fn test_set_then_get_overwrites() {
        let (store, _dir) = setup_store();
        store.set("theme", "dark");
        assert_eq!(store.get("theme").as_deref(), Some("dark"));
        store.set("theme", "light");
        assert_eq!(store.get("theme").as_deref(), Some("light"));
    }

    #[test]
    fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("prefs.db");
        {
            let store = SqlitePreferences::open(&path).unwrap();
            store.set("entered", "true");
        }
        let store = SqlitePreferences::open(&path).unwrap();
        assert_eq!(store.get("entered").as_deref(), Some("true"));
    }

    #[test]
    fn test_broken_table_degrades_silently() {
        let (store, _dir) = setup_store();
        store.conn.execute("DROP TABLE preferences", []).unwrap();

        store.set("theme", "dark");
        assert_eq!(store.get("theme"), None);
    }

    #[test]
    fn test_memory_and_null_stores() {
        let memory = MemoryPreferences::with(&[("theme", "dark")]);
        assert_eq!(memory.get("theme").as_deref(), Some("dark"));
        memory.set("entered", "false");
        assert_eq!(memory.get("entered").as_deref(), Some("false"));

        let null = NullPreferences;
        null.set("theme", "dark");
        assert_eq!(null.get("theme"), None);
    }
}
