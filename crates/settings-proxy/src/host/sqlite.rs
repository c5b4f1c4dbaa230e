use std::{
    collections::HashMap,
    path::Path,
    sync::{Mutex, MutexGuard},
};

use rusqlite::Connection;

use super::{validate_table_name, HostStore, HostStoreError};

/// A host store keeping every entry in one SQLite table.
///
/// ```rust
/// use settings_proxy::{HostStore, SqliteStore};
///
/// let store = SqliteStore::open_in_memory("settings")?;
/// store.set_item("theme", "\"dark\"")?;
/// assert_eq!(store.entries()?["theme"], "\"dark\"");
/// # Ok::<_, settings_proxy::HostStoreError>(())
/// ```
pub struct SqliteStore {
    connection: Mutex<Connection>,
    table: String,
}

impl std::fmt::Debug for SqliteStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStore")
            .field("table", &self.table)
            .finish()
    }
}

impl SqliteStore {
    /// Open (or create) the database at `path`, using `table` for entries.
    pub fn open(path: impl AsRef<Path>, table: &str) -> Result<Self, HostStoreError> {
        Self::initialize(Connection::open(path)?, table)
    }

    /// Open a private in-memory database.
    pub fn open_in_memory(table: &str) -> Result<Self, HostStoreError> {
        Self::initialize(Connection::open_in_memory()?, table)
    }

    fn initialize(connection: Connection, table: &str) -> Result<Self, HostStoreError> {
        // Table names cannot be bound as parameters. They are restricted to letters and
        // underscores, and quoted so that keywords such as `table` still work.
        if !validate_table_name(table) {
            return Err(HostStoreError::InvalidTableName(table.to_owned()));
        }

        connection.execute(
            &format!("CREATE TABLE IF NOT EXISTS \"{table}\" (key TEXT PRIMARY KEY, value TEXT NOT NULL);"),
            [],
        )?;

        Ok(SqliteStore {
            connection: Mutex::new(connection),
            table: table.to_owned(),
        })
    }

    fn connection(&self) -> Result<MutexGuard<'_, Connection>, HostStoreError> {
        self.connection
            .lock()
            .map_err(|_| HostStoreError::Internal("SQLite connection lock poisoned".to_owned()))
    }
}

impl HostStore for SqliteStore {
    fn entries(&self) -> Result<HashMap<String, String>, HostStoreError> {
        let conn = self.connection()?;
        let mut stmt = conn.prepare(&format!("SELECT key, value FROM \"{}\"", self.table))?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut entries = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            entries.insert(key, value);
        }

        Ok(entries)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), HostStoreError> {
        let conn = self.connection()?;
        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO \"{}\" (key, value) VALUES (?1, ?2)",
                self.table
            ),
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), HostStoreError> {
        let conn = self.connection()?;
        conn.execute(
            &format!("DELETE FROM \"{}\" WHERE key = ?1", self.table),
            rusqlite::params![key],
        )?;
        Ok(())
    }
}
