use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

use crate::error::Result;
use crate::store::KvStore;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    pub fn init(&self) -> Result<()> {
        self.conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS kv_entries (
                key TEXT PRIMARY KEY NOT NULL,
                value TEXT NOT NULL,
                updated_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;

        // Run migrations for existing databases
        self.migrate()?;

        Ok(())
    }

    // Early databases stored bare key/value pairs without a write timestamp
    fn migrate(&self) -> Result<()> {
        let has_updated_at: bool = self
            .conn
            .prepare("SELECT updated_at FROM kv_entries LIMIT 1")
            .is_ok();

        if !has_updated_at {
            log::info!("migrating kv_entries: adding updated_at column");
            self.conn.execute_batch(
                r#"
                ALTER TABLE kv_entries ADD COLUMN updated_at TEXT NOT NULL DEFAULT '1970-01-01T00:00:00+00:00';
                "#,
            )?;
        }

        Ok(())
    }

    /// Keys currently holding a value, sorted.
    pub fn keys(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_entries ORDER BY key")?;
        let rows = stmt.query_map([], |row| row.get(0))?;
        let keys = rows.collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(keys)
    }

    pub fn updated_at(&self, key: &str) -> Result<Option<String>> {
        let ts = self
            .conn
            .query_row(
                "SELECT updated_at FROM kv_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(ts)
    }
}

impl KvStore for Database {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let now = Utc::now();
        self.conn.execute(
            r#"
            INSERT INTO kv_entries (key, value, updated_at) VALUES (?1, ?2, ?3)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
            params![key, value, now.to_rfc3339()],
        )?;
        log::debug!("stored {} bytes under '{}'", value.len(), key);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM kv_entries WHERE key = ?1", params![key])?;
        log::debug!("removed '{}' ({} rows)", key, rows);
        Ok(())
    }
}
