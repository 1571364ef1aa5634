//! SQLite slot backend.
//!
//! Slots are rows of `kv_slots`; each save replaces the row inside an
//! immediate transaction. The schema is managed by [`crate::migrations`].

use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::StoreError;

use super::SlotBackend;

pub struct SqliteBackend {
    conn: Connection,
    label: String,
}

impl SqliteBackend {
    /// Open (or create) the database at `path` and apply the schema.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::init(conn, path.display().to_string())
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::init(Connection::open_in_memory()?, ":memory:".to_string())
    }

    fn init(conn: Connection, label: String) -> Result<Self, StoreError> {
        crate::migrations::run_migrations(&conn)?;
        Ok(Self { conn, label })
    }

    /// Borrow the underlying connection for ad-hoc queries.
    pub fn conn_ref(&self) -> &Connection {
        &self.conn
    }

    /// When `slot` was last written, as stored (RFC 3339).
    pub fn updated_at(&self, slot: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT updated_at FROM kv_slots WHERE slot = ?1",
                params![slot],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Copy the live database to `dest` with SQLite's online backup API.
    pub fn backup_to(&self, dest: impl AsRef<Path>) -> Result<PathBuf, StoreError> {
        let dest = dest.as_ref();
        let mut backup_conn = Connection::open(dest)?;
        let backup = rusqlite::backup::Backup::new(&self.conn, &mut backup_conn)?;
        // Small database: copy all pages in one step
        backup.step(-1)?;
        log::info!("Tracker database backed up to {}", dest.display());
        Ok(dest.to_path_buf())
    }
}

impl SlotBackend for SqliteBackend {
    fn read_slot(&self, slot: &str) -> Result<Option<String>, StoreError> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM kv_slots WHERE slot = ?1",
                params![slot],
                |row| row.get(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn write_slot(&mut self, slot: &str, payload: &str) -> Result<(), StoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO kv_slots (slot, payload, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(slot) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at",
            params![slot, payload, Utc::now().to_rfc3339()],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn describe(&self) -> String {
        format!("sqlite:{}", self.label)
    }
}
