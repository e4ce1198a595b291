//! SQLite-backed key-value store.
//!
//! Holds the serialized favorites/recents slots in a single `kv_store` table.

use crate::store::KeyValueStore;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::{debug, info};

/// Current schema version (stored in `PRAGMA user_version`)
const SCHEMA_VERSION: i32 = 1;

/// Key-value store on top of a SQLite connection
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open or create a store at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        debug!(path = %path.display(), "Opening library database");

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database at {}", path.display()))?;

        Self::with_connection(conn)
    }

    /// Open a store that lives only in memory
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::with_connection(conn)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        let store = Self { conn };

        if store.get_version()? < SCHEMA_VERSION {
            info!("Creating library database schema");
            store
                .conn
                .execute_batch(include_str!("../schema.sql"))
                .context("Failed to create database schema")?;
        }

        Ok(store)
    }

    /// Get the database version (from user_version pragma)
    pub fn get_version(&self) -> Result<i32> {
        let version: i32 = self
            .conn
            .query_row("PRAGMA user_version", [], |row| row.get(0))?;
        Ok(version)
    }

    /// When the value under `key` was last written
    pub fn updated_at(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        self.conn
            .query_row(
                "SELECT updated_at FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read timestamp for key {}", key))
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
            .with_context(|| format!("Failed to read key {}", key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.conn
            .execute(
                "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
                params![key, value, Utc::now()],
            )
            .with_context(|| format!("Failed to write key {}", key))?;

        debug!(key = key, bytes = value.len(), "Stored value");
        Ok(())
    }
}
