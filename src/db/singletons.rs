//! Single-record collections stored as JSON documents.
//!
//! Settings and timer state each live under one fixed key. The document is
//! kept as text so a partially populated or empty object survives a round
//! trip unchanged; the facade relies on that to tell "nothing useful stored"
//! apart from real state.

use super::db::Db;
use super::Collection;
use crate::libs::error::{Result, TrackerError};
use rusqlite::{params, OptionalExtension};
use serde_json::Value;

pub struct Singleton<'a> {
    db: &'a Db,
    collection: Collection,
}

impl<'a> Singleton<'a> {
    pub fn new(db: &'a Db, collection: Collection) -> Self {
        Singleton { db, collection }
    }

    fn key(&self) -> &'static str {
        self.collection.singleton_key().unwrap_or_default()
    }

    /// Replaces the stored document.
    pub fn put(&self, value: &Value) -> Result<()> {
        let json = serde_json::to_string(value)?;
        let sql = format!(
            "INSERT INTO {table} ({key_col}, value) VALUES (?1, ?2)
             ON CONFLICT({key_col}) DO UPDATE SET value = excluded.value",
            table = self.collection.table(),
            key_col = self.collection.key_column(),
        );
        self.db.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute(&sql, params![self.key(), json])?;
            tx.commit()
        })
    }

    /// The stored document, or `None` when nothing was ever saved.
    pub fn get(&self) -> Result<Option<Value>> {
        let sql = format!(
            "SELECT value FROM {} WHERE {} = ?1",
            self.collection.table(),
            self.collection.key_column()
        );
        let raw: Option<String> = self
            .db
            .with_conn(|conn| conn.query_row(&sql, [self.key()], |row| row.get(0)).optional())?;

        match raw {
            Some(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|e| TrackerError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    pub fn clear(&self) -> Result<()> {
        self.db.clear(self.collection)
    }
}
