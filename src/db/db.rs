//! Durable store connection management.
//!
//! [`Db`] owns one SQLite connection behind a mutex. The connection is opened
//! lazily: every operation first calls [`Db::init`], so a store that could not
//! be opened at startup is retried on the next call instead of staying dead
//! for the rest of the process.

use super::migrations::{get_db_version, init_with_migrations};
use super::{logs::Logs, singletons::Singleton, Collection};
use crate::libs::error::{Result, TrackerError};
use crate::msg_debug;
use parking_lot::Mutex;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DB_FILE_NAME: &str = "fastslowly.db";

/// Default wait on a lock held by another connection.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_millis(250);

pub struct Db {
    path: PathBuf,
    busy_timeout: Duration,
    conn: Mutex<Option<Connection>>,
}

impl Db {
    /// Creates a handle without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>, busy_timeout: Duration) -> Self {
        Db {
            path: path.into(),
            busy_timeout,
            conn: Mutex::new(None),
        }
    }

    /// Creates a handle and opens the store immediately.
    pub fn open(path: impl Into<PathBuf>, busy_timeout: Duration) -> Result<Self> {
        let db = Self::new(path, busy_timeout);
        db.init()?;
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the connection and applies pending migrations.
    ///
    /// Idempotent: once the connection is open this is a no-op.
    pub fn init(&self) -> Result<()> {
        let mut guard = self.conn.lock();
        if guard.is_none() {
            *guard = Some(self.connect()?);
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.conn.lock().is_some()
    }

    fn connect(&self) -> Result<Connection> {
        msg_debug!(format!("Opening durable store at {}", self.path.display()));
        let mut conn = Connection::open(&self.path)?;
        conn.busy_timeout(self.busy_timeout)?;
        init_with_migrations(&mut conn).map_err(|e| TrackerError::StoreUnavailable(e.to_string()))?;
        Ok(conn)
    }

    /// Runs `op` against the open connection, opening it first if needed.
    ///
    /// Every rusqlite failure surfaces as [`TrackerError::StoreUnavailable`].
    pub fn with_conn<T>(&self, op: impl FnOnce(&mut Connection) -> rusqlite::Result<T>) -> Result<T> {
        let mut guard = self.conn.lock();
        if guard.is_none() {
            *guard = Some(self.connect()?);
        }
        match guard.as_mut() {
            Some(conn) => Ok(op(conn)?),
            None => Err(TrackerError::StoreUnavailable("connection not open".to_string())),
        }
    }

    /// Current schema version (highest applied migration).
    pub fn schema_version(&self) -> Result<u32> {
        let mut guard = self.conn.lock();
        if guard.is_none() {
            *guard = Some(self.connect()?);
        }
        match guard.as_ref() {
            Some(conn) => get_db_version(conn).map_err(|e| TrackerError::StoreUnavailable(e.to_string())),
            None => Err(TrackerError::StoreUnavailable("connection not open".to_string())),
        }
    }

    pub fn logs(&self) -> Logs<'_> {
        Logs::new(self)
    }

    pub fn settings(&self) -> Singleton<'_> {
        Singleton::new(self, Collection::Settings)
    }

    pub fn timer(&self) -> Singleton<'_> {
        Singleton::new(self, Collection::Timer)
    }

    /// Empties a single collection.
    pub fn clear(&self, collection: Collection) -> Result<()> {
        let sql = format!("DELETE FROM {}", collection.table());
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            tx.execute(&sql, [])?;
            tx.commit()
        })
    }

    /// Empties every collection in one transaction: either all of them are
    /// cleared or none is.
    pub fn clear_all(&self) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.transaction()?;
            for collection in Collection::ALL {
                tx.execute(&format!("DELETE FROM {}", collection.table()), [])?;
            }
            tx.commit()
        })
    }
}
