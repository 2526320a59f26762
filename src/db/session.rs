//! Connection lifecycle: one short-lived connection per logical operation.
//!
//! `Database` is the connection factory built once at startup and passed to
//! whatever needs storage. It holds only the file path, so it is cheap to
//! clone and safe to share across threads. Each operation acquires a
//! [`Session`]; dropping the session closes the connection, so release
//! happens exactly once on every exit path including `?` early returns
//! and panics.

use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rusqlite::Connection;

use super::{sqlite, DatabaseError};
use crate::config;

#[derive(Debug, Clone)]
pub struct Database {
    path: PathBuf,
    open_sessions: Arc<AtomicUsize>,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            open_sessions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Factory for the configured storage location (see [`config::database_path`]).
    pub fn from_config() -> Self {
        Self::new(config::database_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the storage file (and its directory) if absent and apply any
    /// pending migrations. Idempotent; call once at process start.
    pub fn ensure_schema(&self) -> Result<(), DatabaseError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let session = self.session()?;
        sqlite::ensure_schema(&session)?;
        tracing::info!(path = %self.path.display(), "Database schema ready");
        Ok(())
    }

    /// Acquire a connection for one logical operation.
    pub fn session(&self) -> Result<Session, DatabaseError> {
        let conn = sqlite::open_database(&self.path)?;
        self.open_sessions.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(path = %self.path.display(), "Session acquired");
        Ok(Session {
            conn,
            open_sessions: Arc::clone(&self.open_sessions),
        })
    }

    /// Run `op` against a fresh session, releasing it before returning.
    pub fn run<T, E>(&self, op: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E>
    where
        E: From<DatabaseError>,
    {
        let session = self.session()?;
        op(&*session)
    }

    /// Number of sessions currently held open from this factory.
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }
}

/// A connection scoped to one operation. Derefs to [`Connection`].
pub struct Session {
    conn: Connection,
    open_sessions: Arc<AtomicUsize>,
}

impl Deref for Session {
    type Target = Connection;

    fn deref(&self) -> &Connection {
        &self.conn
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.open_sessions.fetch_sub(1, Ordering::SeqCst);
        tracing::debug!("Session released");
    }
}
