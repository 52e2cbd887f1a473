//! SQLite database management

use rusqlite::{Connection, TransactionBehavior};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use super::migrations;

/// How long a short-lived connection waits on a locked database
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Failed to create data directory: {0}")]
    CreateDir(std::io::Error),
}

/// Handle to the on-disk Pokemon database.
///
/// No connection is held between calls: every operation opens its own
/// connection and closes it when the operation returns.
#[derive(Clone)]
pub struct Database {
    /// Path to the database file
    pub path: PathBuf,
}

impl Database {
    /// Open or create a database at the specified path
    pub fn open(path: PathBuf) -> Result<Self, DatabaseError> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(DatabaseError::CreateDir)?;
        }

        let db = Self { path };
        let mut conn = db.connect()?;
        migrations::run_migrations(&mut conn)?;

        Ok(db)
    }

    /// Open database in the default location (~/.pocket-battle/pokemon.db)
    pub fn open_default() -> Result<Self, DatabaseError> {
        Self::open(crate::util::DataFile::Database.path())
    }

    fn connect(&self) -> Result<Connection, DatabaseError> {
        let conn = Connection::open(&self.path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    /// Execute a closure with a fresh connection
    pub fn with_connection<F, T>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = self.connect()?;
        f(&conn).map_err(DatabaseError::Sqlite)
    }

    /// Execute a closure inside a transaction on a fresh connection.
    ///
    /// The write lock is taken when the transaction begins, so a concurrent
    /// writer waits on `BUSY_TIMEOUT` instead of failing mid-way. The
    /// transaction commits only if the closure succeeds; the connection is
    /// closed before this returns either way.
    pub fn with_transaction<F, T>(&self, f: F) -> Result<T, DatabaseError>
    where
        F: FnOnce(&rusqlite::Transaction<'_>) -> rusqlite::Result<T>,
    {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("path", &self.path)
            .finish()
    }
}
