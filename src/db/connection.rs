//! Database connection management
//!
//! SQLite pool for the recipe store, backed by a file or by memory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

/// Database error types
#[derive(Debug, Error)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] r2d2::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for database operations
pub type DbResult<T> = Result<T, DbError>;

/// Pool size for file-backed stores
const FILE_POOL_SIZE: u32 = 10;

/// Where the recipe store lives
#[derive(Debug, Clone)]
enum StoreLocation {
    File(PathBuf),
    /// Each in-memory connection is its own database, so the pool holds one
    Memory,
}

impl StoreLocation {
    fn manager(&self) -> SqliteConnectionManager {
        match self {
            StoreLocation::File(path) => SqliteConnectionManager::file(path).with_flags(
                OpenFlags::SQLITE_OPEN_READ_WRITE
                    | OpenFlags::SQLITE_OPEN_CREATE
                    | OpenFlags::SQLITE_OPEN_URI,
            ),
            StoreLocation::Memory => SqliteConnectionManager::memory(),
        }
    }

    fn pool_size(&self) -> u32 {
        match self {
            StoreLocation::File(_) => FILE_POOL_SIZE,
            StoreLocation::Memory => 1,
        }
    }

    fn is_file(&self) -> bool {
        matches!(self, StoreLocation::File(_))
    }
}

/// Pragmas applied to every new connection
fn configure(conn: &mut Connection, write_ahead_log: bool) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", "ON")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.pragma_update(None, "temp_store", "MEMORY")?;
    if write_ahead_log {
        // journal_mode reports the resulting mode as a row
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;
    }
    Ok(())
}

/// Database connection pool wrapper
#[derive(Clone)]
pub struct Database {
    pool: Arc<Pool<SqliteConnectionManager>>,
}

impl Database {
    /// Open (or create) a file-backed recipe store
    pub fn new<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        Self::open(StoreLocation::File(path.as_ref().to_path_buf()))
    }

    /// Open a private in-memory store
    pub fn in_memory() -> DbResult<Self> {
        Self::open(StoreLocation::Memory)
    }

    fn open(location: StoreLocation) -> DbResult<Self> {
        let wal = location.is_file();
        let manager = location.manager().with_init(move |conn| configure(conn, wal));
        let pool = Pool::builder()
            .max_size(location.pool_size())
            .build(manager)?;
        tracing::debug!("Opened {:?} store with {} connection(s)", location, location.pool_size());

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Get a connection from the pool
    pub fn get_conn(&self) -> DbResult<PooledConnection<SqliteConnectionManager>> {
        Ok(self.pool.get()?)
    }

    /// Execute a closure with a database connection
    pub fn with_conn<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&Connection) -> DbResult<T>,
    {
        let conn = self.get_conn()?;
        f(&conn)
    }

    /// Execute a closure with a mutable database connection (for transactions)
    pub fn with_conn_mut<F, T>(&self, f: F) -> DbResult<T>
    where
        F: FnOnce(&mut Connection) -> DbResult<T>,
    {
        let mut conn = self.get_conn()?;
        f(&mut conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_enforces_foreign_keys() {
        let db = Database::in_memory().unwrap();
        let enabled: i64 = db
            .with_conn(|conn| Ok(conn.query_row("PRAGMA foreign_keys", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(enabled, 1);
    }

    #[test]
    fn test_in_memory_state_is_shared_across_calls() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| {
            conn.execute("CREATE TABLE t (v INTEGER)", [])?;
            conn.execute("INSERT INTO t (v) VALUES (7)", [])?;
            Ok(())
        })
        .unwrap();

        let v: i64 = db
            .with_conn(|conn| Ok(conn.query_row("SELECT v FROM t", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(v, 7);
    }

    #[test]
    fn test_transaction_rolls_back_on_drop() {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| Ok(conn.execute("CREATE TABLE t (v INTEGER)", []).map(|_| ())?))
            .unwrap();

        db.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute("INSERT INTO t (v) VALUES (1)", [])?;
            Ok(())
        })
        .unwrap();

        let count: i64 = db
            .with_conn(|conn| Ok(conn.query_row("SELECT COUNT(*) FROM t", [], |row| row.get(0))?))
            .unwrap();
        assert_eq!(count, 0);
    }
}
