//! `DuckDB` connection pool management.
//!
//! Every pooled connection is cloned from a single root database handle, so
//! all connections of one manager observe the same database instance.

use std::ops::{Deref, DerefMut};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use ::duckdb::Connection;

/// Access mode for database connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    /// Read-only access.
    ReadOnly,
    /// Read-write access.
    ReadWrite,
}

struct PoolState {
    read_only: Vec<Connection>,
    read_write: Vec<Connection>,
}

impl PoolState {
    fn new() -> Self {
        Self {
            read_only: Vec::new(),
            read_write: Vec::new(),
        }
    }
}

struct PoolInner {
    db_path: PathBuf,
    max_pool_size: usize,
    root: Mutex<Connection>,
    state: Mutex<PoolState>,
}

impl PoolInner {
    fn state(&self) -> MutexGuard<'_, PoolState> {
        // Pool bookkeeping stays consistent even if a holder panicked.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// A connection pool manager for `DuckDB` connections.
#[derive(Clone)]
pub struct DuckDbConnectionManager {
    inner: Arc<PoolInner>,
}

impl DuckDbConnectionManager {
    /// Open the database file and create a pool around it.
    ///
    /// # Arguments
    /// * `path` - Path to the `DuckDB` database file
    /// * `max_pool_size` - Maximum number of idle connections kept per access mode
    ///
    /// # Errors
    /// Returns an error if the database file cannot be opened.
    pub fn new(path: impl Into<PathBuf>, max_pool_size: usize) -> Result<Self, ::duckdb::Error> {
        let db_path = path.into();
        let root = Connection::open(db_path.as_path())?;
        Ok(Self {
            inner: Arc::new(PoolInner {
                db_path,
                max_pool_size: max_pool_size.max(1),
                root: Mutex::new(root),
                state: Mutex::new(PoolState::new()),
            }),
        })
    }

    /// Acquire a connection from the pool.
    ///
    /// # Errors
    /// Returns an error if a new connection cannot be cloned from the root
    /// handle or fails to configure.
    pub fn acquire(&self, mode: AccessMode) -> Result<PooledConnection, ::duckdb::Error> {
        let mut state = self.inner.state();
        let connection = match mode {
            AccessMode::ReadOnly => state.read_only.pop(),
            AccessMode::ReadWrite => state.read_write.pop(),
        };
        drop(state);

        let connection = match connection {
            Some(connection) => connection,
            None => self.open_connection(mode)?,
        };

        Ok(PooledConnection {
            mode,
            pool: Arc::clone(&self.inner),
            connection: Some(connection),
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        self.inner.db_path.as_path()
    }

    /// Number of idle connections currently held for `mode`.
    #[must_use]
    pub fn idle_connections(&self, mode: AccessMode) -> usize {
        let state = self.inner.state();
        match mode {
            AccessMode::ReadOnly => state.read_only.len(),
            AccessMode::ReadWrite => state.read_write.len(),
        }
    }

    fn open_connection(&self, mode: AccessMode) -> Result<Connection, ::duckdb::Error> {
        let root = self
            .inner
            .root
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let connection = root.try_clone()?;
        drop(root);
        configure_connection(&connection, mode)?;
        Ok(connection)
    }
}

/// A pooled connection that returns to the pool when dropped.
pub struct PooledConnection {
    mode: AccessMode,
    pool: Arc<PoolInner>,
    connection: Option<Connection>,
}

impl Deref for PooledConnection {
    type Target = Connection;

    fn deref(&self) -> &Self::Target {
        self.connection
            .as_ref()
            .expect("pooled connection unexpectedly missing")
    }
}

impl DerefMut for PooledConnection {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.connection
            .as_mut()
            .expect("pooled connection unexpectedly missing")
    }
}

impl Drop for PooledConnection {
    fn drop(&mut self) {
        let Some(connection) = self.connection.take() else {
            return;
        };

        let mut state = self.pool.state();
        let idle = match self.mode {
            AccessMode::ReadOnly => &mut state.read_only,
            AccessMode::ReadWrite => &mut state.read_write,
        };
        if idle.len() < self.pool.max_pool_size {
            idle.push(connection);
        }
    }
}

/// Configure a database connection with appropriate settings.
///
/// # Errors
/// Returns an error if configuration SQL fails to execute.
fn configure_connection(connection: &Connection, mode: AccessMode) -> Result<(), ::duckdb::Error> {
    connection.execute_batch("PRAGMA disable_progress_bar;")?;
    if mode == AccessMode::ReadOnly {
        // access_mode is a database-level option; once the database is open the
        // statement fails and the query layer enforces read-only semantics instead.
        let _ = connection.execute_batch("SET access_mode = 'READ_ONLY';");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn released_connections_return_to_their_pool() {
        let temp = tempdir().expect("tempdir");
        let manager =
            DuckDbConnectionManager::new(temp.path().join("pool.duckdb"), 2).expect("manager");

        {
            let _first = manager.acquire(AccessMode::ReadOnly).expect("first");
            let _second = manager.acquire(AccessMode::ReadOnly).expect("second");
            let _third = manager.acquire(AccessMode::ReadOnly).expect("third");
        }

        assert_eq!(manager.idle_connections(AccessMode::ReadOnly), 2);
        assert_eq!(manager.idle_connections(AccessMode::ReadWrite), 0);
    }

    #[test]
    fn cloned_connections_share_one_database() {
        let temp = tempdir().expect("tempdir");
        let manager =
            DuckDbConnectionManager::new(temp.path().join("pool.duckdb"), 1).expect("manager");

        let writer = manager.acquire(AccessMode::ReadWrite).expect("writer");
        writer
            .execute_batch("CREATE TABLE shared (id INTEGER); INSERT INTO shared VALUES (7);")
            .expect("seed");

        let reader = manager.acquire(AccessMode::ReadOnly).expect("reader");
        let id: i32 = reader
            .query_row("SELECT id FROM shared", [], |row| row.get(0))
            .expect("read back");
        assert_eq!(id, 7);
    }
}
