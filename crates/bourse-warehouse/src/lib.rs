//! # Bourse Warehouse
//!
//! DuckDB-backed session store for bourse.
//!
//! ## Overview
//!
//! The warehouse owns the `bvmt_data` table: one row per instrument per
//! trading session, written by an external ingestion pipeline. This crate only
//! reads it, through typed session reads ([`Warehouse::instruments`],
//! [`Warehouse::latest_session`], [`Warehouse::recent_sessions`], ...) that
//! bind every caller value as a query parameter.
//!
//! With the `fixtures` feature, [`Warehouse::insert_sessions`] appends rows so
//! tests can build a store.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bourse_warehouse::Warehouse;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let warehouse = Warehouse::open_default()?;
//!
//!     let latest = warehouse.latest_session()?;
//!     println!("{} rows in the latest session", latest.len());
//!
//!     let status = warehouse.store_status()?;
//!     println!("{} sessions stored", status.session_count);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Tables
//!
//! | Table | Description |
//! |-------|-------------|
//! | `bvmt_data` | Daily trading sessions (`CODE`, `VALEUR`, `SEANCE`, ...) |
//! | `schema_migrations` | Applied schema versions |
//!
//! ## Views
//!
//! | View | Description |
//! |------|-------------|
//! | `vw_instruments` | Distinct codes with a display name |
//! | `vw_session_dates` | Distinct session dates |

pub mod duckdb;
#[cfg(any(test, feature = "fixtures"))]
mod fixtures;
pub mod migrations;
pub mod sessions;
pub mod views;

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use ::duckdb::Connection;
use thiserror::Error;

pub use duckdb::{AccessMode, DuckDbConnectionManager, PooledConnection};
pub use sessions::{InstrumentRecord, SessionPair, SessionRecord, StoreStatusRecord};

/// Errors that can occur during warehouse operations.
#[derive(Debug, Error)]
pub enum WarehouseError {
    /// `DuckDB` database error.
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Configuration for the warehouse database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarehouseConfig {
    /// Root directory for bourse data.
    pub bourse_home: PathBuf,
    /// Path to the `DuckDB` database file.
    pub db_path: PathBuf,
    /// Maximum number of idle connections kept in the pool.
    pub max_pool_size: usize,
}

impl WarehouseConfig {
    /// Configuration rooted at `bourse_home`, with the database file inside it.
    pub fn in_home(bourse_home: impl Into<PathBuf>) -> Self {
        let bourse_home = bourse_home.into();
        let db_path = bourse_home.join("warehouse.duckdb");
        Self {
            bourse_home,
            db_path,
            max_pool_size: 4,
        }
    }
}

impl Default for WarehouseConfig {
    fn default() -> Self {
        Self::in_home(default_bourse_home())
    }
}

/// The session store.
#[derive(Clone)]
pub struct Warehouse {
    manager: DuckDbConnectionManager,
}

impl Warehouse {
    /// Open a warehouse with default configuration.
    pub fn open_default() -> Result<Self, WarehouseError> {
        Self::open(WarehouseConfig::default())
    }

    /// Open a warehouse, creating the parent directory, schema and views as needed.
    pub fn open(config: WarehouseConfig) -> Result<Self, WarehouseError> {
        if let Some(parent) = config.db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let manager = DuckDbConnectionManager::new(config.db_path, config.max_pool_size)?;
        let warehouse = Self { manager };
        warehouse.initialize()?;
        Ok(warehouse)
    }

    /// Apply pending migrations and (re)create the views.
    pub fn initialize(&self) -> Result<(), WarehouseError> {
        let connection = self.manager.acquire(AccessMode::ReadWrite)?;
        migrations::apply_migrations(&connection)?;
        views::create_views(&connection)?;
        Ok(())
    }

    /// Get the path to the database file.
    pub fn db_path(&self) -> &Path {
        self.manager.db_path()
    }
}

/// Finalize a transaction, committing on success or rolling back on failure.
fn finalize_transaction<T>(
    connection: &Connection,
    result: Result<T, WarehouseError>,
) -> Result<T, WarehouseError> {
    match result {
        Ok(value) => {
            connection.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(error) => {
            let _ = connection.execute_batch("ROLLBACK");
            Err(error)
        }
    }
}

/// `$HOME/.bourse`, or `.bourse` in the working directory when `HOME` is unset.
pub fn default_bourse_home() -> PathBuf {
    match env::var_os("HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home).join(".bourse"),
        _ => PathBuf::from(".bourse"),
    }
}
