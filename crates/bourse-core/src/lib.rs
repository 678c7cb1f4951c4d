//! # Bourse Core
//!
//! Read-only analytics over daily exchange trading sessions.
//!
//! ## Overview
//!
//! - **Domain types**: validated [`InstrumentCode`], [`SessionDate`] and
//!   [`SessionRange`], plus the [`TradingSession`] row shape served to callers
//! - **Market service**: [`MarketService`] answers catalog, calendar, latest
//!   session, history, range, overview, summary and status reads over any
//!   [`SessionStore`]
//! - **Overview calculator**: session-over-session `change` and
//!   `changePercent`, rounded half away from zero in decimal arithmetic
//! - **Configuration**: [`BourseConfig`] built once from the `BOURSE_*`
//!   environment keys
//! - **Response envelope** shared by the command-line output
//!
//! The crate does no I/O of its own beyond the store and never logs; callers
//! decide how to report failures.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use bourse_core::{InstrumentCode, MarketService, Warehouse, DEFAULT_HISTORY_DAYS};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let service = MarketService::new(Warehouse::open_default()?);
//!
//!     for entry in service.overview()? {
//!         println!("{} {:+.2}%", entry.session.code, entry.change_percent);
//!     }
//!
//!     let code = InstrumentCode::parse("SFBT")?;
//!     let history = service.stock_history(&code, DEFAULT_HISTORY_DAYS)?;
//!     println!("{} sessions", history.len());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod overview;
pub mod rounding;
pub mod service;
pub mod store;
pub mod summary;

pub use bourse_warehouse::{Warehouse, WarehouseConfig, WarehouseError};
pub use config::{BourseConfig, CollaboratorUrls, ConfigError, ConfigKey, ServerConfig};
pub use domain::{
    Instrument, InstrumentCode, OverviewEntry, SessionDate, SessionRange, StoreStatus,
    TradingSession,
};
pub use envelope::{Envelope, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{CoreError, ValidationError};
pub use service::{MarketService, DEFAULT_HISTORY_DAYS};
pub use store::SessionStore;
pub use summary::{MarketSummary, Mover, DEFAULT_TOP_MOVERS};
