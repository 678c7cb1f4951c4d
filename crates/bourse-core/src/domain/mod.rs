//! # Domain Models
//!
//! Typed values for the session analytics.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`InstrumentCode`] | Validated instrument code, case kept |
//! | [`SessionDate`] | Trading day, `YYYY-MM-DD` on the wire |
//! | [`SessionRange`] | Inclusive, ordered pair of session dates |
//! | [`TradingSession`] | One instrument's record for one session |
//! | [`Instrument`] | Catalog entry |
//! | [`OverviewEntry`] | Latest session row plus `change` / `changePercent` |
//! | [`StoreStatus`] | Store-wide counts and date span |
//!
//! Values read from the store are decoded here; a stored row that does not
//! decode surfaces as [`CoreError::InvalidStoredRow`](crate::CoreError).

mod code;
mod session;
mod session_date;

pub use code::InstrumentCode;
pub(crate) use session::sessions_from_records;
pub use session::{Instrument, OverviewEntry, StoreStatus, TradingSession};
pub use session_date::{SessionDate, SessionRange};
