use bourse_warehouse::{
    InstrumentRecord, SessionPair, SessionRecord, StoreStatusRecord, Warehouse, WarehouseError,
};

/// Read access to the session table.
///
/// Dates cross this seam as `YYYY-MM-DD` strings; decoding into domain types
/// happens in [`MarketService`](crate::MarketService).
pub trait SessionStore {
    /// Distinct instruments ordered by code.
    fn instruments(&self) -> Result<Vec<InstrumentRecord>, WarehouseError>;

    /// Distinct session dates, newest first.
    fn session_dates(&self) -> Result<Vec<String>, WarehouseError>;

    /// Every row of the newest session, ordered by code then storage order.
    fn latest_session(&self) -> Result<Vec<SessionRecord>, WarehouseError>;

    /// The newest `limit` rows for `code`, newest first.
    fn recent_sessions(&self, code: &str, limit: usize)
        -> Result<Vec<SessionRecord>, WarehouseError>;

    /// The oldest `limit` rows for `code`, oldest first.
    fn earliest_sessions(
        &self,
        code: &str,
        limit: usize,
    ) -> Result<Vec<SessionRecord>, WarehouseError>;

    /// Rows for `code` between two inclusive dates, oldest first.
    fn sessions_between(
        &self,
        code: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<SessionRecord>, WarehouseError>;

    /// The two newest sessions, read from one snapshot.
    fn latest_session_pair(&self) -> Result<SessionPair, WarehouseError>;

    fn store_status(&self) -> Result<StoreStatusRecord, WarehouseError>;
}

impl SessionStore for Warehouse {
    fn instruments(&self) -> Result<Vec<InstrumentRecord>, WarehouseError> {
        Warehouse::instruments(self)
    }

    fn session_dates(&self) -> Result<Vec<String>, WarehouseError> {
        Warehouse::session_dates(self)
    }

    fn latest_session(&self) -> Result<Vec<SessionRecord>, WarehouseError> {
        Warehouse::latest_session(self)
    }

    fn recent_sessions(
        &self,
        code: &str,
        limit: usize,
    ) -> Result<Vec<SessionRecord>, WarehouseError> {
        Warehouse::recent_sessions(self, code, limit)
    }

    fn earliest_sessions(
        &self,
        code: &str,
        limit: usize,
    ) -> Result<Vec<SessionRecord>, WarehouseError> {
        Warehouse::earliest_sessions(self, code, limit)
    }

    fn sessions_between(
        &self,
        code: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<SessionRecord>, WarehouseError> {
        Warehouse::sessions_between(self, code, start, end)
    }

    fn latest_session_pair(&self) -> Result<SessionPair, WarehouseError> {
        Warehouse::latest_session_pair(self)
    }

    fn store_status(&self) -> Result<StoreStatusRecord, WarehouseError> {
        Warehouse::store_status(self)
    }
}
