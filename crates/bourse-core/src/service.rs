use bourse_warehouse::Warehouse;

use crate::domain::sessions_from_records;
use crate::overview::compute_overview;
use crate::store::SessionStore;
use crate::summary::{summarize, MarketSummary};
use crate::{
    CoreError, Instrument, InstrumentCode, OverviewEntry, SessionDate, SessionRange, StoreStatus,
    TradingSession,
};

/// Sessions returned by [`MarketService::stock_history`] when the caller does
/// not choose a window.
pub const DEFAULT_HISTORY_DAYS: usize = 90;

/// Read-only analytics over the session store.
///
/// Every call is independent: nothing is cached and no state is kept between
/// calls. No-data conditions yield empty results, never errors.
#[derive(Debug, Clone)]
pub struct MarketService<S = Warehouse> {
    store: S,
}

impl<S: SessionStore> MarketService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Distinct instruments ordered by code.
    pub fn instruments(&self) -> Result<Vec<Instrument>, CoreError> {
        Ok(self
            .store
            .instruments()?
            .into_iter()
            .map(Instrument::from)
            .collect())
    }

    /// Distinct session dates, strictly descending.
    pub fn session_dates(&self) -> Result<Vec<SessionDate>, CoreError> {
        self.store
            .session_dates()?
            .iter()
            .map(|date| {
                SessionDate::parse(date).map_err(|error| CoreError::InvalidStoredRow {
                    code: String::from("*"),
                    reason: error.to_string(),
                })
            })
            .collect()
    }

    /// Every row of the newest session, ordered by code.
    pub fn latest_session(&self) -> Result<Vec<TradingSession>, CoreError> {
        sessions_from_records(self.store.latest_session()?)
    }

    /// The newest `days` sessions of `code`, oldest first.
    pub fn stock_history(
        &self,
        code: &InstrumentCode,
        days: usize,
    ) -> Result<Vec<TradingSession>, CoreError> {
        if days == 0 {
            return Ok(Vec::new());
        }

        let mut sessions =
            sessions_from_records(self.store.recent_sessions(code.as_str(), days)?)?;
        sessions.reverse();
        Ok(sessions)
    }

    /// The oldest `limit` sessions of `code`, oldest first.
    pub fn full_history(
        &self,
        code: &InstrumentCode,
        limit: usize,
    ) -> Result<Vec<TradingSession>, CoreError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        sessions_from_records(self.store.earliest_sessions(code.as_str(), limit)?)
    }

    /// Sessions of `code` within `range`, both ends inclusive, oldest first.
    pub fn session_range(
        &self,
        code: &InstrumentCode,
        range: &SessionRange,
    ) -> Result<Vec<TradingSession>, CoreError> {
        let start = range.start().format_iso();
        let end = range.end().format_iso();
        sessions_from_records(self.store.sessions_between(code.as_str(), &start, &end)?)
    }

    /// The latest session with `change` and `changePercent` per instrument.
    pub fn overview(&self) -> Result<Vec<OverviewEntry>, CoreError> {
        let pair = self.store.latest_session_pair()?;
        if pair.latest_date.is_none() {
            return Ok(Vec::new());
        }

        let latest = sessions_from_records(pair.latest)?;
        let previous = match pair.previous_date {
            Some(_) => Some(sessions_from_records(pair.previous)?),
            None => None,
        };

        Ok(compute_overview(latest, previous.as_deref()))
    }

    /// Breadth, turnover and up to `top` gainers and losers.
    pub fn market_summary(&self, top: usize) -> Result<MarketSummary, CoreError> {
        Ok(summarize(&self.overview()?, top))
    }

    pub fn store_status(&self) -> Result<StoreStatus, CoreError> {
        StoreStatus::try_from(self.store.store_status()?)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use bourse_warehouse::{
        InstrumentRecord, SessionPair, SessionRecord, StoreStatusRecord, WarehouseError,
    };

    use super::*;

    /// In-memory store holding rows in insertion order.
    #[derive(Default)]
    struct MemoryStore {
        rows: Vec<SessionRecord>,
        reads: Cell<usize>,
        unavailable: bool,
    }

    impl MemoryStore {
        fn with_rows(rows: Vec<SessionRecord>) -> Self {
            Self {
                rows,
                ..Self::default()
            }
        }

        fn read(&self) -> Result<(), WarehouseError> {
            self.reads.set(self.reads.get() + 1);
            if self.unavailable {
                return Err(WarehouseError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotConnected,
                    "store offline",
                )));
            }
            Ok(())
        }

        fn ordered(&self) -> Vec<SessionRecord> {
            let mut rows = self.rows.clone();
            rows.sort_by(|left, right| {
                (left.code.as_str(), left.session_date.as_str())
                    .cmp(&(right.code.as_str(), right.session_date.as_str()))
            });
            rows
        }

        fn dates(&self) -> Vec<String> {
            let mut dates: Vec<String> =
                self.rows.iter().map(|row| row.session_date.clone()).collect();
            dates.sort_by(|left, right| right.cmp(left));
            dates.dedup();
            dates
        }

        fn rows_on(&self, date: &str) -> Vec<SessionRecord> {
            self.ordered()
                .into_iter()
                .filter(|row| row.session_date == date)
                .collect()
        }
    }

    impl SessionStore for MemoryStore {
        fn instruments(&self) -> Result<Vec<InstrumentRecord>, WarehouseError> {
            self.read()?;
            let mut instruments: Vec<InstrumentRecord> = Vec::new();
            for row in self.ordered() {
                match instruments.last_mut() {
                    Some(last) if last.code == row.code => {
                        if last.name.is_empty() || row.name < last.name {
                            last.name = row.name;
                        }
                    }
                    _ => instruments.push(InstrumentRecord {
                        code: row.code,
                        name: row.name,
                    }),
                }
            }
            Ok(instruments)
        }

        fn session_dates(&self) -> Result<Vec<String>, WarehouseError> {
            self.read()?;
            Ok(self.dates())
        }

        fn latest_session(&self) -> Result<Vec<SessionRecord>, WarehouseError> {
            self.read()?;
            Ok(self
                .dates()
                .first()
                .map(|date| self.rows_on(date))
                .unwrap_or_default())
        }

        fn recent_sessions(
            &self,
            code: &str,
            limit: usize,
        ) -> Result<Vec<SessionRecord>, WarehouseError> {
            self.read()?;
            Ok(self
                .ordered()
                .into_iter()
                .rev()
                .filter(|row| row.code == code)
                .take(limit)
                .collect())
        }

        fn earliest_sessions(
            &self,
            code: &str,
            limit: usize,
        ) -> Result<Vec<SessionRecord>, WarehouseError> {
            self.read()?;
            Ok(self
                .ordered()
                .into_iter()
                .filter(|row| row.code == code)
                .take(limit)
                .collect())
        }

        fn sessions_between(
            &self,
            code: &str,
            start: &str,
            end: &str,
        ) -> Result<Vec<SessionRecord>, WarehouseError> {
            self.read()?;
            Ok(self
                .ordered()
                .into_iter()
                .filter(|row| {
                    row.code == code
                        && row.session_date.as_str() >= start
                        && row.session_date.as_str() <= end
                })
                .collect())
        }

        fn latest_session_pair(&self) -> Result<SessionPair, WarehouseError> {
            self.read()?;
            let dates = self.dates();
            let latest_date = dates.first().cloned();
            let previous_date = dates.get(1).cloned();
            Ok(SessionPair {
                latest: latest_date
                    .as_deref()
                    .map(|date| self.rows_on(date))
                    .unwrap_or_default(),
                previous: previous_date
                    .as_deref()
                    .map(|date| self.rows_on(date))
                    .unwrap_or_default(),
                latest_date,
                previous_date,
            })
        }

        fn store_status(&self) -> Result<StoreStatusRecord, WarehouseError> {
            self.read()?;
            let dates = self.dates();
            let mut codes: Vec<&str> = self.rows.iter().map(|row| row.code.as_str()).collect();
            codes.sort_unstable();
            codes.dedup();
            Ok(StoreStatusRecord {
                row_count: self.rows.len() as i64,
                instrument_count: codes.len() as i64,
                session_count: dates.len() as i64,
                first_session: dates.last().cloned(),
                last_session: dates.first().cloned(),
            })
        }
    }

    fn row(code: &str, date: &str, open: Option<f64>, close: Option<f64>) -> SessionRecord {
        SessionRecord {
            code: code.to_owned(),
            name: format!("{code} SA"),
            session_date: date.to_owned(),
            open,
            close,
            high: None,
            low: None,
            volume_traded: Some(10),
            capital_traded: Some(100.0),
            transaction_count: Some(1),
            group: None,
        }
    }

    fn code(value: &str) -> InstrumentCode {
        InstrumentCode::parse(value).expect("code")
    }

    fn dates_of(sessions: &[TradingSession]) -> Vec<String> {
        sessions
            .iter()
            .map(|session| session.session_date.to_string())
            .collect()
    }

    fn daily_rows(code: &str, days: u32) -> Vec<SessionRecord> {
        (1..=days)
            .map(|day| row(code, &format!("2024-01-{day:02}"), None, Some(f64::from(day))))
            .collect()
    }

    #[test]
    fn history_returns_the_newest_sessions_oldest_first() {
        let service = MarketService::new(MemoryStore::with_rows(daily_rows("ABC", 10)));

        let history = service.stock_history(&code("ABC"), 3).expect("history");

        assert_eq!(
            dates_of(&history),
            vec!["2024-01-08", "2024-01-09", "2024-01-10"]
        );
    }

    #[test]
    fn history_shorter_than_window_returns_everything() {
        let service = MarketService::new(MemoryStore::with_rows(daily_rows("ABC", 4)));

        let history = service
            .stock_history(&code("ABC"), DEFAULT_HISTORY_DAYS)
            .expect("history");

        assert_eq!(history.len(), 4);
        assert_eq!(history[0].session_date.to_string(), "2024-01-01");
    }

    #[test]
    fn zero_window_skips_the_store() {
        let service = MarketService::new(MemoryStore::with_rows(daily_rows("ABC", 4)));

        assert!(service.stock_history(&code("ABC"), 0).expect("history").is_empty());
        assert!(service.full_history(&code("ABC"), 0).expect("full").is_empty());
        assert_eq!(service.store().reads.get(), 0);
    }

    #[test]
    fn full_history_keeps_the_oldest_sessions() {
        let service = MarketService::new(MemoryStore::with_rows(daily_rows("ABC", 10)));

        let history = service.full_history(&code("ABC"), 2).expect("full history");

        assert_eq!(dates_of(&history), vec!["2024-01-01", "2024-01-02"]);
    }

    #[test]
    fn unknown_code_has_no_history() {
        let service = MarketService::new(MemoryStore::with_rows(daily_rows("ABC", 3)));
        assert!(service.stock_history(&code("ZZZ"), 5).expect("history").is_empty());
    }

    #[test]
    fn range_is_inclusive_on_both_ends() {
        let service = MarketService::new(MemoryStore::with_rows(daily_rows("ABC", 10)));
        let range = SessionRange::parse("2024-01-03", "2024-01-05").expect("range");

        let sessions = service.session_range(&code("ABC"), &range).expect("range");

        assert_eq!(
            dates_of(&sessions),
            vec!["2024-01-03", "2024-01-04", "2024-01-05"]
        );
    }

    #[test]
    fn overview_compares_against_the_previous_session() {
        let service = MarketService::new(MemoryStore::with_rows(vec![
            row("ABC", "2024-01-01", Some(99.0), Some(100.0)),
            row("ABC", "2024-01-02", Some(101.0), Some(105.0)),
            row("NEW", "2024-01-02", Some(50.0), Some(52.0)),
        ]));

        let overview = service.overview().expect("overview");

        assert_eq!(overview.len(), 2);
        assert_eq!(overview[0].session.code, "ABC");
        assert_eq!((overview[0].change, overview[0].change_percent), (5.0, 5.0));
        assert_eq!(overview[1].session.code, "NEW");
        assert_eq!((overview[1].change, overview[1].change_percent), (2.0, 4.0));
    }

    #[test]
    fn overview_is_idempotent() {
        let service = MarketService::new(MemoryStore::with_rows(vec![
            row("ABC", "2024-01-01", None, Some(10.0)),
            row("ABC", "2024-01-02", None, Some(11.0)),
        ]));

        let first = service.overview().expect("first");
        let second = service.overview().expect("second");

        assert_eq!(first, second);
    }

    #[test]
    fn empty_store_yields_empty_results() {
        let service = MarketService::new(MemoryStore::default());

        assert!(service.instruments().expect("instruments").is_empty());
        assert!(service.session_dates().expect("dates").is_empty());
        assert!(service.latest_session().expect("latest").is_empty());
        assert!(service.overview().expect("overview").is_empty());
        assert_eq!(
            service.market_summary(5).expect("summary"),
            MarketSummary::default()
        );

        let status = service.store_status().expect("status");
        assert_eq!(status.row_count, 0);
        assert_eq!(status.first_session, None);
    }

    #[test]
    fn catalog_takes_the_smallest_name_per_code() {
        let mut renamed = row("ABC", "2024-01-02", None, None);
        renamed.name = String::from("AAA Holding");
        let service = MarketService::new(MemoryStore::with_rows(vec![
            row("XYZ", "2024-01-01", None, None),
            row("ABC", "2024-01-01", None, None),
            renamed,
        ]));

        let instruments = service.instruments().expect("instruments");

        assert_eq!(
            instruments,
            vec![
                Instrument {
                    code: String::from("ABC"),
                    name: String::from("AAA Holding"),
                },
                Instrument {
                    code: String::from("XYZ"),
                    name: String::from("XYZ SA"),
                },
            ]
        );
    }

    #[test]
    fn catalog_codes_find_their_own_history() {
        let service = MarketService::new(MemoryStore::with_rows(daily_rows("abc", 2)));

        for instrument in service.instruments().expect("instruments") {
            let history = service
                .stock_history(&code(&instrument.code), DEFAULT_HISTORY_DAYS)
                .expect("history");
            assert_eq!(history.len(), 2);
        }
        assert!(service
            .stock_history(&code("ABC"), DEFAULT_HISTORY_DAYS)
            .expect("history")
            .is_empty());
    }

    #[test]
    fn store_failures_propagate_unchanged() {
        let service = MarketService::new(MemoryStore {
            unavailable: true,
            ..MemoryStore::default()
        });

        let err = service.overview().expect_err("must fail");
        assert!(matches!(err, CoreError::Store(WarehouseError::Io(_))));
    }

    #[test]
    fn summary_ranks_the_overview() {
        let service = MarketService::new(MemoryStore::with_rows(vec![
            row("ABC", "2024-01-01", None, Some(100.0)),
            row("XYZ", "2024-01-01", None, Some(100.0)),
            row("ABC", "2024-01-02", None, Some(110.0)),
            row("XYZ", "2024-01-02", None, Some(90.0)),
        ]));

        let summary = service.market_summary(5).expect("summary");

        assert_eq!((summary.advancing, summary.declining), (1, 1));
        assert_eq!(summary.total_volume, 20);
        assert_eq!(summary.top_gainers[0].code, "ABC");
        assert_eq!(summary.top_losers[0].code, "XYZ");
    }
}
