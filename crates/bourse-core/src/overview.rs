//! Session-over-session change for the latest session.

use std::collections::HashMap;

use crate::rounding::{rounded_difference, rounded_percent, PERCENT_DP, PRICE_DP};
use crate::{OverviewEntry, TradingSession};

/// Enrich every row of the latest session with `change` and `changePercent`.
///
/// The output has one entry per row of `latest`, in the same order, so it
/// matches the latest-session read row for row; duplicate rows for a code
/// each get an entry. `previous` is `None` when the store holds a single
/// session date, in which case every change is zero. Within `previous`, the
/// first row per code is the baseline.
pub fn compute_overview(
    latest: Vec<TradingSession>,
    previous: Option<&[TradingSession]>,
) -> Vec<OverviewEntry> {
    let baseline = previous.map(first_row_per_code);

    latest
        .into_iter()
        .map(|session| match &baseline {
            Some(baseline) => {
                let prev_close = baseline
                    .get(session.code.as_str())
                    .and_then(|previous| previous.close)
                    .or(session.open)
                    .unwrap_or(0.0);
                let (change, change_percent) = change_against(session.close, prev_close);
                OverviewEntry {
                    session,
                    change,
                    change_percent,
                }
            }
            None => OverviewEntry {
                session,
                change: 0.0,
                change_percent: 0.0,
            },
        })
        .collect()
}

/// `(change, changePercent)` of `close` against `prev_close`.
///
/// A missing close counts as zero. The percentage is taken from the already
/// rounded change.
pub fn change_against(close: Option<f64>, prev_close: f64) -> (f64, f64) {
    let change = rounded_difference(close.unwrap_or(0.0), prev_close, PRICE_DP);
    let change_percent = rounded_percent(change, prev_close, PERCENT_DP);
    (change, change_percent)
}

fn first_row_per_code(rows: &[TradingSession]) -> HashMap<&str, &TradingSession> {
    let mut by_code = HashMap::with_capacity(rows.len());
    for row in rows {
        by_code.entry(row.code.as_str()).or_insert(row);
    }
    by_code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SessionDate;

    fn session(code: &str, date: &str, open: Option<f64>, close: Option<f64>) -> TradingSession {
        TradingSession {
            code: code.to_owned(),
            name: format!("{code} SA"),
            session_date: SessionDate::parse(date).expect("date"),
            open,
            close,
            high: None,
            low: None,
            volume_traded: None,
            capital_traded: None,
            transaction_count: None,
            group: None,
        }
    }

    #[test]
    fn change_against_previous_close() {
        let latest = vec![session("ABC", "2024-01-02", Some(101.0), Some(105.0))];
        let previous = vec![session("ABC", "2024-01-01", Some(99.0), Some(100.0))];

        let entries = compute_overview(latest, Some(&previous));

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].change, 5.0);
        assert_eq!(entries[0].change_percent, 5.0);
    }

    #[test]
    fn falls_back_to_open_when_instrument_is_new() {
        let latest = vec![session("NEW", "2024-01-02", Some(50.0), Some(52.0))];
        let previous = vec![session("ABC", "2024-01-01", Some(99.0), Some(100.0))];

        let entries = compute_overview(latest, Some(&previous));

        assert_eq!(entries[0].change, 2.0);
        assert_eq!(entries[0].change_percent, 4.0);
    }

    #[test]
    fn falls_back_to_open_when_previous_close_is_missing() {
        let latest = vec![session("ABC", "2024-01-02", Some(50.0), Some(52.0))];
        let previous = vec![session("ABC", "2024-01-01", Some(49.0), None)];

        let entries = compute_overview(latest, Some(&previous));

        assert_eq!(entries[0].change, 2.0);
        assert_eq!(entries[0].change_percent, 4.0);
    }

    #[test]
    fn zero_baseline_yields_zero_percent() {
        let latest = vec![session("ABC", "2024-01-02", None, Some(7.5))];
        let previous = vec![session("XYZ", "2024-01-01", None, Some(3.0))];

        let entries = compute_overview(latest, Some(&previous));

        assert_eq!(entries[0].change, 7.5);
        assert_eq!(entries[0].change_percent, 0.0);
    }

    #[test]
    fn missing_close_counts_as_zero() {
        let latest = vec![session("ABC", "2024-01-02", Some(10.0), None)];
        let previous = vec![session("ABC", "2024-01-01", None, Some(10.0))];

        let entries = compute_overview(latest, Some(&previous));

        assert_eq!(entries[0].change, -10.0);
        assert_eq!(entries[0].change_percent, -100.0);
    }

    #[test]
    fn single_session_store_has_no_change() {
        let latest = vec![
            session("ABC", "2024-01-02", Some(10.0), Some(11.0)),
            session("XYZ", "2024-01-02", Some(20.0), Some(19.0)),
        ];

        let entries = compute_overview(latest, None);

        assert!(entries
            .iter()
            .all(|entry| entry.change == 0.0 && entry.change_percent == 0.0));
    }

    #[test]
    fn change_and_percent_are_rounded() {
        let latest = vec![session("ABC", "2024-01-02", None, Some(101.23456))];
        let previous = vec![session("ABC", "2024-01-01", None, Some(100.0))];

        let entries = compute_overview(latest, Some(&previous));

        assert_eq!(entries[0].change, 1.235);
        assert_eq!(entries[0].change_percent, 1.24);
    }

    #[test]
    fn percent_uses_the_rounded_change() {
        let (change, change_percent) = change_against(Some(3.14159 + 100.0), 100.0);
        assert_eq!(change, 3.142);
        assert_eq!(change_percent, 3.14);
    }

    #[test]
    fn duplicate_latest_rows_each_get_an_entry() {
        let latest = vec![
            session("ABC", "2024-01-02", None, Some(110.0)),
            session("ABC", "2024-01-02", None, Some(120.0)),
            session("XYZ", "2024-01-02", None, Some(10.0)),
        ];
        let previous = vec![
            session("ABC", "2024-01-01", None, Some(100.0)),
            session("ABC", "2024-01-01", None, Some(1.0)),
        ];

        let entries = compute_overview(latest, Some(&previous));

        let codes: Vec<&str> = entries
            .iter()
            .map(|entry| entry.session.code.as_str())
            .collect();
        assert_eq!(codes, vec!["ABC", "ABC", "XYZ"]);
        // Both rows are measured against the first previous row.
        assert_eq!((entries[0].change, entries[0].change_percent), (10.0, 10.0));
        assert_eq!((entries[1].change, entries[1].change_percent), (20.0, 20.0));
    }
}
