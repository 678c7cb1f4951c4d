use bourse_warehouse::{InstrumentRecord, SessionRecord, StoreStatusRecord};
use serde::{Deserialize, Serialize};

use crate::{CoreError, SessionDate};

/// One instrument's aggregated record for one trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingSession {
    pub code: String,
    pub name: String,
    pub session_date: SessionDate,
    pub open: Option<f64>,
    pub close: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub volume_traded: Option<i64>,
    pub capital_traded: Option<f64>,
    pub transaction_count: Option<i64>,
    pub group: Option<String>,
}

impl TryFrom<SessionRecord> for TradingSession {
    type Error = CoreError;

    fn try_from(record: SessionRecord) -> Result<Self, Self::Error> {
        let session_date = SessionDate::parse(&record.session_date).map_err(|error| {
            CoreError::InvalidStoredRow {
                code: record.code.clone(),
                reason: error.to_string(),
            }
        })?;

        Ok(Self {
            code: record.code,
            name: record.name,
            session_date,
            open: record.open,
            close: record.close,
            high: record.high,
            low: record.low,
            volume_traded: record.volume_traded,
            capital_traded: record.capital_traded,
            transaction_count: record.transaction_count,
            group: record.group,
        })
    }
}

/// Decode a batch of stored rows, failing on the first malformed one.
pub(crate) fn sessions_from_records(
    records: Vec<SessionRecord>,
) -> Result<Vec<TradingSession>, CoreError> {
    records.into_iter().map(TradingSession::try_from).collect()
}

/// A tradable instrument in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub code: String,
    pub name: String,
}

impl From<InstrumentRecord> for Instrument {
    fn from(record: InstrumentRecord) -> Self {
        Self {
            code: record.code,
            name: record.name,
        }
    }
}

/// A latest-session row enriched with its change against the previous session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverviewEntry {
    #[serde(flatten)]
    pub session: TradingSession,
    pub change: f64,
    pub change_percent: f64,
}

/// Diagnostic counts over the whole store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreStatus {
    pub row_count: u64,
    pub instrument_count: u64,
    pub session_count: u64,
    pub first_session: Option<SessionDate>,
    pub last_session: Option<SessionDate>,
}

impl TryFrom<StoreStatusRecord> for StoreStatus {
    type Error = CoreError;

    fn try_from(record: StoreStatusRecord) -> Result<Self, Self::Error> {
        let parse_bound = |value: Option<String>| {
            value
                .map(|date| {
                    SessionDate::parse(&date).map_err(|error| CoreError::InvalidStoredRow {
                        code: String::from("*"),
                        reason: error.to_string(),
                    })
                })
                .transpose()
        };

        Ok(Self {
            row_count: non_negative(record.row_count),
            instrument_count: non_negative(record.instrument_count),
            session_count: non_negative(record.session_count),
            first_session: parse_bound(record.first_session)?,
            last_session: parse_bound(record.last_session)?,
        })
    }
}

fn non_negative(count: i64) -> u64 {
    u64::try_from(count).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(session_date: &str) -> SessionRecord {
        SessionRecord {
            code: String::from("SFBT"),
            name: String::from("SFBT"),
            session_date: session_date.to_owned(),
            open: Some(19.5),
            close: Some(19.8),
            high: Some(19.9),
            low: Some(19.4),
            volume_traded: Some(1_200),
            capital_traded: Some(23_760.0),
            transaction_count: Some(31),
            group: Some(String::from("11")),
        }
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let session = TradingSession::try_from(record("2024-01-03")).expect("decode");
        let json = serde_json::to_value(&session).expect("serialize");

        assert_eq!(json["sessionDate"], "2024-01-03");
        assert_eq!(json["volumeTraded"], 1_200);
        assert_eq!(json["capitalTraded"], 23_760.0);
        assert_eq!(json["transactionCount"], 31);
        assert_eq!(json["group"], "11");
    }

    #[test]
    fn overview_entry_flattens_the_session() {
        let session = TradingSession::try_from(record("2024-01-03")).expect("decode");
        let entry = OverviewEntry {
            session,
            change: 0.3,
            change_percent: 1.54,
        };
        let json = serde_json::to_value(&entry).expect("serialize");

        assert_eq!(json["code"], "SFBT");
        assert_eq!(json["close"], 19.8);
        assert_eq!(json["changePercent"], 1.54);
        assert!(json.get("session").is_none());
    }

    #[test]
    fn store_status_uses_the_same_key_style() {
        let status = StoreStatus::try_from(StoreStatusRecord {
            row_count: 4,
            instrument_count: 2,
            session_count: 2,
            first_session: Some(String::from("2024-01-02")),
            last_session: Some(String::from("2024-01-03")),
        })
        .expect("decode");
        let json = serde_json::to_value(&status).expect("serialize");

        assert_eq!(json["rowCount"], 4);
        assert_eq!(json["lastSession"], "2024-01-03");
        assert!(json.get("row_count").is_none());
    }

    #[test]
    fn malformed_stored_date_is_reported_with_its_code() {
        let err = TradingSession::try_from(record("03/01/2024")).expect_err("must fail");
        assert!(matches!(err, CoreError::InvalidStoredRow { ref code, .. } if code == "SFBT"));
    }
}
