//! Typed reads over `bvmt_data`.
//!
//! Storage order is `("CODE", "SEANCE", rowid)`; `rowid` follows insertion
//! order, so rows sharing a `(code, date)` key always come back in the order
//! they were written.

use ::duckdb::{Connection, Row, ToSql};
use serde::Serialize;

use crate::{finalize_transaction, AccessMode, Warehouse, WarehouseError};

const SESSION_COLUMNS: &str = r#"
    "CODE",
    COALESCE("VALEUR", '') AS "VALEUR",
    CAST("SEANCE" AS VARCHAR) AS "SEANCE",
    CAST("OUVERTURE" AS DOUBLE) AS "OUVERTURE",
    CAST("CLOTURE" AS DOUBLE) AS "CLOTURE",
    CAST("PLUS_HAUT" AS DOUBLE) AS "PLUS_HAUT",
    CAST("PLUS_BAS" AS DOUBLE) AS "PLUS_BAS",
    CAST("QUANTITE_NEGOCIEE" AS BIGINT) AS "QUANTITE_NEGOCIEE",
    CAST("CAPITAUX" AS DOUBLE) AS "CAPITAUX",
    CAST("NB_TRANSACTION" AS BIGINT) AS "NB_TRANSACTION",
    CAST("GROUPE" AS VARCHAR) AS "GROUPE"
"#;

/// One stored session row, as read from `bvmt_data`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRecord {
    pub code: String,
    pub name: String,
    /// `SEANCE` rendered as `YYYY-MM-DD`.
    pub session_date: String,
    pub open: Option<f64>,
    pub close: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub volume_traded: Option<i64>,
    pub capital_traded: Option<f64>,
    pub transaction_count: Option<i64>,
    pub group: Option<String>,
}

/// A distinct instrument code with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstrumentRecord {
    pub code: String,
    pub name: String,
}

/// The two most recent sessions, read inside one transaction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionPair {
    pub latest_date: Option<String>,
    pub latest: Vec<SessionRecord>,
    pub previous_date: Option<String>,
    pub previous: Vec<SessionRecord>,
}

/// Aggregate counts over the whole store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStatusRecord {
    pub row_count: i64,
    pub instrument_count: i64,
    pub session_count: i64,
    pub first_session: Option<String>,
    pub last_session: Option<String>,
}

impl Warehouse {
    /// Distinct instruments ordered by code.
    pub fn instruments(&self) -> Result<Vec<InstrumentRecord>, WarehouseError> {
        let connection = self.manager.acquire(AccessMode::ReadOnly)?;
        let mut statement =
            connection.prepare("SELECT code, name FROM vw_instruments ORDER BY code")?;
        let instruments = statement
            .query_map([] as [&dyn ToSql; 0], |row| {
                Ok(InstrumentRecord {
                    code: row.get(0)?,
                    name: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(instruments)
    }

    /// Distinct session dates, most recent first.
    pub fn session_dates(&self) -> Result<Vec<String>, WarehouseError> {
        let connection = self.manager.acquire(AccessMode::ReadOnly)?;
        Ok(read_session_dates(&connection, None)?)
    }

    /// Every row of the most recent session, ordered by code.
    ///
    /// The max-date resolution and the fetch run as one statement, so the
    /// rows always belong to a single session date.
    pub fn latest_session(&self) -> Result<Vec<SessionRecord>, WarehouseError> {
        let connection = self.manager.acquire(AccessMode::ReadOnly)?;
        let sql = format!(
            r#"SELECT {SESSION_COLUMNS} FROM bvmt_data
               WHERE "SEANCE" = (SELECT MAX("SEANCE") FROM bvmt_data)
               ORDER BY "CODE", rowid"#
        );
        let mut statement = connection.prepare(sql.as_str())?;
        let rows = statement
            .query_map([] as [&dyn ToSql; 0], read_session)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// The newest `limit` rows for `code`, most recent first.
    pub fn recent_sessions(
        &self,
        code: &str,
        limit: usize,
    ) -> Result<Vec<SessionRecord>, WarehouseError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let connection = self.manager.acquire(AccessMode::ReadOnly)?;
        let sql = format!(
            r#"SELECT {SESSION_COLUMNS} FROM bvmt_data
               WHERE "CODE" = ?
               ORDER BY "SEANCE" DESC, rowid DESC
               LIMIT ?"#
        );
        let limit = sql_limit(limit);
        let params: [&dyn ToSql; 2] = [&code, &limit];
        let mut statement = connection.prepare(sql.as_str())?;
        let rows = statement
            .query_map(params.as_slice(), read_session)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// The oldest `limit` rows for `code`, oldest first.
    pub fn earliest_sessions(
        &self,
        code: &str,
        limit: usize,
    ) -> Result<Vec<SessionRecord>, WarehouseError> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let connection = self.manager.acquire(AccessMode::ReadOnly)?;
        let sql = format!(
            r#"SELECT {SESSION_COLUMNS} FROM bvmt_data
               WHERE "CODE" = ?
               ORDER BY "SEANCE" ASC, rowid ASC
               LIMIT ?"#
        );
        let limit = sql_limit(limit);
        let params: [&dyn ToSql; 2] = [&code, &limit];
        let mut statement = connection.prepare(sql.as_str())?;
        let rows = statement
            .query_map(params.as_slice(), read_session)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Rows for `code` with `start <= SEANCE <= end`, oldest first.
    ///
    /// `start` and `end` are `YYYY-MM-DD` dates.
    pub fn sessions_between(
        &self,
        code: &str,
        start: &str,
        end: &str,
    ) -> Result<Vec<SessionRecord>, WarehouseError> {
        let connection = self.manager.acquire(AccessMode::ReadOnly)?;
        let sql = format!(
            r#"SELECT {SESSION_COLUMNS} FROM bvmt_data
               WHERE "CODE" = ?
                 AND "SEANCE" >= CAST(? AS DATE)
                 AND "SEANCE" <= CAST(? AS DATE)
               ORDER BY "SEANCE" ASC, rowid ASC"#
        );
        let params: [&dyn ToSql; 3] = [&code, &start, &end];
        let mut statement = connection.prepare(sql.as_str())?;
        let rows = statement
            .query_map(params.as_slice(), read_session)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// The two most recent sessions and their rows.
    ///
    /// Date resolution and both row reads share one transaction, so a session
    /// ingested concurrently cannot leak into half of the result.
    pub fn latest_session_pair(&self) -> Result<SessionPair, WarehouseError> {
        let connection = self.manager.acquire(AccessMode::ReadOnly)?;
        connection.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<SessionPair, WarehouseError> {
            let mut dates = read_session_dates(&connection, Some(2))?.into_iter();
            let Some(latest_date) = dates.next() else {
                return Ok(SessionPair::default());
            };

            let latest = read_rows_for_date(&connection, latest_date.as_str())?;
            let previous_date = dates.next();
            let previous = match previous_date.as_deref() {
                Some(date) => read_rows_for_date(&connection, date)?,
                None => Vec::new(),
            };

            Ok(SessionPair {
                latest_date: Some(latest_date),
                latest,
                previous_date,
                previous,
            })
        })();

        finalize_transaction(&connection, result)
    }

    /// Row, instrument and session counts plus the covered date span.
    pub fn store_status(&self) -> Result<StoreStatusRecord, WarehouseError> {
        let connection = self.manager.acquire(AccessMode::ReadOnly)?;
        let status = connection.query_row(
            r#"SELECT
                   COUNT(*),
                   COUNT(DISTINCT "CODE"),
                   COUNT(DISTINCT "SEANCE"),
                   CAST(MIN("SEANCE") AS VARCHAR),
                   CAST(MAX("SEANCE") AS VARCHAR)
               FROM bvmt_data"#,
            [] as [&dyn ToSql; 0],
            |row| {
                Ok(StoreStatusRecord {
                    row_count: row.get(0)?,
                    instrument_count: row.get(1)?,
                    session_count: row.get(2)?,
                    first_session: row.get(3)?,
                    last_session: row.get(4)?,
                })
            },
        )?;
        Ok(status)
    }
}

fn read_session_dates(
    connection: &Connection,
    limit: Option<usize>,
) -> Result<Vec<String>, ::duckdb::Error> {
    let mut sql = String::from(
        "SELECT CAST(session_date AS VARCHAR) FROM vw_session_dates ORDER BY session_date DESC",
    );
    if let Some(limit) = limit {
        sql.push_str(format!(" LIMIT {}", sql_limit(limit)).as_str());
    }

    let mut statement = connection.prepare(sql.as_str())?;
    let dates = statement
        .query_map([] as [&dyn ToSql; 0], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(dates)
}

fn read_rows_for_date(
    connection: &Connection,
    session_date: &str,
) -> Result<Vec<SessionRecord>, ::duckdb::Error> {
    let sql = format!(
        r#"SELECT {SESSION_COLUMNS} FROM bvmt_data
           WHERE "SEANCE" = CAST(? AS DATE)
           ORDER BY "CODE", rowid"#
    );
    let mut statement = connection.prepare(sql.as_str())?;
    let rows = statement
        .query_map([session_date], read_session)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

fn read_session(row: &Row<'_>) -> Result<SessionRecord, ::duckdb::Error> {
    Ok(SessionRecord {
        code: row.get(0)?,
        name: row.get(1)?,
        session_date: row.get(2)?,
        open: row.get(3)?,
        close: row.get(4)?,
        high: row.get(5)?,
        low: row.get(6)?,
        volume_traded: row.get(7)?,
        capital_traded: row.get(8)?,
        transaction_count: row.get(9)?,
        group: row.get(10)?,
    })
}

fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}
