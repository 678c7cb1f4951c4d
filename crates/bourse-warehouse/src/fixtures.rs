//! Row loading for tests and local fixtures.
//!
//! The service itself never writes `bvmt_data`; in production the rows come
//! from the ingestion pipeline.

use ::duckdb::ToSql;

use crate::{finalize_transaction, AccessMode, SessionRecord, Warehouse, WarehouseError};

const INSERT_SESSION: &str = r#"
INSERT INTO bvmt_data (
    "CODE", "VALEUR", "SEANCE", "OUVERTURE", "CLOTURE", "PLUS_HAUT", "PLUS_BAS",
    "QUANTITE_NEGOCIEE", "CAPITAUX", "NB_TRANSACTION", "GROUPE"
)
VALUES (?, NULLIF(?, ''), CAST(? AS DATE), ?, ?, ?, ?, ?, ?, ?, ?)
"#;

impl Warehouse {
    /// Append `rows` in order, inside one transaction.
    ///
    /// An empty `name` is stored as `NULL`, which reads back as `""`.
    pub fn insert_sessions(&self, rows: &[SessionRecord]) -> Result<(), WarehouseError> {
        if rows.is_empty() {
            return Ok(());
        }

        let connection = self.manager.acquire(AccessMode::ReadWrite)?;
        connection.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<(), WarehouseError> {
            let mut statement = connection.prepare(INSERT_SESSION)?;
            for row in rows {
                let params: [&dyn ToSql; 11] = [
                    &row.code,
                    &row.name,
                    &row.session_date,
                    &row.open,
                    &row.close,
                    &row.high,
                    &row.low,
                    &row.volume_traded,
                    &row.capital_traded,
                    &row.transaction_count,
                    &row.group,
                ];
                statement.execute(params.as_slice())?;
            }
            Ok(())
        })();

        finalize_transaction(&connection, result)
    }
}
