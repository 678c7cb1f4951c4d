//! Database views backing the catalog and calendar reads.

use ::duckdb::Connection;

/// Create database views over `bvmt_data`.
///
/// Creates the following views:
/// - `vw_instruments`: one row per code with a deterministic display name
///   (the smallest non-null `VALEUR`, empty when every name is null)
/// - `vw_session_dates`: distinct session dates
///
/// # Errors
/// Returns an error if the view creation SQL fails to execute.
pub fn create_views(connection: &Connection) -> Result<(), ::duckdb::Error> {
    connection.execute_batch(
        r#"
CREATE OR REPLACE VIEW vw_instruments AS
SELECT
    "CODE" AS code,
    COALESCE(MIN("VALEUR"), '') AS name
FROM bvmt_data
GROUP BY "CODE";

CREATE OR REPLACE VIEW vw_session_dates AS
SELECT DISTINCT "SEANCE" AS session_date
FROM bvmt_data;
"#,
    )?;

    Ok(())
}
