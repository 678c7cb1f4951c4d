use ::duckdb::Connection;

struct Migration {
    version: &'static str,
    sql: &'static str,
}

// Column names mirror the exchange's daily session export and are shared with
// the external ingestion pipeline, so they must not be renamed.
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "0001_bvmt_data",
        sql: r#"
CREATE TABLE IF NOT EXISTS bvmt_data (
    "CODE" TEXT NOT NULL,
    "VALEUR" TEXT,
    "SEANCE" DATE NOT NULL,
    "OUVERTURE" DOUBLE,
    "CLOTURE" DOUBLE,
    "PLUS_HAUT" DOUBLE,
    "PLUS_BAS" DOUBLE,
    "QUANTITE_NEGOCIEE" BIGINT,
    "CAPITAUX" DOUBLE,
    "NB_TRANSACTION" BIGINT,
    "GROUPE" TEXT
);
"#,
    },
    Migration {
        version: "0002_indexes",
        sql: r#"
CREATE INDEX IF NOT EXISTS idx_bvmt_data_code_seance ON bvmt_data("CODE", "SEANCE");
CREATE INDEX IF NOT EXISTS idx_bvmt_data_seance ON bvmt_data("SEANCE");
"#,
    },
];

pub fn apply_migrations(connection: &Connection) -> Result<(), ::duckdb::Error> {
    connection.execute_batch(
        r#"
CREATE TABLE IF NOT EXISTS schema_migrations (
    version TEXT PRIMARY KEY,
    applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);
"#,
    )?;

    for migration in MIGRATIONS {
        let applied_count: i64 = connection.query_row(
            "SELECT COUNT(*) FROM schema_migrations WHERE version = ?",
            [migration.version],
            |row| row.get(0),
        )?;

        if applied_count == 0 {
            connection.execute_batch(migration.sql)?;
            connection.execute(
                "INSERT INTO schema_migrations (version) VALUES (?)",
                [migration.version],
            )?;
        }
    }

    Ok(())
}

/// Versions recorded in `schema_migrations`, oldest first.
pub fn applied_versions(connection: &Connection) -> Result<Vec<String>, ::duckdb::Error> {
    let mut statement =
        connection.prepare("SELECT version FROM schema_migrations ORDER BY version")?;
    let versions = statement
        .query_map([], |row| row.get(0))?
        .collect::<Result<Vec<String>, _>>()?;
    Ok(versions)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_apply_once() {
        let connection = Connection::open_in_memory().expect("in-memory db");
        apply_migrations(&connection).expect("first run");
        apply_migrations(&connection).expect("second run");

        let versions = applied_versions(&connection).expect("versions");
        assert_eq!(versions, vec!["0001_bvmt_data", "0002_indexes"]);
    }

    #[test]
    fn session_table_keeps_export_column_names() {
        let connection = Connection::open_in_memory().expect("in-memory db");
        apply_migrations(&connection).expect("migrate");

        let mut statement = connection
            .prepare(
                "SELECT column_name FROM information_schema.columns \
                 WHERE table_name = 'bvmt_data' ORDER BY ordinal_position",
            )
            .expect("prepare");
        let columns = statement
            .query_map([], |row| row.get::<_, String>(0))
            .expect("query")
            .collect::<Result<Vec<_>, _>>()
            .expect("collect");

        assert_eq!(
            columns,
            vec![
                "CODE",
                "VALEUR",
                "SEANCE",
                "OUVERTURE",
                "CLOTURE",
                "PLUS_HAUT",
                "PLUS_BAS",
                "QUANTITE_NEGOCIEE",
                "CAPITAUX",
                "NB_TRANSACTION",
                "GROUPE",
            ]
        );
    }
}
