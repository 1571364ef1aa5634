//! Schema for the SQLite slot backend.
//!
//! Steps are embedded SQL files applied in order. The applied step count is
//! kept in SQLite's `user_version` header field, and each step commits
//! together with its version bump.

use rusqlite::Connection;

use crate::error::StoreError;

/// Ordered schema steps; step `n` moves `user_version` from `n - 1` to `n`.
const STEPS: &[&str] = &[include_str!("migrations/001_baseline.sql")];

fn schema_version(conn: &Connection) -> Result<usize, StoreError> {
    let version: i64 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(usize::try_from(version).unwrap_or(0))
}

/// Bring the schema up to date and return how many steps ran.
///
/// A file written by a newer build (higher `user_version`) is refused
/// untouched.
pub fn run_migrations(conn: &Connection) -> Result<usize, StoreError> {
    let current = schema_version(conn)?;
    if current > STEPS.len() {
        return Err(StoreError::Migration(format!(
            "tracker database is at schema {} but this build only knows {}; update carbontrack",
            current,
            STEPS.len()
        )));
    }

    for (index, sql) in STEPS.iter().enumerate().skip(current) {
        let version = index + 1;
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)
            .map_err(|e| StoreError::Migration(format!("schema step {}: {}", version, e)))?;
        tx.pragma_update(None, "user_version", version as i64)?;
        tx.commit()?;
        log::info!("Tracker database schema now at {}", version);
    }

    Ok(STEPS.len() - current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Connection {
        Connection::open_in_memory().expect("in-memory db")
    }

    #[test]
    fn test_fresh_database_gets_slot_table() {
        let conn = fresh();
        assert_eq!(run_migrations(&conn).expect("migrate"), STEPS.len());
        assert_eq!(schema_version(&conn).unwrap(), STEPS.len());

        conn.execute(
            "INSERT INTO kv_slots (slot, payload, updated_at) VALUES ('s', '{}', '2025-01-01')",
            [],
        )
        .expect("kv_slots exists");
    }

    #[test]
    fn test_up_to_date_database_runs_nothing() {
        let conn = fresh();
        run_migrations(&conn).unwrap();
        assert_eq!(run_migrations(&conn).unwrap(), 0);
    }

    #[test]
    fn test_newer_database_is_refused() {
        let conn = fresh();
        conn.pragma_update(None, "user_version", 99i64).unwrap();

        match run_migrations(&conn) {
            Err(StoreError::Migration(message)) => {
                assert!(message.contains("schema 99"), "got: {}", message)
            }
            other => panic!("expected a migration error, got {:?}", other),
        }
        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'kv_slots'",
                [],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(tables, 0, "nothing applied to a newer file");
    }
}
