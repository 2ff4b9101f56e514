use std::fs;

use anyhow::{Context, Result};
use log::{error, info};
use rusqlite::Connection;

use crate::config::AppConfig;

/// Open the configured database file, apply connection settings and make sure
/// the `students` table exists. The connection is handed to the caller, which
/// owns it for the lifetime of the session.
pub fn open_database(config: &AppConfig) -> Result<Connection> {
    if let Some(parent) = config.db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(&config.db_path)
        .context("failed to open SQLite database")
        .inspect_err(|err| {
            error!(
                "event=db_open status=error path={} error={err:#}",
                config.db_path.display()
            )
        })?;
    conn.busy_timeout(config.busy_timeout)
        .context("failed to set busy timeout")?;
    ensure_schema(&conn)?;

    info!(
        "event=db_open status=ok path={} busy_timeout_ms={}",
        config.db_path.display(),
        config.busy_timeout.as_millis()
    );
    Ok(conn)
}

/// Same bootstrap as `open_database`, against a private in-memory database.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Create the `students` table when it is missing. The CHECK constraints
/// mirror the validation in `Student` so rows written by other tools cannot
/// break hydration.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS students (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            gender TEXT NOT NULL CHECK (gender IN ('male', 'female', 'other')),
            class_name TEXT NOT NULL,
            math_score REAL NOT NULL CHECK (math_score BETWEEN 0 AND 100),
            java_score REAL NOT NULL CHECK (java_score BETWEEN 0 AND 100),
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
            updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )
    .context("failed to create students table")?;

    Ok(())
}
