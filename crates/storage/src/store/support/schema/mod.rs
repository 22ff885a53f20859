#![forbid(unsafe_code)]

mod sql;

use super::super::StoreError;
use rusqlite::{Connection, OptionalExtension, params};
use std::collections::BTreeSet;

pub(in crate::store) const SCHEMA_VERSION: &str = "1";

const TABLES: [&str; 8] = [
    "meta",
    "counters",
    "projects",
    "schedules",
    "tasks",
    "dependencies",
    "resource_assignments",
    "schedule_events",
];

pub(in crate::store) fn install_schema(conn: &Connection) -> Result<(), StoreError> {
    preflight_gate(conn)?;
    conn.execute_batch(&sql::full_schema_sql())?;
    conn.execute(
        "INSERT OR IGNORE INTO meta(key, value) VALUES (?1, ?2)",
        params!["schema_version", SCHEMA_VERSION],
    )?;
    Ok(())
}

/// Refuses databases written by something else or by another schema version instead of
/// patching them in place.
fn preflight_gate(conn: &Connection) -> Result<(), StoreError> {
    let mut stmt = conn.prepare(
        "SELECT name FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
    )?;
    let mut rows = stmt.query([])?;
    let mut tables = BTreeSet::new();
    while let Some(row) = rows.next()? {
        tables.insert(row.get::<_, String>(0)?);
    }

    if tables.is_empty() {
        return Ok(());
    }

    let known: BTreeSet<&str> = TABLES.into_iter().collect();
    if tables.iter().any(|table| !known.contains(table.as_str())) {
        return Err(StoreError::InvalidInput(
            "RESET_REQUIRED: unsupported tables detected",
        ));
    }
    if !tables.contains("meta") {
        return Err(StoreError::InvalidInput(
            "RESET_REQUIRED: schema metadata is missing",
        ));
    }

    let version = conn
        .query_row(
            "SELECT value FROM meta WHERE key='schema_version'",
            [],
            |row| row.get::<_, String>(0),
        )
        .optional()?;
    match version.as_deref() {
        Some(SCHEMA_VERSION) | None => Ok(()),
        Some(_) => Err(StoreError::InvalidInput(
            "RESET_REQUIRED: unsupported schema version",
        )),
    }
}
