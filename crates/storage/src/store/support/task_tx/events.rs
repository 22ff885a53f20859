#![forbid(unsafe_code)]

use super::super::super::{ScheduleEvent, StoreError};
use rusqlite::{Transaction, params};

pub(in crate::store) fn insert_event_tx(
    tx: &Transaction<'_>,
    schedule_id: &str,
    ts_ms: i64,
    task_id: Option<&str>,
    event_type: &str,
    payload: serde_json::Value,
) -> Result<ScheduleEvent, StoreError> {
    let payload_json = payload.to_string();
    tx.execute(
        r#"
        INSERT INTO schedule_events(schedule_id, ts_ms, task_id, type, payload_json)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
        params![schedule_id, ts_ms, task_id, event_type, payload_json],
    )?;
    let seq = tx.last_insert_rowid();
    Ok(ScheduleEvent {
        seq,
        schedule_id: schedule_id.to_string(),
        ts_ms,
        task_id: task_id.map(str::to_string),
        event_type: event_type.to_string(),
        payload_json,
    })
}
