#![forbid(unsafe_code)]

use super::*;
use rusqlite::params;

impl SqliteStore {
    /// Journal entries of a schedule with `seq > since_seq`, oldest first.
    pub fn list_events(
        &self,
        schedule_id: &str,
        since_seq: i64,
        limit: usize,
    ) -> Result<Vec<ScheduleEvent>, StoreError> {
        require_schedule(&self.conn, schedule_id)?;
        let limit = to_sqlite_i64(limit)?;
        let mut stmt = self.conn.prepare(
            r#"
            SELECT seq, schedule_id, ts_ms, task_id, type, payload_json
            FROM schedule_events
            WHERE schedule_id=?1 AND seq>?2
            ORDER BY seq ASC
            LIMIT ?3
            "#,
        )?;
        let rows = stmt.query_map(params![schedule_id, since_seq, limit], |row| {
            Ok(ScheduleEvent {
                seq: row.get(0)?,
                schedule_id: row.get(1)?,
                ts_ms: row.get(2)?,
                task_id: row.get(3)?,
                event_type: row.get(4)?,
                payload_json: row.get(5)?,
            })
        })?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}
