#![forbid(unsafe_code)]

use super::*;
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use serde_json::json;
use wbs_core::ids::ProjectId;
use wbs_core::model::Schedule;
use wbs_core::validate;

impl SqliteStore {
    /// Returns the active schedule of a project, creating "Main Schedule" starting today
    /// when the project has none.
    ///
    /// The lookup and the insert share one immediate transaction, and the partial unique
    /// index `ux_schedules_active` backs it up: a concurrent creator that wins the race
    /// makes our insert fail, after which its schedule is returned.
    pub fn get_or_create_active_schedule(
        &mut self,
        project_id: &ProjectId,
    ) -> Result<Schedule, StoreError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if let Some(schedule) = active_schedule_tx(&tx, project_id)? {
            tx.commit()?;
            tracing::debug!(project = %project_id, schedule = %schedule.id, "active schedule found");
            return Ok(schedule);
        }
        ensure_project_tx(&tx, project_id)?;

        let now_ms = now_ms();
        let schedule = Schedule {
            id: next_id_tx(&tx, "SCH")?,
            project_id: project_id.clone(),
            name: self.config.default_schedule_name.clone(),
            is_active: true,
            base_start_date: today(),
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        };

        if let Err(err) = insert_schedule_tx(&tx, &schedule) {
            drop(tx);
            if let StoreError::Sql(inner) = &err {
                if error::is_constraint_violation(inner) {
                    tracing::warn!(project = %project_id, "active schedule created concurrently");
                    return active_schedule_tx(&self.conn, project_id)?.ok_or(err);
                }
            }
            return Err(err);
        }
        insert_event_tx(
            &tx,
            &schedule.id,
            now_ms,
            None,
            "schedule_created",
            json!({ "name": schedule.name, "active": true }),
        )?;
        tx.commit()?;

        tracing::info!(project = %project_id, schedule = %schedule.id, "active schedule created");
        Ok(schedule)
    }

    /// Adds an inactive schedule version to a project.
    pub fn create_schedule(&mut self, request: CreateScheduleRequest) -> Result<Schedule, StoreError> {
        let name = validate::required_name("name", &request.name)?;
        let tx = self.conn.transaction()?;
        ensure_project_tx(&tx, &request.project_id)?;

        let now_ms = now_ms();
        let schedule = Schedule {
            id: next_id_tx(&tx, "SCH")?,
            project_id: request.project_id,
            name,
            is_active: false,
            base_start_date: request.base_start_date.unwrap_or_else(today),
            created_at_ms: now_ms,
            updated_at_ms: now_ms,
        };
        insert_schedule_tx(&tx, &schedule)?;
        insert_event_tx(
            &tx,
            &schedule.id,
            now_ms,
            None,
            "schedule_created",
            json!({ "name": schedule.name, "active": false }),
        )?;
        tx.commit()?;

        tracing::info!(project = %schedule.project_id, schedule = %schedule.id, "schedule created");
        Ok(schedule)
    }

    /// Makes `schedule_id` the active schedule of its project, deactivating the previous
    /// one in the same transaction.
    pub fn activate_schedule(&mut self, schedule_id: &str) -> Result<Schedule, StoreError> {
        let tx = self.conn.transaction()?;
        let mut schedule = require_schedule(&tx, schedule_id)?;
        if schedule.is_active {
            tx.commit()?;
            return Ok(schedule);
        }

        let now_ms = now_ms();
        let previous = active_schedule_tx(&tx, &schedule.project_id)?;
        if let Some(previous) = previous.as_ref() {
            tx.execute(
                "UPDATE schedules SET is_active=0, updated_at_ms=?2 WHERE id=?1",
                params![previous.id, now_ms],
            )?;
        }
        tx.execute(
            "UPDATE schedules SET is_active=1, updated_at_ms=?2 WHERE id=?1",
            params![schedule.id, now_ms],
        )?;
        insert_event_tx(
            &tx,
            &schedule.id,
            now_ms,
            None,
            "schedule_activated",
            json!({ "previous": previous.as_ref().map(|s| s.id.as_str()) }),
        )?;
        tx.commit()?;

        schedule.is_active = true;
        schedule.updated_at_ms = now_ms;
        if let Some(previous) = previous {
            self.cache.invalidate(&previous.id);
        }
        self.cache.invalidate(&schedule.id);
        tracing::info!(project = %schedule.project_id, schedule = %schedule.id, "schedule activated");
        Ok(schedule)
    }

    pub fn get_schedule(&self, schedule_id: &str) -> Result<Schedule, StoreError> {
        require_schedule(&self.conn, schedule_id)
    }

    pub fn list_schedules(&self, project_id: &ProjectId) -> Result<Vec<Schedule>, StoreError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE project_id=?1 \
             ORDER BY created_at_ms ASC, id ASC"
        ))?;
        let rows = stmt.query_map(params![project_id.as_str()], schedule_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

fn active_schedule_tx(
    tx: &Connection,
    project_id: &ProjectId,
) -> Result<Option<Schedule>, StoreError> {
    Ok(tx
        .query_row(
            &format!("SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE project_id=?1 AND is_active=1"),
            params![project_id.as_str()],
            schedule_from_row,
        )
        .optional()?)
}

fn ensure_project_tx(tx: &Connection, project_id: &ProjectId) -> Result<(), StoreError> {
    let exists = tx
        .query_row(
            "SELECT 1 FROM projects WHERE id=?1",
            params![project_id.as_str()],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if !exists {
        return Err(StoreError::unknown("project", project_id.as_str()));
    }
    Ok(())
}

fn insert_schedule_tx(tx: &Connection, schedule: &Schedule) -> Result<(), StoreError> {
    let inserted = tx.execute(
        &format!("INSERT INTO schedules({SCHEDULE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
        params![
            schedule.id,
            schedule.project_id.as_str(),
            schedule.name,
            schedule.is_active,
            schedule.base_start_date,
            schedule.created_at_ms,
            schedule.updated_at_ms,
        ],
    );
    match inserted {
        Ok(_) => Ok(()),
        Err(err) if error::is_foreign_key_violation(&err) => Err(StoreError::unknown(
            "project",
            schedule.project_id.as_str(),
        )),
        Err(err) => Err(err.into()),
    }
}
