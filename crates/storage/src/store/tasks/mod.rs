#![forbid(unsafe_code)]

mod create;
mod delete;
mod get;
mod order;
mod update;

use super::*;
use rusqlite::{Connection, params};
use wbs_core::ValidationError;
use wbs_core::WbsTree;
use wbs_core::model::Task;

/// Level of `parent_id` after checking that it exists and lives in `schedule_id`.
fn parent_level(conn: &Connection, schedule_id: &str, parent_id: &str) -> Result<i64, StoreError> {
    let parent = require_task(conn, parent_id)?;
    if parent.schedule_id != schedule_id {
        return Err(ValidationError::CrossScheduleParent {
            parent: parent_id.to_string(),
        }
        .into());
    }
    Ok(parent.wbs_level)
}

fn load_tree(conn: &Connection, schedule_id: &str) -> Result<WbsTree, StoreError> {
    let tasks = load_schedule_tasks(conn, schedule_id)?;
    Ok(WbsTree::from_tasks(&tasks))
}

fn predecessors_of(conn: &Connection, task_id: &str) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT predecessor_task_id FROM dependencies WHERE successor_task_id=?1 \
         ORDER BY predecessor_task_id ASC",
    )?;
    let rows = stmt.query_map(params![task_id], |row| row.get::<_, String>(0))?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn insert_task(conn: &Connection, task: &Task) -> Result<(), StoreError> {
    conn.execute(
        &format!(
            "INSERT INTO tasks({TASK_COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)"
        ),
        params![
            task.id,
            task.schedule_id,
            task.parent_id,
            task.name,
            task.description,
            task.kind.as_str(),
            task.planned_start,
            task.planned_end,
            task.duration_days,
            task.percent_complete,
            task.status.as_str(),
            task.wbs_order,
            task.wbs_level,
            task.revision,
            task.created_at_ms,
            task.updated_at_ms,
        ],
    )?;
    Ok(())
}

fn write_task(conn: &Connection, task: &Task) -> Result<(), StoreError> {
    conn.execute(
        r#"
        UPDATE tasks
        SET parent_id=?2, name=?3, description=?4, kind=?5, planned_start=?6, planned_end=?7,
            duration_days=?8, percent_complete=?9, status=?10, wbs_order=?11, wbs_level=?12,
            revision=?13, updated_at_ms=?14
        WHERE id=?1
        "#,
        params![
            task.id,
            task.parent_id,
            task.name,
            task.description,
            task.kind.as_str(),
            task.planned_start,
            task.planned_end,
            task.duration_days,
            task.percent_complete,
            task.status.as_str(),
            task.wbs_order,
            task.wbs_level,
            task.revision,
            task.updated_at_ms,
        ],
    )?;
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
