#![forbid(unsafe_code)]

use super::super::StoreError;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use wbs_core::DependencyGraph;
use wbs_core::ids::ProjectId;
use wbs_core::model::{
    DependencyEdge, LinkType, ResourceAssignment, ResourceKind, Schedule, Task, TaskKind,
    TaskStatus,
};

pub(in crate::store) const SCHEDULE_COLUMNS: &str =
    "id, project_id, name, is_active, base_start_date, created_at_ms, updated_at_ms";

pub(in crate::store) const TASK_COLUMNS: &str = "id, schedule_id, parent_id, name, description, kind, \
     planned_start, planned_end, duration_days, percent_complete, status, \
     wbs_order, wbs_level, revision, created_at_ms, updated_at_ms";

pub(in crate::store) const EDGE_COLUMNS: &str = "id, schedule_id, predecessor_task_id, successor_task_id, \
     link_type, lag_days, created_at_ms";

pub(in crate::store) const RESOURCE_COLUMNS: &str = "id, task_id, resource_kind, labor_ref, external_resource_name, \
     unit, planned_quantity, unit_cost, planned_total_cost, created_at_ms";

fn text_column<T>(row: &Row<'_>, idx: usize, parse: fn(&str) -> Option<T>) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unexpected value {raw:?}").into(),
        )
    })
}

pub(in crate::store) fn schedule_from_row(row: &Row<'_>) -> rusqlite::Result<Schedule> {
    let project_id: String = row.get(1)?;
    let project_id = ProjectId::try_new(project_id)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(err)))?;
    Ok(Schedule {
        id: row.get(0)?,
        project_id,
        name: row.get(2)?,
        is_active: row.get(3)?,
        base_start_date: row.get(4)?,
        created_at_ms: row.get(5)?,
        updated_at_ms: row.get(6)?,
    })
}

pub(in crate::store) fn task_from_row(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: row.get(0)?,
        schedule_id: row.get(1)?,
        parent_id: row.get(2)?,
        name: row.get(3)?,
        description: row.get(4)?,
        kind: text_column(row, 5, TaskKind::parse)?,
        planned_start: row.get(6)?,
        planned_end: row.get(7)?,
        duration_days: row.get(8)?,
        percent_complete: row.get(9)?,
        status: text_column(row, 10, TaskStatus::parse)?,
        wbs_order: row.get(11)?,
        wbs_level: row.get(12)?,
        revision: row.get(13)?,
        predecessors: Vec::new(),
        created_at_ms: row.get(14)?,
        updated_at_ms: row.get(15)?,
    })
}

pub(in crate::store) fn edge_from_row(row: &Row<'_>) -> rusqlite::Result<DependencyEdge> {
    Ok(DependencyEdge {
        id: row.get(0)?,
        schedule_id: row.get(1)?,
        predecessor_task_id: row.get(2)?,
        successor_task_id: row.get(3)?,
        link_type: text_column(row, 4, LinkType::parse)?,
        lag_days: row.get(5)?,
        created_at_ms: row.get(6)?,
    })
}

pub(in crate::store) fn resource_from_row(row: &Row<'_>) -> rusqlite::Result<ResourceAssignment> {
    Ok(ResourceAssignment {
        id: row.get(0)?,
        task_id: row.get(1)?,
        resource_kind: text_column(row, 2, ResourceKind::parse)?,
        labor_ref: row.get(3)?,
        external_resource_name: row.get(4)?,
        unit: row.get(5)?,
        planned_quantity: row.get(6)?,
        unit_cost: row.get(7)?,
        planned_total_cost: row.get(8)?,
        created_at_ms: row.get(9)?,
    })
}

pub(in crate::store) fn load_schedule(
    conn: &Connection,
    schedule_id: &str,
) -> Result<Option<Schedule>, StoreError> {
    Ok(conn
        .query_row(
            &format!("SELECT {SCHEDULE_COLUMNS} FROM schedules WHERE id = ?1"),
            params![schedule_id],
            schedule_from_row,
        )
        .optional()?)
}

pub(in crate::store) fn require_schedule(
    conn: &Connection,
    schedule_id: &str,
) -> Result<Schedule, StoreError> {
    load_schedule(conn, schedule_id)?.ok_or_else(|| StoreError::unknown("schedule", schedule_id))
}

pub(in crate::store) fn load_task(conn: &Connection, task_id: &str) -> Result<Option<Task>, StoreError> {
    Ok(conn
        .query_row(
            &format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = ?1"),
            params![task_id],
            task_from_row,
        )
        .optional()?)
}

pub(in crate::store) fn require_task(conn: &Connection, task_id: &str) -> Result<Task, StoreError> {
    load_task(conn, task_id)?.ok_or_else(|| StoreError::unknown("task", task_id))
}

/// Raw task rows of a schedule ordered for display; `predecessors` is left empty.
pub(in crate::store) fn load_schedule_tasks(
    conn: &Connection,
    schedule_id: &str,
) -> Result<Vec<Task>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TASK_COLUMNS} FROM tasks WHERE schedule_id = ?1 \
         ORDER BY wbs_order ASC, wbs_level ASC, id ASC"
    ))?;
    let rows = stmt.query_map(params![schedule_id], task_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

pub(in crate::store) fn load_schedule_edges(
    conn: &Connection,
    schedule_id: &str,
) -> Result<Vec<DependencyEdge>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EDGE_COLUMNS} FROM dependencies WHERE schedule_id = ?1 \
         ORDER BY created_at_ms ASC, id ASC"
    ))?;
    let rows = stmt.query_map(params![schedule_id], edge_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

/// Fills every task's `predecessors` from the schedule's edges.
pub(in crate::store) fn attach_predecessors(tasks: &mut [Task], edges: &[DependencyEdge]) {
    let graph = DependencyGraph::from_edges(edges);
    for task in tasks.iter_mut() {
        task.predecessors = graph
            .predecessors(&task.id)
            .into_iter()
            .map(str::to_string)
            .collect();
    }
}
