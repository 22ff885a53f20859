#![forbid(unsafe_code)]

use super::*;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use serde_json::json;
use wbs_core::model::{CostSummary, ResourceAssignment};
use wbs_core::validate;

impl SqliteStore {
    pub fn list_resources(&self, task_id: &str) -> Result<Vec<ResourceAssignment>, StoreError> {
        require_task(&self.conn, task_id)?;
        task_resources(&self.conn, task_id)
    }

    /// Attaches a resource to a task. `planned_total_cost` defaults to
    /// `planned_quantity * unit_cost`.
    pub fn add_resource(&mut self, request: AddResourceRequest) -> Result<ResourceAssignment, StoreError> {
        let tx = self.conn.transaction()?;
        let resource =
            add_resource_tx(&tx, request).inspect_err(|err| log_rejected("add_resource", err))?;
        tx.commit()?;

        tracing::info!(
            task = %resource.task_id,
            resource = %resource.id,
            kind = resource.resource_kind.as_str(),
            total = resource.planned_total_cost,
            "resource assigned"
        );
        Ok(resource)
    }

    pub fn remove_resource(&mut self, resource_id: &str) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let resource = remove_resource_tx(&tx, resource_id)
            .inspect_err(|err| log_rejected("remove_resource", err))?;
        tx.commit()?;

        tracing::info!(task = %resource.task_id, resource = %resource.id, "resource removed");
        Ok(())
    }

    /// Planned cost of a task split by resource kind.
    pub fn task_cost_summary(&self, task_id: &str) -> Result<CostSummary, StoreError> {
        let mut summary = CostSummary::default();
        for resource in self.list_resources(task_id)? {
            summary.add(resource.resource_kind, resource.planned_total_cost);
        }
        Ok(summary)
    }
}

fn task_resources(conn: &Connection, task_id: &str) -> Result<Vec<ResourceAssignment>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RESOURCE_COLUMNS} FROM resource_assignments WHERE task_id=?1 \
         ORDER BY created_at_ms ASC, id ASC"
    ))?;
    let rows = stmt.query_map(params![task_id], resource_from_row)?;
    Ok(rows.collect::<Result<Vec<_>, _>>()?)
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn add_resource_tx(
    tx: &Transaction<'_>,
    request: AddResourceRequest,
) -> Result<ResourceAssignment, StoreError> {
    let AddResourceRequest {
        task_id,
        resource_kind,
        labor_ref,
        external_resource_name,
        unit,
        planned_quantity,
        unit_cost,
        planned_total_cost,
    } = request;
    let labor_ref = trimmed(labor_ref);
    let external_resource_name = trimmed(external_resource_name);
    let planned_total_cost = validate::resolve_resource_cost(
        resource_kind,
        labor_ref.as_deref(),
        external_resource_name.as_deref(),
        planned_quantity,
        unit_cost,
        planned_total_cost,
    )?;

    let task = require_task(tx, &task_id)?;
    let resource = ResourceAssignment {
        id: next_id_tx(tx, "RES")?,
        task_id: task.id,
        resource_kind,
        labor_ref,
        external_resource_name,
        unit: trimmed(unit),
        planned_quantity,
        unit_cost,
        planned_total_cost,
        created_at_ms: now_ms(),
    };
    tx.execute(
        &format!(
            "INSERT INTO resource_assignments({RESOURCE_COLUMNS}) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
        ),
        params![
            resource.id,
            resource.task_id,
            resource.resource_kind.as_str(),
            resource.labor_ref,
            resource.external_resource_name,
            resource.unit,
            resource.planned_quantity,
            resource.unit_cost,
            resource.planned_total_cost,
            resource.created_at_ms,
        ],
    )?;
    insert_event_tx(
        tx,
        &task.schedule_id,
        resource.created_at_ms,
        Some(&resource.task_id),
        "resource_added",
        json!({
            "resource_id": resource.id,
            "kind": resource.resource_kind.as_str(),
            "planned_total_cost": resource.planned_total_cost,
        }),
    )?;
    Ok(resource)
}

fn remove_resource_tx(
    tx: &Transaction<'_>,
    resource_id: &str,
) -> Result<ResourceAssignment, StoreError> {
    let resource = tx
        .query_row(
            &format!("SELECT {RESOURCE_COLUMNS} FROM resource_assignments WHERE id=?1"),
            params![resource_id],
            resource_from_row,
        )
        .optional()?
        .ok_or_else(|| StoreError::unknown("resource", resource_id))?;
    let task = require_task(tx, &resource.task_id)?;

    tx.execute(
        "DELETE FROM resource_assignments WHERE id=?1",
        params![resource.id],
    )?;
    insert_event_tx(
        tx,
        &task.schedule_id,
        now_ms(),
        Some(&resource.task_id),
        "resource_removed",
        json!({ "resource_id": resource.id }),
    )?;
    Ok(resource)
}
