#![forbid(unsafe_code)]

use super::*;
use rusqlite::Transaction;
use serde_json::json;
use wbs_core::validate;

impl SqliteStore {
    /// Creates a task in its schedule.
    ///
    /// Missing dates fall back to the schedule's `base_start_date`, a missing `wbs_order`
    /// to the next free sibling position, and `wbs_level` is always derived from the
    /// parent.
    pub fn create_task(&mut self, request: CreateTaskRequest) -> Result<Task, StoreError> {
        let tx = self.conn.transaction()?;
        let task = create_task_tx(&tx, request).inspect_err(|err| log_rejected("create_task", err))?;
        tx.commit()?;

        self.cache.invalidate(&task.schedule_id);
        tracing::info!(
            schedule = %task.schedule_id,
            task = %task.id,
            kind = task.kind.as_str(),
            "task created"
        );
        Ok(task)
    }
}

fn create_task_tx(tx: &Transaction<'_>, request: CreateTaskRequest) -> Result<Task, StoreError> {
    let CreateTaskRequest {
        schedule_id,
        name,
        parent_id,
        description,
        kind,
        planned_start,
        planned_end,
        duration_days,
        percent_complete,
        status,
        wbs_order,
    } = request;

    let schedule_id = validate::required_name("schedule_id", &schedule_id)?;
    let name = validate::required_name("name", &name)?;
    let percent_complete = percent_complete.unwrap_or(0.0);
    validate::check_percent(percent_complete)?;
    if let Some(days) = duration_days {
        validate::check_duration(kind, days)?;
    }
    if let Some(order) = wbs_order {
        validate::check_order(order)?;
    }
    let parent_id = non_blank(parent_id);

    let schedule = require_schedule(tx, &schedule_id)?;
    let (planned_start, planned_end) =
        validate::resolve_dates(kind, planned_start, planned_end, schedule.base_start_date)?;
    let wbs_level = match parent_id.as_deref() {
        Some(parent_id) => parent_level(tx, &schedule.id, parent_id)? + 1,
        None => 0,
    };

    let tree = load_tree(tx, &schedule.id)?;
    let wbs_order = match wbs_order {
        Some(order) if tree.sibling_order_taken(parent_id.as_deref(), order, None) => {
            return Err(ValidationError::SiblingOrderTaken { order }.into());
        }
        Some(order) => order,
        None => tree.next_sibling_order(parent_id.as_deref()),
    };

    let now_ms = now_ms();
    let task = Task {
        id: next_id_tx(tx, "TASK")?,
        schedule_id: schedule.id,
        parent_id,
        name,
        description: non_blank(description),
        kind,
        planned_start,
        planned_end,
        duration_days: duration_days
            .unwrap_or_else(|| validate::default_duration_days(kind, planned_start, planned_end)),
        percent_complete,
        status,
        wbs_order,
        wbs_level,
        revision: 0,
        predecessors: Vec::new(),
        created_at_ms: now_ms,
        updated_at_ms: now_ms,
    };
    insert_task(tx, &task)?;
    insert_event_tx(
        tx,
        &task.schedule_id,
        now_ms,
        Some(&task.id),
        "task_created",
        json!({
            "name": task.name,
            "kind": task.kind.as_str(),
            "parent_id": task.parent_id,
            "wbs_order": task.wbs_order,
        }),
    )?;
    Ok(task)
}
