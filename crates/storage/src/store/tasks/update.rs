#![forbid(unsafe_code)]

use super::*;
use rusqlite::Transaction;
use serde_json::json;
use wbs_core::validate;

impl SqliteStore {
    /// Applies a partial update to a task.
    ///
    /// An empty patch returns the stored task untouched. Moving a task under another
    /// parent re-derives the level of its whole subtree; a stale `expected_revision`
    /// fails with [`StoreError::RevisionMismatch`].
    pub fn update_task(&mut self, request: UpdateTaskRequest) -> Result<Task, StoreError> {
        let tx = self.conn.transaction()?;
        let (mut task, fields) =
            update_task_tx(&tx, request).inspect_err(|err| log_rejected("update_task", err))?;
        task.predecessors = predecessors_of(&tx, &task.id)?;
        tx.commit()?;

        if !fields.is_empty() {
            self.cache.invalidate(&task.schedule_id);
            tracing::info!(
                schedule = %task.schedule_id,
                task = %task.id,
                revision = task.revision,
                fields = ?fields,
                "task updated"
            );
        }
        Ok(task)
    }
}

fn update_task_tx(
    tx: &Transaction<'_>,
    request: UpdateTaskRequest,
) -> Result<(Task, Vec<&'static str>), StoreError> {
    let UpdateTaskRequest {
        id,
        expected_revision,
        patch,
    } = request;

    let mut task = require_task(tx, &id)?;
    if let Some(expected) = expected_revision
        && expected != task.revision
    {
        return Err(StoreError::RevisionMismatch {
            expected,
            actual: task.revision,
        });
    }
    if patch.is_empty() {
        return Ok((task, Vec::new()));
    }

    let touches_hierarchy = patch.touches_hierarchy();
    let TaskPatch {
        name,
        description,
        parent_id,
        kind,
        planned_start,
        planned_end,
        duration_days,
        percent_complete,
        status,
        wbs_order,
    } = patch;
    let before_level = task.wbs_level;
    let mut fields = Vec::new();

    if let Some(name) = name {
        task.name = validate::required_name("name", &name)?;
        fields.push("name");
    }
    if let Some(description) = description {
        task.description = non_blank(description);
        fields.push("description");
    }
    if let Some(status) = status {
        task.status = status;
        fields.push("status");
    }
    if let Some(percent) = percent_complete {
        validate::check_percent(percent)?;
        task.percent_complete = percent;
        fields.push("percent_complete");
    }

    let reschedules = kind.is_some() || planned_start.is_some() || planned_end.is_some();
    if let Some(kind) = kind {
        task.kind = kind;
        fields.push("kind");
    }
    if let Some(start) = planned_start {
        task.planned_start = start;
        fields.push("planned_start");
    }
    match planned_end {
        Some(end) => {
            task.planned_end = end;
            fields.push("planned_end");
        }
        // A milestone moved or converted without an end collapses onto its start.
        None if reschedules && task.is_milestone() => {
            task.planned_end = task.planned_start;
        }
        None => {}
    }
    validate::check_dates(task.kind, task.planned_start, task.planned_end)?;
    match duration_days {
        Some(days) => {
            task.duration_days = days;
            fields.push("duration_days");
        }
        None if reschedules => {
            task.duration_days =
                validate::default_duration_days(task.kind, task.planned_start, task.planned_end);
        }
        None => {}
    }
    validate::check_duration(task.kind, task.duration_days)?;

    let mut moved_subtree = Vec::new();
    if touches_hierarchy {
        let tree = load_tree(tx, &task.schedule_id)?;
        let mut parent_changed = false;
        if let Some(parent_id) = parent_id {
            let parent_id = non_blank(parent_id);
            task.wbs_level = match parent_id.as_deref() {
                Some(parent) => parent_level(tx, &task.schedule_id, parent)? + 1,
                None => 0,
            };
            tree.check_reparent(&task.id, parent_id.as_deref())?;
            parent_changed = parent_id != task.parent_id;
            task.parent_id = parent_id;
            fields.push("parent_id");
        }

        let parent = task.parent_id.as_deref();
        let order = match wbs_order {
            Some(order) => Some(order),
            None if parent_changed => Some(tree.next_sibling_order(parent)),
            None => None,
        };
        if let Some(order) = order {
            validate::check_order(order)?;
            if tree.sibling_order_taken(parent, order, Some(&task.id)) {
                return Err(ValidationError::SiblingOrderTaken { order }.into());
            }
            task.wbs_order = order;
            fields.push("wbs_order");
        }

        if task.wbs_level != before_level {
            moved_subtree = tree
                .descendants(&task.id)
                .into_iter()
                .map(str::to_string)
                .collect();
        }
    }

    let now_ms = now_ms();
    task.revision += 1;
    task.updated_at_ms = now_ms;
    write_task(tx, &task)?;

    let level_delta = task.wbs_level - before_level;
    for descendant in moved_subtree.iter() {
        tx.execute(
            "UPDATE tasks SET wbs_level = wbs_level + ?2, updated_at_ms=?3 WHERE id=?1",
            params![descendant, level_delta, now_ms],
        )?;
    }

    insert_event_tx(
        tx,
        &task.schedule_id,
        now_ms,
        Some(&task.id),
        "task_updated",
        json!({
            "revision": task.revision,
            "fields": fields,
            "relevelled": moved_subtree.len(),
        }),
    )?;
    Ok((task, fields))
}
