#![forbid(unsafe_code)]

use super::*;
use rusqlite::Transaction;
use serde_json::json;

impl SqliteStore {
    /// Deletes a task together with every dependency edge and resource assignment that
    /// references it, returning the ids of the deleted tasks.
    ///
    /// A task with children is refused unless `cascade` is set, in which case the whole
    /// subtree goes.
    pub fn delete_task(&mut self, request: DeleteTaskRequest) -> Result<Vec<String>, StoreError> {
        let tx = self.conn.transaction()?;
        let (schedule_id, deleted, edges_removed) =
            delete_task_tx(&tx, &request).inspect_err(|err| log_rejected("delete_task", err))?;
        tx.commit()?;

        self.cache.invalidate(&schedule_id);
        tracing::info!(
            schedule = %schedule_id,
            task = %request.id,
            tasks = deleted.len(),
            edges = edges_removed,
            "task deleted"
        );
        Ok(deleted)
    }
}

fn delete_task_tx(
    tx: &Transaction<'_>,
    request: &DeleteTaskRequest,
) -> Result<(String, Vec<String>, usize), StoreError> {
    let task = require_task(tx, &request.id)?;
    let children = count_children_tx(tx, &task.id)?;
    if children > 0 && !request.cascade {
        return Err(ValidationError::HasChildren {
            task: task.id,
            children,
        }
        .into());
    }

    let deleted = collect_task_subtree_ids_tx(tx, &task.id)?;
    let edges_removed = delete_task_rows_tx(tx, &deleted)?;
    insert_event_tx(
        tx,
        &task.schedule_id,
        now_ms(),
        Some(&task.id),
        "task_deleted",
        json!({ "deleted": deleted, "edges_removed": edges_removed }),
    )?;
    Ok((task.schedule_id, deleted, edges_removed))
}
