#![forbid(unsafe_code)]

use super::*;
use rusqlite::Transaction;
use serde_json::json;

impl SqliteStore {
    /// Renumbers the children of `parent_id` (the roots when `None`) to `1..=n`, keeping
    /// their current relative order. Returns the siblings in their new order.
    pub fn resequence_siblings(
        &mut self,
        schedule_id: &str,
        parent_id: Option<&str>,
    ) -> Result<Vec<Task>, StoreError> {
        let tx = self.conn.transaction()?;
        let (siblings, renumbered) = resequence_siblings_tx(&tx, schedule_id, parent_id)
            .inspect_err(|err| log_rejected("resequence_siblings", err))?;
        tx.commit()?;

        if renumbered > 0 {
            self.cache.invalidate(schedule_id);
        }
        tracing::info!(
            schedule = %schedule_id,
            parent = parent_id.unwrap_or("-"),
            siblings = siblings.len(),
            renumbered,
            "siblings resequenced"
        );
        Ok(siblings)
    }
}

fn resequence_siblings_tx(
    tx: &Transaction<'_>,
    schedule_id: &str,
    parent_id: Option<&str>,
) -> Result<(Vec<Task>, usize), StoreError> {
    let schedule = require_schedule(tx, schedule_id)?;
    if let Some(parent_id) = parent_id {
        parent_level(tx, &schedule.id, parent_id)?;
    }

    let tree = load_tree(tx, &schedule.id)?;
    let siblings: Vec<String> = tree
        .siblings_under(parent_id)
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut moves = Vec::new();
    for (idx, task_id) in siblings.iter().enumerate() {
        let target = to_sqlite_i64(idx + 1)?;
        let task = require_task(tx, task_id)?;
        if task.wbs_order != target {
            moves.push((task_id.as_str(), target));
        }
    }

    // Park the moved rows on negative slots first so no intermediate state hits the
    // sibling order index.
    let now_ms = now_ms();
    for (task_id, target) in moves.iter() {
        tx.execute(
            "UPDATE tasks SET wbs_order=?2 WHERE id=?1",
            params![task_id, -target],
        )?;
    }
    for (task_id, target) in moves.iter() {
        tx.execute(
            "UPDATE tasks SET wbs_order=?2, revision=revision+1, updated_at_ms=?3 WHERE id=?1",
            params![task_id, target, now_ms],
        )?;
    }

    if !moves.is_empty() {
        insert_event_tx(
            tx,
            &schedule.id,
            now_ms,
            None,
            "siblings_resequenced",
            json!({ "parent_id": parent_id, "order": siblings }),
        )?;
    }

    let mut out = Vec::with_capacity(siblings.len());
    for task_id in siblings.iter() {
        let mut task = require_task(tx, task_id)?;
        task.predecessors = predecessors_of(tx, task_id)?;
        out.push(task);
    }
    Ok((out, moves.len()))
}
