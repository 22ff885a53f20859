#![forbid(unsafe_code)]

use super::super::super::StoreError;
use rusqlite::{Transaction, params};

/// `root_task_id` followed by all of its descendants, parents before children.
pub(in crate::store) fn collect_task_subtree_ids_tx(
    tx: &Transaction<'_>,
    root_task_id: &str,
) -> Result<Vec<String>, StoreError> {
    let mut out = Vec::new();
    let mut stack = vec![root_task_id.to_string()];
    let mut stmt = tx.prepare("SELECT id FROM tasks WHERE parent_id=?1 ORDER BY wbs_order DESC")?;
    while let Some(current) = stack.pop() {
        let rows = stmt.query_map(params![current], |row| row.get::<_, String>(0))?;
        for task_id in rows {
            stack.push(task_id?);
        }
        out.push(current);
    }
    Ok(out)
}

pub(in crate::store) fn count_children_tx(tx: &Transaction<'_>, task_id: &str) -> Result<usize, StoreError> {
    let count = tx.query_row(
        "SELECT COUNT(1) FROM tasks WHERE parent_id=?1",
        params![task_id],
        |row| row.get::<_, i64>(0),
    )?;
    Ok(usize::try_from(count).unwrap_or(0))
}

/// Removes the rows of the given tasks together with their edges and resource
/// assignments. `task_ids` must list parents before children.
pub(in crate::store) fn delete_task_rows_tx(
    tx: &Transaction<'_>,
    task_ids: &[String],
) -> Result<usize, StoreError> {
    let mut edges_removed = 0usize;
    for task_id in task_ids.iter() {
        edges_removed += tx.execute(
            "DELETE FROM dependencies WHERE predecessor_task_id=?1 OR successor_task_id=?1",
            params![task_id],
        )?;
        tx.execute(
            "DELETE FROM resource_assignments WHERE task_id=?1",
            params![task_id],
        )?;
    }
    for task_id in task_ids.iter().rev() {
        tx.execute("DELETE FROM tasks WHERE id=?1", params![task_id])?;
    }
    Ok(edges_removed)
}
