#![forbid(unsafe_code)]

use super::*;

impl SqliteStore {
    /// One task with its predecessor ids resolved.
    pub fn get_task(&self, task_id: &str) -> Result<Task, StoreError> {
        let mut task = require_task(&self.conn, task_id)?;
        task.predecessors = predecessors_of(&self.conn, task_id)?;
        Ok(task)
    }

    /// Tasks of a schedule ordered by `wbs_order`, each carrying its predecessor ids.
    pub fn list_tasks(&self, schedule_id: &str) -> Result<Vec<Task>, StoreError> {
        Ok(self.schedule_snapshot(schedule_id)?.tasks.clone())
    }
}
