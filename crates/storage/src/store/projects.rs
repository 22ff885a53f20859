#![forbid(unsafe_code)]

use super::*;
use rusqlite::{OptionalExtension, params};
use wbs_core::ids::ProjectId;
use wbs_core::model::Project;
use wbs_core::validate;

impl SqliteStore {
    /// Registers a project owned by the surrounding application.
    pub fn create_project(&mut self, id: &ProjectId, name: &str) -> Result<Project, StoreError> {
        let name = validate::required_name("name", name)?;
        let now_ms = now_ms();
        let inserted = self.conn.execute(
            "INSERT INTO projects(id, name, created_at_ms) VALUES (?1, ?2, ?3)",
            params![id.as_str(), name, now_ms],
        );
        if let Err(err) = inserted {
            if error::is_constraint_violation(&err) {
                return Err(StoreError::InvalidInput("project already exists"));
            }
            return Err(err.into());
        }
        tracing::info!(project = %id, "project registered");
        Ok(Project {
            id: id.clone(),
            name,
            created_at_ms: now_ms,
        })
    }

    pub fn project_exists(&self, id: &ProjectId) -> Result<bool, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT 1 FROM projects WHERE id=?1",
                params![id.as_str()],
                |_| Ok(()),
            )
            .optional()?
            .is_some())
    }

    /// Deletes a project; its schedules, tasks, edges and assignments go with it.
    pub fn delete_project(&mut self, id: &ProjectId) -> Result<(), StoreError> {
        let removed = self
            .conn
            .execute("DELETE FROM projects WHERE id=?1", params![id.as_str()])?;
        if removed == 0 {
            return Err(StoreError::unknown("project", id.as_str()));
        }
        self.cache.clear();
        tracing::info!(project = %id, "project deleted");
        Ok(())
    }
}
