#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE INDEX IF NOT EXISTS idx_schedules_project ON schedules(project_id, created_at_ms);
        CREATE INDEX IF NOT EXISTS idx_tasks_schedule_order ON tasks(schedule_id, wbs_order);
        CREATE INDEX IF NOT EXISTS idx_tasks_parent ON tasks(parent_id);
        CREATE UNIQUE INDEX IF NOT EXISTS ux_tasks_sibling_order
          ON tasks(schedule_id, COALESCE(parent_id, ''), wbs_order);
        CREATE INDEX IF NOT EXISTS idx_dependencies_schedule ON dependencies(schedule_id);
        CREATE INDEX IF NOT EXISTS idx_dependencies_successor ON dependencies(successor_task_id);
        CREATE INDEX IF NOT EXISTS idx_resources_task ON resource_assignments(task_id);
        CREATE INDEX IF NOT EXISTS idx_schedule_events_seq ON schedule_events(schedule_id, seq);
"#;
