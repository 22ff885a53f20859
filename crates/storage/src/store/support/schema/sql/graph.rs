#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS dependencies (
          id TEXT PRIMARY KEY,
          schedule_id TEXT NOT NULL REFERENCES schedules(id) ON DELETE CASCADE,
          predecessor_task_id TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
          successor_task_id TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
          link_type TEXT NOT NULL DEFAULT 'FS' CHECK (link_type IN ('FS', 'SS', 'FF', 'SF')),
          lag_days INTEGER NOT NULL DEFAULT 0,
          created_at_ms INTEGER NOT NULL,
          CHECK (predecessor_task_id <> successor_task_id),
          UNIQUE (predecessor_task_id, successor_task_id)
        );
"#;
