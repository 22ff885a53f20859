#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS schedules (
          id TEXT PRIMARY KEY,
          project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
          name TEXT NOT NULL,
          is_active INTEGER NOT NULL DEFAULT 0 CHECK (is_active IN (0, 1)),
          base_start_date TEXT NOT NULL,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL
        );

        -- One active schedule per project.
        CREATE UNIQUE INDEX IF NOT EXISTS ux_schedules_active
          ON schedules(project_id) WHERE is_active = 1;

        CREATE TABLE IF NOT EXISTS schedule_events (
          seq INTEGER PRIMARY KEY AUTOINCREMENT,
          schedule_id TEXT NOT NULL REFERENCES schedules(id) ON DELETE CASCADE,
          ts_ms INTEGER NOT NULL,
          task_id TEXT,
          type TEXT NOT NULL,
          payload_json TEXT NOT NULL
        );
"#;
