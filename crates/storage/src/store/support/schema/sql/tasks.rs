#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        -- parent_id has no ON DELETE action: children are removed explicitly (leaves first)
        -- or the delete is rejected before it reaches SQLite.
        CREATE TABLE IF NOT EXISTS tasks (
          id TEXT PRIMARY KEY,
          schedule_id TEXT NOT NULL REFERENCES schedules(id) ON DELETE CASCADE,
          parent_id TEXT REFERENCES tasks(id),
          name TEXT NOT NULL,
          description TEXT,
          kind TEXT NOT NULL DEFAULT 'task' CHECK (kind IN ('task', 'phase', 'milestone')),
          planned_start TEXT NOT NULL,
          planned_end TEXT NOT NULL,
          duration_days INTEGER NOT NULL DEFAULT 0 CHECK (duration_days >= 0),
          percent_complete REAL NOT NULL DEFAULT 0
            CHECK (percent_complete >= 0 AND percent_complete <= 100),
          status TEXT NOT NULL DEFAULT 'not_started',
          wbs_order INTEGER NOT NULL,
          wbs_level INTEGER NOT NULL DEFAULT 0 CHECK (wbs_level >= 0),
          revision INTEGER NOT NULL DEFAULT 0,
          created_at_ms INTEGER NOT NULL,
          updated_at_ms INTEGER NOT NULL,
          CHECK (planned_start <= planned_end),
          CHECK (kind <> 'milestone' OR planned_start = planned_end)
        );
"#;
