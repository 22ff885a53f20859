#![forbid(unsafe_code)]

pub(super) const SQL: &str = r#"

        CREATE TABLE IF NOT EXISTS resource_assignments (
          id TEXT PRIMARY KEY,
          task_id TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
          resource_kind TEXT NOT NULL
            CHECK (resource_kind IN ('labor', 'material', 'equipment', 'cost')),
          labor_ref TEXT,
          external_resource_name TEXT,
          unit TEXT,
          planned_quantity REAL NOT NULL DEFAULT 0 CHECK (planned_quantity >= 0),
          unit_cost REAL NOT NULL DEFAULT 0 CHECK (unit_cost >= 0),
          planned_total_cost REAL NOT NULL DEFAULT 0 CHECK (planned_total_cost >= 0),
          created_at_ms INTEGER NOT NULL,
          CHECK (resource_kind <> 'labor' OR labor_ref IS NOT NULL)
        );
"#;
