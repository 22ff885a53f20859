#![forbid(unsafe_code)]
#![allow(dead_code)]

use chrono::NaiveDate;
use std::path::PathBuf;
use wbs_core::ids::ProjectId;
use wbs_core::model::{Schedule, Task, TaskKind};
use wbs_storage::{CreateTaskRequest, SqliteStore};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let dir = base.join(format!("wbs_storage_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn project(id: &str) -> ProjectId {
    ProjectId::try_new(id).expect("project id")
}

/// In-memory store with project `P1` and its active schedule.
pub fn store_with_schedule() -> (SqliteStore, Schedule) {
    init_tracing();
    let mut store = SqliteStore::open_in_memory().expect("open store");
    let p1 = project("P1");
    store.create_project(&p1, "Tower A").expect("create project");
    let schedule = store
        .get_or_create_active_schedule(&p1)
        .expect("active schedule");
    (store, schedule)
}

pub fn create_task(
    store: &mut SqliteStore,
    schedule_id: &str,
    name: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Task {
    store
        .create_task(CreateTaskRequest::new(schedule_id, name).with_dates(start, end))
        .expect("create task")
}

pub fn create_child(
    store: &mut SqliteStore,
    schedule_id: &str,
    parent_id: &str,
    name: &str,
) -> Task {
    store
        .create_task(
            CreateTaskRequest::new(schedule_id, name)
                .with_parent(parent_id)
                .with_dates(day(2024, 1, 1), day(2024, 1, 5)),
        )
        .expect("create child")
}

pub fn create_phase(store: &mut SqliteStore, schedule_id: &str, name: &str) -> Task {
    store
        .create_task(
            CreateTaskRequest::new(schedule_id, name)
                .with_kind(TaskKind::Phase)
                .with_dates(day(2024, 1, 1), day(2024, 1, 31)),
        )
        .expect("create phase")
}
