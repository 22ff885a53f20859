#![forbid(unsafe_code)]

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use wbs_core::model::{TaskKind, TaskStatus};

/// Input of `create_task`. Only `schedule_id` and `name` are required; a blank value in
/// either is rejected as a missing field.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CreateTaskRequest {
    pub schedule_id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub description: Option<String>,
    pub kind: TaskKind,
    pub planned_start: Option<NaiveDate>,
    pub planned_end: Option<NaiveDate>,
    pub duration_days: Option<i64>,
    pub percent_complete: Option<f64>,
    pub status: TaskStatus,
    /// Next free sibling position when omitted.
    pub wbs_order: Option<i64>,
}

impl CreateTaskRequest {
    pub fn new(schedule_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schedule_id: schedule_id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: TaskKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_parent(mut self, parent_id: impl Into<String>) -> Self {
        self.parent_id = Some(parent_id.into());
        self
    }

    pub fn with_dates(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.planned_start = Some(start);
        self.planned_end = Some(end);
        self
    }

    pub fn with_order(mut self, wbs_order: i64) -> Self {
        self.wbs_order = Some(wbs_order);
        self
    }
}

/// Partial task update. Fields left `None` keep their stored value; the nested options
/// distinguish "clear" (`Some(None)`) from "keep" (`None`).
///
/// A `predecessors` key in incoming JSON is dropped during deserialization; edges change
/// only through the dependency calls.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TaskPatch {
    pub name: Option<String>,
    #[serde(deserialize_with = "double_option")]
    pub description: Option<Option<String>>,
    #[serde(deserialize_with = "double_option")]
    pub parent_id: Option<Option<String>>,
    pub kind: Option<TaskKind>,
    pub planned_start: Option<NaiveDate>,
    pub planned_end: Option<NaiveDate>,
    pub duration_days: Option<i64>,
    pub percent_complete: Option<f64>,
    pub status: Option<TaskStatus>,
    pub wbs_order: Option<i64>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub(crate) fn touches_hierarchy(&self) -> bool {
        self.parent_id.is_some() || self.wbs_order.is_some()
    }
}

fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpdateTaskRequest {
    pub id: String,
    /// Rejects the update when the stored revision moved on.
    pub expected_revision: Option<i64>,
    pub patch: TaskPatch,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteTaskRequest {
    pub id: String,
    /// Delete the whole subtree instead of refusing while children exist.
    pub cascade: bool,
}

impl DeleteTaskRequest {
    pub fn leaf(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cascade: false,
        }
    }

    pub fn subtree(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            cascade: true,
        }
    }
}
