#![forbid(unsafe_code)]

//! Records of the schedule engine: projects, schedules, WBS tasks, precedence
//! edges and resource assignments.
//!
//! Ids of schedules, tasks, edges and assignments are opaque strings generated by the
//! store (`SCH-001`, `TASK-001`, ...).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::ProjectId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    #[default]
    Task,
    Phase,
    Milestone,
}

impl TaskKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Task => "task",
            TaskKind::Phase => "phase",
            TaskKind::Milestone => "milestone",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "task" => Some(TaskKind::Task),
            "phase" => Some(TaskKind::Phase),
            "milestone" => Some(TaskKind::Milestone),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    NotStarted,
    InProgress,
    Completed,
    OnHold,
    Cancelled,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "not_started",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Completed => "completed",
            TaskStatus::OnHold => "on_hold",
            TaskStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "not_started" => Some(TaskStatus::NotStarted),
            "in_progress" => Some(TaskStatus::InProgress),
            "completed" => Some(TaskStatus::Completed),
            "on_hold" => Some(TaskStatus::OnHold),
            "cancelled" => Some(TaskStatus::Cancelled),
            _ => None,
        }
    }
}

/// Precedence link semantics. Finish-to-start is the default.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum LinkType {
    #[default]
    #[serde(rename = "FS")]
    FinishToStart,
    #[serde(rename = "SS")]
    StartToStart,
    #[serde(rename = "FF")]
    FinishToFinish,
    #[serde(rename = "SF")]
    StartToFinish,
}

impl LinkType {
    pub fn as_str(self) -> &'static str {
        match self {
            LinkType::FinishToStart => "FS",
            LinkType::StartToStart => "SS",
            LinkType::FinishToFinish => "FF",
            LinkType::StartToFinish => "SF",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "FS" => Some(LinkType::FinishToStart),
            "SS" => Some(LinkType::StartToStart),
            "FF" => Some(LinkType::FinishToFinish),
            "SF" => Some(LinkType::StartToFinish),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Labor,
    Material,
    Equipment,
    Cost,
}

impl ResourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Labor => "labor",
            ResourceKind::Material => "material",
            ResourceKind::Equipment => "equipment",
            ResourceKind::Cost => "cost",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "labor" => Some(ResourceKind::Labor),
            "material" => Some(ResourceKind::Material),
            "equipment" => Some(ResourceKind::Equipment),
            "cost" => Some(ResourceKind::Cost),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub created_at_ms: i64,
}

/// Named container of tasks and dependencies for one project.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: String,
    pub project_id: ProjectId,
    pub name: String,
    pub is_active: bool,
    pub base_start_date: NaiveDate,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

/// A WBS task.
///
/// `predecessors` is resolved from the dependency edges when tasks are listed; it is
/// never written back through task updates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub schedule_id: String,
    pub parent_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub kind: TaskKind,
    pub planned_start: NaiveDate,
    pub planned_end: NaiveDate,
    pub duration_days: i64,
    pub percent_complete: f64,
    pub status: TaskStatus,
    pub wbs_order: i64,
    pub wbs_level: i64,
    pub revision: i64,
    #[serde(default)]
    pub predecessors: Vec<String>,
    pub created_at_ms: i64,
    pub updated_at_ms: i64,
}

impl Task {
    pub fn is_milestone(&self) -> bool {
        self.kind == TaskKind::Milestone
    }

    pub fn is_phase(&self) -> bool {
        self.kind == TaskKind::Phase
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub id: String,
    pub schedule_id: String,
    pub predecessor_task_id: String,
    pub successor_task_id: String,
    pub link_type: LinkType,
    pub lag_days: i64,
    pub created_at_ms: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceAssignment {
    pub id: String,
    pub task_id: String,
    pub resource_kind: ResourceKind,
    pub labor_ref: Option<String>,
    pub external_resource_name: Option<String>,
    pub unit: Option<String>,
    pub planned_quantity: f64,
    pub unit_cost: f64,
    pub planned_total_cost: f64,
    pub created_at_ms: i64,
}

/// Planned cost of a task split by resource kind.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    pub labor: f64,
    pub material: f64,
    pub equipment: f64,
    pub cost: f64,
}

impl CostSummary {
    pub fn add(&mut self, kind: ResourceKind, amount: f64) {
        match kind {
            ResourceKind::Labor => self.labor += amount,
            ResourceKind::Material => self.material += amount,
            ResourceKind::Equipment => self.equipment += amount,
            ResourceKind::Cost => self.cost += amount,
        }
    }

    pub fn total(&self) -> f64 {
        self.labor + self.material + self.equipment + self.cost
    }
}
