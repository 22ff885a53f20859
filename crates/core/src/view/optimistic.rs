#![forbid(unsafe_code)]

use chrono::NaiveDate;

use super::ScheduleView;
use crate::model::{DependencyEdge, Task};
use crate::validate::{self, ValidationError};

/// A local edit made on the timeline before the store has confirmed it.
#[derive(Clone, Debug, PartialEq)]
pub enum TimelineEdit {
    /// Shift the bar so it starts on `start`, keeping its span.
    Move { task_id: String, start: NaiveDate },
    /// Change the planned end, keeping the start.
    Resize { task_id: String, end: NaiveDate },
    Progress { task_id: String, percent: f64 },
    Delete { task_id: String },
}

impl TimelineEdit {
    pub fn task_id(&self) -> &str {
        match self {
            TimelineEdit::Move { task_id, .. }
            | TimelineEdit::Resize { task_id, .. }
            | TimelineEdit::Progress { task_id, .. }
            | TimelineEdit::Delete { task_id } => task_id,
        }
    }
}

/// Ticket for an applied local edit. Holds the exact state seen before the edit.
#[derive(Debug)]
#[must_use = "a pending edit must be settled or rolled back"]
pub struct PendingEdit {
    generation: u64,
    tasks: Vec<Task>,
    edges: Vec<DependencyEdge>,
}

impl PendingEdit {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Client-side copy of a schedule that applies edits immediately and reconciles them
/// with the store afterwards.
///
/// Only the newest pending edit may roll back or settle; a result that arrives after a
/// newer edit was applied is dropped and the caller reloads with [`Self::replace`].
#[derive(Clone, Debug, Default)]
pub struct OptimisticTimeline {
    tasks: Vec<Task>,
    edges: Vec<DependencyEdge>,
    generation: u64,
}

impl OptimisticTimeline {
    pub fn new(tasks: Vec<Task>, edges: Vec<DependencyEdge>) -> Self {
        Self {
            tasks,
            edges,
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn edges(&self) -> &[DependencyEdge] {
        &self.edges
    }

    pub fn view(&self) -> ScheduleView {
        ScheduleView::from_parts(self.tasks.clone(), &self.edges)
    }

    pub fn apply(&mut self, edit: TimelineEdit) -> Result<PendingEdit, ValidationError> {
        let before_tasks = self.tasks.clone();
        let before_edges = self.edges.clone();

        let Some(slot) = self.tasks.iter().position(|t| t.id == edit.task_id()) else {
            return Err(ValidationError::UnknownTask(edit.task_id().to_string()));
        };

        match edit {
            TimelineEdit::Move { start, .. } => {
                let task = &mut self.tasks[slot];
                let span = task.planned_end - task.planned_start;
                let end = start
                    .checked_add_signed(span)
                    .ok_or(ValidationError::DateOutOfRange(start))?;
                validate::check_dates(task.kind, start, end)?;
                task.planned_start = start;
                task.planned_end = end;
            }
            TimelineEdit::Resize { end, .. } => {
                let task = &mut self.tasks[slot];
                validate::check_dates(task.kind, task.planned_start, end)?;
                task.planned_end = end;
                task.duration_days =
                    validate::default_duration_days(task.kind, task.planned_start, end);
            }
            TimelineEdit::Progress { percent, .. } => {
                validate::check_percent(percent)?;
                self.tasks[slot].percent_complete = percent;
            }
            TimelineEdit::Delete { task_id } => {
                let children = self
                    .tasks
                    .iter()
                    .filter(|t| t.parent_id.as_deref() == Some(task_id.as_str()))
                    .count();
                if children > 0 {
                    return Err(ValidationError::HasChildren {
                        task: task_id,
                        children,
                    });
                }
                self.tasks.remove(slot);
                self.edges.retain(|e| {
                    e.predecessor_task_id != task_id && e.successor_task_id != task_id
                });
                for task in self.tasks.iter_mut() {
                    task.predecessors.retain(|p| *p != task_id);
                }
            }
        }

        self.generation += 1;
        Ok(PendingEdit {
            generation: self.generation,
            tasks: before_tasks,
            edges: before_edges,
        })
    }

    /// Restores the state captured by `pending`. Returns `false` without touching
    /// anything when a newer edit has been applied since.
    pub fn rollback(&mut self, pending: PendingEdit) -> bool {
        if pending.generation != self.generation {
            return false;
        }
        self.tasks = pending.tasks;
        self.edges = pending.edges;
        self.generation += 1;
        true
    }

    /// Installs the reloaded store state once the mutation behind `pending` succeeded.
    pub fn settle(
        &mut self,
        pending: PendingEdit,
        tasks: Vec<Task>,
        edges: Vec<DependencyEdge>,
    ) -> bool {
        if pending.generation != self.generation {
            return false;
        }
        self.replace(tasks, edges);
        true
    }

    pub fn replace(&mut self, tasks: Vec<Task>, edges: Vec<DependencyEdge>) {
        self.tasks = tasks;
        self.edges = edges;
        self.generation += 1;
    }
}
