#![forbid(unsafe_code)]

//! Timeline projection consumed by the Gantt widget.
//!
//! A [`ScheduleView`] is derived from the current tasks and edges and owns no state of its
//! own. [`ScheduleView::rows`] can be called any number of times; every call walks the
//! same ordered task list again.

mod optimistic;

pub use optimistic::{OptimisticTimeline, PendingEdit, TimelineEdit};

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{DependencyEdge, LinkType, Task, TaskKind};
use crate::wbs::WbsTree;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bar {
    Task,
    Summary,
    Milestone,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DependencyRef {
    pub edge_id: String,
    pub predecessor_task_id: String,
    pub link_type: LinkType,
    pub lag_days: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TimelineRow {
    pub task_id: String,
    pub name: String,
    pub kind: TaskKind,
    pub bar: Bar,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub progress: f64,
    pub level: i64,
    pub parent: Option<String>,
    pub dependencies: Vec<DependencyRef>,
}

#[derive(Clone, Debug)]
pub struct ScheduleView {
    tasks: Vec<Task>,
    order: Vec<usize>,
    slots: HashMap<String, usize>,
    inbound: HashMap<String, Vec<DependencyRef>>,
    tree: WbsTree,
}

impl ScheduleView {
    pub fn from_parts(tasks: Vec<Task>, edges: &[DependencyEdge]) -> Self {
        let tree = WbsTree::from_tasks(&tasks);
        let slots = tasks
            .iter()
            .enumerate()
            .map(|(slot, task)| (task.id.clone(), slot))
            .collect::<HashMap<_, _>>();

        let mut order: Vec<usize> = (0..tasks.len()).collect();
        order.sort_by(|a, b| {
            let (a, b) = (&tasks[*a], &tasks[*b]);
            a.wbs_order
                .cmp(&b.wbs_order)
                .then_with(|| a.wbs_level.cmp(&b.wbs_level))
                .then_with(|| a.id.cmp(&b.id))
        });

        let mut inbound: HashMap<String, Vec<DependencyRef>> = HashMap::new();
        for edge in edges {
            if !slots.contains_key(&edge.predecessor_task_id) {
                continue;
            }
            inbound
                .entry(edge.successor_task_id.clone())
                .or_default()
                .push(DependencyRef {
                    edge_id: edge.id.clone(),
                    predecessor_task_id: edge.predecessor_task_id.clone(),
                    link_type: edge.link_type,
                    lag_days: edge.lag_days,
                });
        }
        for refs in inbound.values_mut() {
            refs.sort_by(|a, b| a.predecessor_task_id.cmp(&b.predecessor_task_id));
        }

        Self {
            tasks,
            order,
            slots,
            inbound,
            tree,
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn tree(&self) -> &WbsTree {
        &self.tree
    }

    pub fn rows(&self) -> impl Iterator<Item = TimelineRow> + '_ {
        self.order.iter().map(move |slot| self.row(&self.tasks[*slot]))
    }

    pub fn row_for(&self, task_id: &str) -> Option<TimelineRow> {
        self.slots.get(task_id).map(|slot| self.row(&self.tasks[*slot]))
    }

    fn row(&self, task: &Task) -> TimelineRow {
        let (bar, start, end, progress) = match task.kind {
            TaskKind::Milestone => (
                Bar::Milestone,
                task.planned_start,
                task.planned_start,
                task.percent_complete,
            ),
            TaskKind::Phase => {
                let (start, end, progress) = self.summary_of(task);
                (Bar::Summary, start, end, progress)
            }
            TaskKind::Task => (
                Bar::Task,
                task.planned_start,
                task.planned_end,
                task.percent_complete,
            ),
        };

        TimelineRow {
            task_id: task.id.clone(),
            name: task.name.clone(),
            kind: task.kind,
            bar,
            start,
            end,
            progress,
            level: self.tree.level_of(&task.id).unwrap_or(task.wbs_level),
            parent: self.tree.parent_of(&task.id).map(str::to_string),
            dependencies: self.inbound.get(&task.id).cloned().unwrap_or_default(),
        }
    }

    /// Span of all descendants and the duration-weighted progress of the leaf tasks
    /// below a phase. A phase without children keeps its own dates and progress.
    fn summary_of(&self, phase: &Task) -> (NaiveDate, NaiveDate, f64) {
        let descendants: Vec<&Task> = self
            .tree
            .descendants(&phase.id)
            .into_iter()
            .filter_map(|id| self.slots.get(id).map(|slot| &self.tasks[*slot]))
            .collect();
        if descendants.is_empty() {
            return (phase.planned_start, phase.planned_end, phase.percent_complete);
        }

        let start = descendants
            .iter()
            .map(|t| t.planned_start)
            .min()
            .unwrap_or(phase.planned_start);
        let end = descendants
            .iter()
            .map(|t| t.planned_end)
            .max()
            .unwrap_or(phase.planned_end);

        let leaves: Vec<&&Task> = descendants
            .iter()
            .filter(|t| !t.is_phase() && self.tree.children_of(&t.id).is_empty())
            .collect();
        if leaves.is_empty() {
            return (start, end, phase.percent_complete);
        }
        let weight: i64 = leaves.iter().map(|t| t.duration_days.max(0)).sum();
        let progress = if weight > 0 {
            leaves
                .iter()
                .map(|t| t.percent_complete * t.duration_days.max(0) as f64)
                .sum::<f64>()
                / weight as f64
        } else {
            leaves.iter().map(|t| t.percent_complete).sum::<f64>() / leaves.len() as f64
        };
        (start, end, progress)
    }
}

#[cfg(test)]
mod tests;
