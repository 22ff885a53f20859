#![forbid(unsafe_code)]

use super::*;
use std::sync::Arc;
use wbs_core::model::{DependencyEdge, Schedule, Task};
use wbs_core::{DependencyGraph, OptimisticTimeline, ScheduleView};

/// Everything a timeline needs from one schedule, read in a single transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleSnapshot {
    pub schedule: Schedule,
    /// Ordered by `wbs_order`, predecessors attached.
    pub tasks: Vec<Task>,
    pub edges: Vec<DependencyEdge>,
}

impl ScheduleSnapshot {
    pub fn view(&self) -> ScheduleView {
        ScheduleView::from_parts(self.tasks.clone(), &self.edges)
    }

    /// Precedence graph including tasks that have no edges.
    pub fn graph(&self) -> DependencyGraph {
        let mut graph = DependencyGraph::from_edges(&self.edges);
        for task in self.tasks.iter() {
            graph.add_task(&task.id);
        }
        graph
    }

    /// Starts an optimistic editing session over this snapshot.
    pub fn timeline(&self) -> OptimisticTimeline {
        OptimisticTimeline::new(self.tasks.clone(), self.edges.clone())
    }
}

impl SqliteStore {
    pub fn schedule_snapshot(&self, schedule_id: &str) -> Result<Arc<ScheduleSnapshot>, StoreError> {
        if let Some(snapshot) = self.cache.get(schedule_id) {
            tracing::debug!(schedule = %schedule_id, "schedule snapshot cache hit");
            return Ok(snapshot);
        }

        let tx = self.conn.unchecked_transaction()?;
        let schedule = require_schedule(&tx, schedule_id)?;
        let mut tasks = load_schedule_tasks(&tx, schedule_id)?;
        let edges = load_schedule_edges(&tx, schedule_id)?;
        tx.commit()?;
        attach_predecessors(&mut tasks, &edges);

        tracing::debug!(
            schedule = %schedule_id,
            tasks = tasks.len(),
            edges = edges.len(),
            "schedule snapshot loaded"
        );
        let snapshot = Arc::new(ScheduleSnapshot {
            schedule,
            tasks,
            edges,
        });
        self.cache.put(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Renderable timeline of a schedule.
    pub fn schedule_view(&self, schedule_id: &str) -> Result<ScheduleView, StoreError> {
        Ok(self.schedule_snapshot(schedule_id)?.view())
    }
}
