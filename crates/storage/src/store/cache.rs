#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use super::ScheduleSnapshot;

/// Per-schedule read cache. Every mutation drops the entry of the schedule it touched
/// before returning, so a read never crosses a mutation boundary.
#[derive(Debug, Default)]
pub(super) struct SnapshotCache {
    enabled: bool,
    entries: RefCell<HashMap<String, Arc<ScheduleSnapshot>>>,
}

impl SnapshotCache {
    pub(super) fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: RefCell::new(HashMap::new()),
        }
    }

    pub(super) fn get(&self, schedule_id: &str) -> Option<Arc<ScheduleSnapshot>> {
        if !self.enabled {
            return None;
        }
        self.entries.borrow().get(schedule_id).cloned()
    }

    pub(super) fn put(&self, snapshot: Arc<ScheduleSnapshot>) {
        if !self.enabled {
            return;
        }
        self.entries
            .borrow_mut()
            .insert(snapshot.schedule.id.clone(), snapshot);
    }

    pub(super) fn invalidate(&self, schedule_id: &str) {
        self.entries.borrow_mut().remove(schedule_id);
    }

    pub(super) fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    pub(super) fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}
