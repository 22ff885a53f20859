#![forbid(unsafe_code)]

//! Work-breakdown hierarchy as an arena indexed by task id.
//!
//! Parent/child links are slot indices resolved by lookup, never references between
//! tasks. A `parent_id` that does not resolve inside the arena leaves the task as a root
//! and is reported by [`WbsTree::orphans`].

use std::collections::HashMap;

use crate::model::Task;
use crate::validate::ValidationError;

#[derive(Clone, Debug)]
struct WbsNode {
    id: String,
    parent: Option<usize>,
    children: Vec<usize>,
    order: i64,
}

#[derive(Clone, Debug, Default)]
pub struct WbsTree {
    nodes: Vec<WbsNode>,
    index: HashMap<String, usize>,
    orphans: Vec<String>,
}

impl WbsTree {
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let tasks: Vec<&Task> = tasks.into_iter().collect();
        let mut tree = WbsTree::default();
        for task in tasks.iter() {
            let slot = tree.nodes.len();
            tree.index.insert(task.id.clone(), slot);
            tree.nodes.push(WbsNode {
                id: task.id.clone(),
                parent: None,
                children: Vec::new(),
                order: task.wbs_order,
            });
        }

        for (slot, task) in tasks.iter().enumerate() {
            let Some(parent_id) = task.parent_id.as_deref() else {
                continue;
            };
            match tree.index.get(parent_id).copied() {
                Some(parent) if parent != slot => {
                    tree.nodes[slot].parent = Some(parent);
                    tree.nodes[parent].children.push(slot);
                }
                _ => tree.orphans.push(task.id.clone()),
            }
        }

        let nodes = &tree.nodes;
        let mut sorted: Vec<Vec<usize>> = nodes.iter().map(|n| n.children.clone()).collect();
        for children in sorted.iter_mut() {
            children.sort_by(|a, b| {
                nodes[*a]
                    .order
                    .cmp(&nodes[*b].order)
                    .then_with(|| nodes[*a].id.cmp(&nodes[*b].id))
            });
        }
        for (node, children) in tree.nodes.iter_mut().zip(sorted) {
            node.children = children;
        }
        tree
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn orphans(&self) -> &[String] {
        &self.orphans
    }

    pub fn parent_of(&self, id: &str) -> Option<&str> {
        let slot = *self.index.get(id)?;
        self.nodes[slot].parent.map(|p| self.nodes[p].id.as_str())
    }

    pub fn children_of(&self, id: &str) -> Vec<&str> {
        match self.index.get(id) {
            Some(slot) => self.nodes[*slot]
                .children
                .iter()
                .map(|c| self.nodes[*c].id.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Siblings under `parent` (roots when `None`), ordered by `wbs_order` then id.
    pub fn siblings_under(&self, parent: Option<&str>) -> Vec<&str> {
        match parent {
            Some(parent) => self.children_of(parent),
            None => {
                let mut roots: Vec<&WbsNode> =
                    self.nodes.iter().filter(|n| n.parent.is_none()).collect();
                roots.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
                roots.into_iter().map(|n| n.id.as_str()).collect()
            }
        }
    }

    /// Depth in the hierarchy: `0` for roots, `parent + 1` otherwise.
    pub fn level_of(&self, id: &str) -> Option<i64> {
        let mut slot = *self.index.get(id)?;
        let mut level = 0i64;
        while let Some(parent) = self.nodes[slot].parent {
            level += 1;
            if level as usize > self.nodes.len() {
                return None;
            }
            slot = parent;
        }
        Some(level)
    }

    /// `id` and all of its descendants, parents before children.
    pub fn subtree(&self, id: &str) -> Vec<&str> {
        let Some(root) = self.index.get(id).copied() else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(slot) = stack.pop() {
            if out.len() > self.nodes.len() {
                break;
            }
            out.push(self.nodes[slot].id.as_str());
            stack.extend(self.nodes[slot].children.iter().rev().copied());
        }
        out
    }

    pub fn descendants(&self, id: &str) -> Vec<&str> {
        self.subtree(id).into_iter().skip(1).collect()
    }

    pub fn is_in_subtree(&self, root: &str, candidate: &str) -> bool {
        let mut current = Some(candidate);
        let mut steps = 0usize;
        while let Some(id) = current {
            if id == root {
                return true;
            }
            steps += 1;
            if steps > self.nodes.len() {
                return false;
            }
            current = self.parent_of(id);
        }
        false
    }

    pub fn next_sibling_order(&self, parent: Option<&str>) -> i64 {
        self.sibling_orders(parent, None).max().unwrap_or(0) + 1
    }

    pub fn sibling_order_taken(&self, parent: Option<&str>, order: i64, exclude: Option<&str>) -> bool {
        self.sibling_orders(parent, exclude).any(|o| o == order)
    }

    /// Rejects moving `task` under `new_parent` when that would make it its own ancestor.
    pub fn check_reparent(&self, task: &str, new_parent: Option<&str>) -> Result<(), ValidationError> {
        let Some(parent) = new_parent else {
            return Ok(());
        };
        if parent == task {
            return Err(ValidationError::SelfParent(task.to_string()));
        }
        if self.is_in_subtree(task, parent) {
            return Err(ValidationError::ParentIsDescendant {
                task: task.to_string(),
                parent: parent.to_string(),
            });
        }
        Ok(())
    }

    /// Ids of tasks whose stored `wbs_level` disagrees with their depth in the tree.
    pub fn inconsistent_levels<'a>(&self, tasks: impl IntoIterator<Item = &'a Task>) -> Vec<String> {
        tasks
            .into_iter()
            .filter(|task| self.level_of(&task.id) != Some(task.wbs_level))
            .map(|task| task.id.clone())
            .collect()
    }

    fn sibling_orders<'s>(
        &'s self,
        parent: Option<&str>,
        exclude: Option<&'s str>,
    ) -> impl Iterator<Item = i64> + 's {
        let parent_slot = parent.and_then(|p| self.index.get(p).copied());
        let wanted_root = parent.is_none();
        self.nodes.iter().filter_map(move |node| {
            if exclude.is_some_and(|e| e == node.id) {
                return None;
            }
            let matches = if wanted_root {
                node.parent.is_none()
            } else {
                parent_slot.is_some() && node.parent == parent_slot
            };
            matches.then_some(node.order)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TaskKind, TaskStatus};
    use chrono::NaiveDate;

    fn task(id: &str, parent: Option<&str>, order: i64, level: i64) -> Task {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        Task {
            id: id.to_string(),
            schedule_id: "SCH-001".to_string(),
            parent_id: parent.map(str::to_string),
            name: id.to_string(),
            description: None,
            kind: TaskKind::Task,
            planned_start: day,
            planned_end: day,
            duration_days: 1,
            percent_complete: 0.0,
            status: TaskStatus::NotStarted,
            wbs_order: order,
            wbs_level: level,
            revision: 0,
            predecessors: Vec::new(),
            created_at_ms: 0,
            updated_at_ms: 0,
        }
    }

    fn sample() -> Vec<Task> {
        vec![
            task("P1", None, 1, 0),
            task("A", Some("P1"), 2, 1),
            task("B", Some("P1"), 1, 1),
            task("A1", Some("A"), 1, 2),
            task("P2", None, 2, 0),
        ]
    }

    #[test]
    fn levels_follow_depth() {
        let tasks = sample();
        let tree = WbsTree::from_tasks(&tasks);
        assert_eq!(tree.level_of("P1"), Some(0));
        assert_eq!(tree.level_of("A"), Some(1));
        assert_eq!(tree.level_of("A1"), Some(2));
        assert!(tree.inconsistent_levels(&tasks).is_empty());
    }

    #[test]
    fn children_are_ordered_by_wbs_order() {
        let tasks = sample();
        let tree = WbsTree::from_tasks(&tasks);
        assert_eq!(tree.children_of("P1"), vec!["B", "A"]);
        assert_eq!(tree.siblings_under(None), vec!["P1", "P2"]);
        assert_eq!(tree.subtree("P1"), vec!["P1", "B", "A", "A1"]);
        assert_eq!(tree.descendants("A"), vec!["A1"]);
    }

    #[test]
    fn sibling_orders_are_scoped_to_parent() {
        let tasks = sample();
        let tree = WbsTree::from_tasks(&tasks);
        assert_eq!(tree.next_sibling_order(None), 3);
        assert_eq!(tree.next_sibling_order(Some("P1")), 3);
        assert_eq!(tree.next_sibling_order(Some("A1")), 1);
        assert!(tree.sibling_order_taken(Some("P1"), 2, None));
        assert!(!tree.sibling_order_taken(Some("P1"), 2, Some("A")));
        assert!(!tree.sibling_order_taken(Some("A"), 2, None));
    }

    #[test]
    fn reparent_under_own_subtree_is_rejected() {
        let tasks = sample();
        let tree = WbsTree::from_tasks(&tasks);
        assert_eq!(
            tree.check_reparent("P1", Some("P1")).unwrap_err(),
            ValidationError::SelfParent("P1".to_string())
        );
        assert!(matches!(
            tree.check_reparent("P1", Some("A1")).unwrap_err(),
            ValidationError::ParentIsDescendant { .. }
        ));
        assert!(tree.check_reparent("A", Some("P2")).is_ok());
        assert!(tree.check_reparent("A", None).is_ok());
    }

    #[test]
    fn dangling_parent_is_reported_as_orphan() {
        let tasks = vec![task("X", Some("GONE"), 1, 1)];
        let tree = WbsTree::from_tasks(&tasks);
        assert_eq!(tree.orphans(), ["X".to_string()]);
        assert_eq!(tree.level_of("X"), Some(0));
        assert_eq!(tree.inconsistent_levels(&tasks), vec!["X".to_string()]);
    }
}
