#![forbid(unsafe_code)]

//! Precedence graph of one schedule.
//!
//! Nodes are task ids, an edge `a -> b` means `a` precedes `b`. The graph is rebuilt from
//! the stored edges for every check; it is never the source of truth.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::{has_path_connecting, toposort};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::model::DependencyEdge;
use crate::validate::ValidationError;

#[derive(Clone, Debug, Default)]
pub struct DependencyGraph {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_edges<'a>(edges: impl IntoIterator<Item = &'a DependencyEdge>) -> Self {
        let mut out = Self::new();
        for edge in edges {
            out.insert_edge(&edge.predecessor_task_id, &edge.successor_task_id);
        }
        out
    }

    pub fn add_task(&mut self, task_id: &str) -> NodeIndex {
        if let Some(node) = self.index.get(task_id) {
            return *node;
        }
        let node = self.graph.add_node(task_id.to_string());
        self.index.insert(task_id.to_string(), node);
        node
    }

    /// Adds an edge without checks. Parallel edges collapse into one.
    pub fn insert_edge(&mut self, predecessor: &str, successor: &str) {
        let from = self.add_task(predecessor);
        let to = self.add_task(successor);
        self.graph.update_edge(from, to, ());
    }

    pub fn contains_edge(&self, predecessor: &str, successor: &str) -> bool {
        match (self.index.get(predecessor), self.index.get(successor)) {
            (Some(from), Some(to)) => self.graph.find_edge(*from, *to).is_some(),
            _ => false,
        }
    }

    /// True when `to` is reachable from `from` along existing edges.
    pub fn reaches(&self, from: &str, to: &str) -> bool {
        match (self.index.get(from), self.index.get(to)) {
            (Some(from), Some(to)) => has_path_connecting(&self.graph, *from, *to, None),
            _ => false,
        }
    }

    /// A new edge `predecessor -> successor` closes a cycle exactly when the predecessor
    /// is already reachable from the successor.
    pub fn would_create_cycle(&self, predecessor: &str, successor: &str) -> bool {
        predecessor == successor || self.reaches(successor, predecessor)
    }

    pub fn check_new_edge(&self, predecessor: &str, successor: &str) -> Result<(), ValidationError> {
        if predecessor == successor {
            return Err(ValidationError::SelfLoop(predecessor.to_string()));
        }
        if self.contains_edge(predecessor, successor) {
            return Err(ValidationError::DuplicateDependency {
                predecessor: predecessor.to_string(),
                successor: successor.to_string(),
            });
        }
        if self.would_create_cycle(predecessor, successor) {
            return Err(ValidationError::WouldCreateCycle {
                predecessor: predecessor.to_string(),
                successor: successor.to_string(),
            });
        }
        Ok(())
    }

    pub fn predecessors(&self, task_id: &str) -> Vec<&str> {
        self.neighbors(task_id, Direction::Incoming)
    }

    pub fn successors(&self, task_id: &str) -> Vec<&str> {
        self.neighbors(task_id, Direction::Outgoing)
    }

    /// Task ids in an order where every predecessor comes first; `None` if the stored
    /// edges already contain a cycle.
    pub fn topological_order(&self) -> Option<Vec<&str>> {
        let order = toposort(&self.graph, None).ok()?;
        Some(order.into_iter().map(|node| self.graph[node].as_str()).collect())
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn neighbors(&self, task_id: &str, direction: Direction) -> Vec<&str> {
        let Some(node) = self.index.get(task_id) else {
            return Vec::new();
        };
        let mut out: Vec<&str> = self
            .graph
            .neighbors_directed(*node, direction)
            .map(|n| self.graph[n].as_str())
            .collect();
        out.sort_unstable();
        out
    }
}
