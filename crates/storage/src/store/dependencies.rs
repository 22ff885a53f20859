#![forbid(unsafe_code)]

use super::*;
use rusqlite::{OptionalExtension, Transaction, params};
use serde_json::json;
use wbs_core::model::DependencyEdge;
use wbs_core::{DependencyGraph, ValidationError, validate};

impl SqliteStore {
    pub fn list_dependencies(&self, schedule_id: &str) -> Result<Vec<DependencyEdge>, StoreError> {
        Ok(self.schedule_snapshot(schedule_id)?.edges.clone())
    }

    /// Precedence graph of a schedule, every task present as a node.
    pub fn dependency_graph(&self, schedule_id: &str) -> Result<DependencyGraph, StoreError> {
        Ok(self.schedule_snapshot(schedule_id)?.graph())
    }

    /// Adds a precedence edge after checking that both tasks exist in the same schedule
    /// and that the edge neither duplicates an existing one nor closes a cycle.
    pub fn add_dependency(&mut self, request: AddDependencyRequest) -> Result<DependencyEdge, StoreError> {
        let tx = self.conn.transaction()?;
        let edge =
            add_dependency_tx(&tx, request).inspect_err(|err| log_rejected("add_dependency", err))?;
        tx.commit()?;

        self.cache.invalidate(&edge.schedule_id);
        tracing::info!(
            schedule = %edge.schedule_id,
            edge = %edge.id,
            predecessor = %edge.predecessor_task_id,
            successor = %edge.successor_task_id,
            link = edge.link_type.as_str(),
            "dependency added"
        );
        Ok(edge)
    }

    pub fn remove_dependency(&mut self, edge_id: &str) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        let edge = remove_dependency_tx(&tx, edge_id)
            .inspect_err(|err| log_rejected("remove_dependency", err))?;
        tx.commit()?;

        self.cache.invalidate(&edge.schedule_id);
        tracing::info!(schedule = %edge.schedule_id, edge = %edge.id, "dependency removed");
        Ok(())
    }
}

fn add_dependency_tx(
    tx: &Transaction<'_>,
    request: AddDependencyRequest,
) -> Result<DependencyEdge, StoreError> {
    let AddDependencyRequest {
        predecessor_task_id,
        successor_task_id,
        link_type,
        lag_days,
    } = request;
    let predecessor_task_id = validate::required_name("predecessor_task_id", &predecessor_task_id)?;
    let successor_task_id = validate::required_name("successor_task_id", &successor_task_id)?;
    if predecessor_task_id == successor_task_id {
        return Err(ValidationError::SelfLoop(predecessor_task_id).into());
    }

    let predecessor = require_task(tx, &predecessor_task_id)?;
    let successor = require_task(tx, &successor_task_id)?;
    if predecessor.schedule_id != successor.schedule_id {
        return Err(ValidationError::CrossScheduleDependency {
            predecessor: predecessor.id,
            successor: successor.id,
        }
        .into());
    }

    let edges = load_schedule_edges(tx, &predecessor.schedule_id)?;
    DependencyGraph::from_edges(&edges).check_new_edge(&predecessor.id, &successor.id)?;

    let edge = DependencyEdge {
        id: next_id_tx(tx, "DEP")?,
        schedule_id: predecessor.schedule_id,
        predecessor_task_id: predecessor.id,
        successor_task_id: successor.id,
        link_type,
        lag_days,
        created_at_ms: now_ms(),
    };
    tx.execute(
        &format!("INSERT INTO dependencies({EDGE_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"),
        params![
            edge.id,
            edge.schedule_id,
            edge.predecessor_task_id,
            edge.successor_task_id,
            edge.link_type.as_str(),
            edge.lag_days,
            edge.created_at_ms,
        ],
    )?;
    insert_event_tx(
        tx,
        &edge.schedule_id,
        edge.created_at_ms,
        Some(&edge.successor_task_id),
        "dependency_added",
        json!({
            "edge_id": edge.id,
            "predecessor": edge.predecessor_task_id,
            "link_type": edge.link_type.as_str(),
            "lag_days": edge.lag_days,
        }),
    )?;
    Ok(edge)
}

fn remove_dependency_tx(tx: &Transaction<'_>, edge_id: &str) -> Result<DependencyEdge, StoreError> {
    let edge = tx
        .query_row(
            &format!("SELECT {EDGE_COLUMNS} FROM dependencies WHERE id=?1"),
            params![edge_id],
            edge_from_row,
        )
        .optional()?
        .ok_or_else(|| StoreError::unknown("dependency", edge_id))?;

    tx.execute("DELETE FROM dependencies WHERE id=?1", params![edge.id])?;
    insert_event_tx(
        tx,
        &edge.schedule_id,
        now_ms(),
        Some(&edge.successor_task_id),
        "dependency_removed",
        json!({ "edge_id": edge.id, "predecessor": edge.predecessor_task_id }),
    )?;
    Ok(edge)
}
