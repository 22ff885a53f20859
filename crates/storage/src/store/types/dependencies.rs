#![forbid(unsafe_code)]

use serde::Deserialize;
use wbs_core::model::LinkType;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AddDependencyRequest {
    pub predecessor_task_id: String,
    pub successor_task_id: String,
    pub link_type: LinkType,
    /// Negative values are leads.
    pub lag_days: i64,
}

impl AddDependencyRequest {
    pub fn finish_to_start(predecessor: impl Into<String>, successor: impl Into<String>) -> Self {
        Self {
            predecessor_task_id: predecessor.into(),
            successor_task_id: successor.into(),
            link_type: LinkType::FinishToStart,
            lag_days: 0,
        }
    }
}
