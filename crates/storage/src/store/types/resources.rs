#![forbid(unsafe_code)]

use serde::Deserialize;
use wbs_core::model::ResourceKind;

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct AddResourceRequest {
    pub task_id: String,
    pub resource_kind: ResourceKind,
    #[serde(default)]
    pub labor_ref: Option<String>,
    #[serde(default)]
    pub external_resource_name: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub planned_quantity: f64,
    #[serde(default)]
    pub unit_cost: f64,
    /// Overrides `planned_quantity * unit_cost`.
    #[serde(default)]
    pub planned_total_cost: Option<f64>,
}
