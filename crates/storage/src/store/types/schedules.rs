#![forbid(unsafe_code)]

use chrono::NaiveDate;
use wbs_core::ids::ProjectId;

/// An additional, inactive schedule version for a project.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateScheduleRequest {
    pub project_id: ProjectId,
    pub name: String,
    /// Defaults to today.
    pub base_start_date: Option<NaiveDate>,
}
