#![forbid(unsafe_code)]

use chrono::NaiveDate;

use crate::model::{ResourceKind, TaskKind};

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("task {0} is not part of this timeline")]
    UnknownTask(String),
    #[error("planned_end {end} is before planned_start {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    #[error("milestone must start and end on the same day (start={start}, end={end})")]
    MilestoneSpan { start: NaiveDate, end: NaiveDate },
    #[error("percent_complete must be within 0..=100 (got {0})")]
    PercentOutOfRange(f64),
    #[error("duration_days must not be negative (got {0})")]
    NegativeDuration(i64),
    #[error("milestone duration_days must be 0 (got {0})")]
    MilestoneDuration(i64),
    #[error("date {0} is out of range")]
    DateOutOfRange(NaiveDate),
    #[error("task {0} cannot be its own parent")]
    SelfParent(String),
    #[error("parent {parent} belongs to another schedule")]
    CrossScheduleParent { parent: String },
    #[error("parent {parent} is inside the subtree of task {task}")]
    ParentIsDescendant { task: String, parent: String },
    #[error("wbs_order must be at least 1 (got {0})")]
    InvalidOrder(i64),
    #[error("wbs_order {order} is already used by a sibling")]
    SiblingOrderTaken { order: i64 },
    #[error("task {task} has {children} child task(s); delete them first or cascade")]
    HasChildren { task: String, children: usize },
    #[error("task {0} cannot depend on itself")]
    SelfLoop(String),
    #[error("tasks {predecessor} and {successor} belong to different schedules")]
    CrossScheduleDependency {
        predecessor: String,
        successor: String,
    },
    #[error("dependency {predecessor} -> {successor} already exists")]
    DuplicateDependency {
        predecessor: String,
        successor: String,
    },
    #[error("dependency {predecessor} -> {successor} would create a cycle")]
    WouldCreateCycle {
        predecessor: String,
        successor: String,
    },
    #[error("labor assignment requires labor_ref")]
    MissingLaborRef,
    #[error("{0} assignment requires external_resource_name")]
    MissingResourceName(&'static str),
    #[error("{field} must be a finite non-negative number (got {value})")]
    InvalidAmount { field: &'static str, value: f64 },
}

/// Trimmed task/schedule name; blank names are rejected.
pub fn required_name(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

pub fn check_dates(
    kind: TaskKind,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<(), ValidationError> {
    if end < start {
        return Err(ValidationError::EndBeforeStart { start, end });
    }
    if kind == TaskKind::Milestone && start != end {
        return Err(ValidationError::MilestoneSpan { start, end });
    }
    Ok(())
}

/// Fills in missing planned dates for a new task.
///
/// A missing start falls back to the schedule base date and a missing end to the start,
/// so milestones given only a start collapse onto a single day.
pub fn resolve_dates(
    kind: TaskKind,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    base_start_date: NaiveDate,
) -> Result<(NaiveDate, NaiveDate), ValidationError> {
    let start = start.unwrap_or(base_start_date);
    let end = end.unwrap_or(start);
    check_dates(kind, start, end)?;
    Ok((start, end))
}

/// Inclusive calendar span; milestones have zero duration.
pub fn default_duration_days(kind: TaskKind, start: NaiveDate, end: NaiveDate) -> i64 {
    if kind == TaskKind::Milestone {
        return 0;
    }
    (end - start).num_days() + 1
}

pub fn check_percent(value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::PercentOutOfRange(value));
    }
    Ok(())
}

pub fn check_duration(kind: TaskKind, value: i64) -> Result<(), ValidationError> {
    if value < 0 {
        return Err(ValidationError::NegativeDuration(value));
    }
    if kind == TaskKind::Milestone && value != 0 {
        return Err(ValidationError::MilestoneDuration(value));
    }
    Ok(())
}

pub fn check_order(value: i64) -> Result<(), ValidationError> {
    if value < 1 {
        return Err(ValidationError::InvalidOrder(value));
    }
    Ok(())
}

pub fn check_amount(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ValidationError::InvalidAmount { field, value });
    }
    Ok(())
}

/// Validates the kind-specific reference of a resource assignment and returns the
/// planned total cost (`quantity * unit_cost` unless overridden).
pub fn resolve_resource_cost(
    kind: ResourceKind,
    labor_ref: Option<&str>,
    external_resource_name: Option<&str>,
    planned_quantity: f64,
    unit_cost: f64,
    planned_total_cost: Option<f64>,
) -> Result<f64, ValidationError> {
    let present = |value: Option<&str>| value.is_some_and(|v| !v.trim().is_empty());
    match kind {
        ResourceKind::Labor if !present(labor_ref) => {
            return Err(ValidationError::MissingLaborRef);
        }
        ResourceKind::Material | ResourceKind::Equipment if !present(external_resource_name) => {
            return Err(ValidationError::MissingResourceName(kind.as_str()));
        }
        _ => {}
    }

    check_amount("planned_quantity", planned_quantity)?;
    check_amount("unit_cost", unit_cost)?;
    match planned_total_cost {
        Some(total) => {
            check_amount("planned_total_cost", total)?;
            Ok(total)
        }
        None => {
            let total = planned_quantity * unit_cost;
            check_amount("planned_total_cost", total)?;
            Ok(total)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn end_before_start_is_rejected() {
        let err = check_dates(TaskKind::Task, day(2024, 2, 1), day(2024, 1, 30)).unwrap_err();
        assert_eq!(
            err,
            ValidationError::EndBeforeStart {
                start: day(2024, 2, 1),
                end: day(2024, 1, 30)
            }
        );
    }

    #[test]
    fn milestone_dates_collapse_to_start() {
        let (start, end) =
            resolve_dates(TaskKind::Milestone, Some(day(2024, 3, 4)), None, day(2024, 1, 1))
                .unwrap();
        assert_eq!(start, end);
        assert_eq!(default_duration_days(TaskKind::Milestone, start, end), 0);

        let err = resolve_dates(
            TaskKind::Milestone,
            Some(day(2024, 3, 4)),
            Some(day(2024, 3, 5)),
            day(2024, 1, 1),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::MilestoneSpan { .. }));
    }

    #[test]
    fn missing_dates_fall_back_to_base_date() {
        let (start, end) = resolve_dates(TaskKind::Task, None, None, day(2024, 1, 1)).unwrap();
        assert_eq!((start, end), (day(2024, 1, 1), day(2024, 1, 1)));
        assert_eq!(default_duration_days(TaskKind::Task, day(2024, 1, 1), day(2024, 1, 10)), 10);
    }

    #[test]
    fn percent_bounds() {
        assert!(check_percent(0.0).is_ok());
        assert!(check_percent(100.0).is_ok());
        assert!(check_percent(100.5).is_err());
        assert!(check_percent(-1.0).is_err());
        assert!(check_percent(f64::NAN).is_err());
    }

    #[test]
    fn milestones_have_zero_duration() {
        assert!(check_duration(TaskKind::Task, 7).is_ok());
        assert!(check_duration(TaskKind::Milestone, 0).is_ok());
        assert_eq!(
            check_duration(TaskKind::Milestone, 7).unwrap_err(),
            ValidationError::MilestoneDuration(7)
        );
        assert_eq!(
            check_duration(TaskKind::Task, -1).unwrap_err(),
            ValidationError::NegativeDuration(-1)
        );
    }

    #[test]
    fn overflowing_default_total_is_rejected() {
        let err = resolve_resource_cost(ResourceKind::Cost, None, None, 1e200, 1e200, None)
            .unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidAmount {
                field: "planned_total_cost",
                ..
            }
        ));
    }

    #[test]
    fn sibling_orders_start_at_one() {
        assert!(check_order(1).is_ok());
        assert_eq!(check_order(0).unwrap_err(), ValidationError::InvalidOrder(0));
    }

    #[test]
    fn blank_names_are_missing() {
        assert_eq!(
            required_name("name", "   ").unwrap_err(),
            ValidationError::MissingField("name")
        );
        assert_eq!(required_name("name", " Fundação ").unwrap(), "Fundação");
    }

    #[test]
    fn resource_reference_rules() {
        assert_eq!(
            resolve_resource_cost(ResourceKind::Labor, None, Some("Crew"), 1.0, 1.0, None)
                .unwrap_err(),
            ValidationError::MissingLaborRef
        );
        assert_eq!(
            resolve_resource_cost(ResourceKind::Equipment, None, Some("  "), 1.0, 1.0, None)
                .unwrap_err(),
            ValidationError::MissingResourceName("equipment")
        );
        assert_eq!(
            resolve_resource_cost(ResourceKind::Cost, None, None, 1.0, 300.0, None).unwrap(),
            300.0
        );
        assert_eq!(
            resolve_resource_cost(ResourceKind::Material, None, Some("Cement"), 50.0, 25.5, None)
                .unwrap(),
            1275.0
        );
        assert_eq!(
            resolve_resource_cost(
                ResourceKind::Material,
                None,
                Some("Cement"),
                50.0,
                25.5,
                Some(1200.0)
            )
            .unwrap(),
            1200.0
        );
        assert!(matches!(
            resolve_resource_cost(ResourceKind::Labor, Some("EMP-7"), None, -2.0, 10.0, None),
            Err(ValidationError::InvalidAmount {
                field: "planned_quantity",
                ..
            })
        ));
    }
}
