use super::*;
use crate::model::{LinkType, TaskStatus};
use crate::validate::ValidationError;

fn day(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, m, d).unwrap()
}

fn task(id: &str, kind: TaskKind, parent: Option<&str>, order: i64, span: (NaiveDate, NaiveDate)) -> Task {
    Task {
        id: id.to_string(),
        schedule_id: "SCH-001".to_string(),
        parent_id: parent.map(str::to_string),
        name: format!("Task {id}"),
        description: None,
        kind,
        planned_start: span.0,
        planned_end: span.1,
        duration_days: crate::validate::default_duration_days(kind, span.0, span.1),
        percent_complete: 0.0,
        status: TaskStatus::NotStarted,
        wbs_order: order,
        wbs_level: if parent.is_some() { 1 } else { 0 },
        revision: 0,
        predecessors: Vec::new(),
        created_at_ms: 0,
        updated_at_ms: 0,
    }
}

fn edge(id: &str, from: &str, to: &str) -> DependencyEdge {
    DependencyEdge {
        id: id.to_string(),
        schedule_id: "SCH-001".to_string(),
        predecessor_task_id: from.to_string(),
        successor_task_id: to.to_string(),
        link_type: LinkType::FinishToStart,
        lag_days: 0,
        created_at_ms: 0,
    }
}

fn sample() -> (Vec<Task>, Vec<DependencyEdge>) {
    let mut a = task("A", TaskKind::Task, Some("PH"), 2, (day(1, 1), day(1, 10)));
    a.percent_complete = 100.0;
    let b = task("B", TaskKind::Task, Some("PH"), 3, (day(1, 5), day(1, 24)));
    let phase = task("PH", TaskKind::Phase, None, 1, (day(1, 1), day(1, 1)));
    let handover = task("M", TaskKind::Milestone, None, 4, (day(2, 1), day(2, 1)));
    (vec![b, handover, a, phase], vec![edge("DEP-001", "A", "B")])
}

#[test]
fn rows_are_sorted_by_wbs_order() {
    let (tasks, edges) = sample();
    let view = ScheduleView::from_parts(tasks, &edges);
    let ids: Vec<String> = view.rows().map(|r| r.task_id).collect();
    assert_eq!(ids, vec!["PH", "A", "B", "M"]);
}

#[test]
fn rows_can_be_walked_again() {
    let (tasks, edges) = sample();
    let view = ScheduleView::from_parts(tasks, &edges);
    let first: Vec<TimelineRow> = view.rows().collect();
    let second: Vec<TimelineRow> = view.rows().collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 4);
}

#[test]
fn phase_renders_as_summary_of_children() {
    let (tasks, edges) = sample();
    let view = ScheduleView::from_parts(tasks, &edges);
    let phase = view.row_for("PH").unwrap();
    assert_eq!(phase.bar, Bar::Summary);
    assert_eq!(phase.start, day(1, 1));
    assert_eq!(phase.end, day(1, 24));
    // A: 10 days at 100%, B: 20 days at 0%.
    assert!((phase.progress - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn milestone_collapses_to_a_point() {
    let (tasks, edges) = sample();
    let view = ScheduleView::from_parts(tasks, &edges);
    let milestone = view.row_for("M").unwrap();
    assert_eq!(milestone.bar, Bar::Milestone);
    assert_eq!(milestone.start, milestone.end);
}

#[test]
fn rows_carry_parent_and_dependencies() {
    let (tasks, edges) = sample();
    let view = ScheduleView::from_parts(tasks, &edges);
    let b = view.row_for("B").unwrap();
    assert_eq!(b.parent.as_deref(), Some("PH"));
    assert_eq!(b.level, 1);
    assert_eq!(b.dependencies.len(), 1);
    assert_eq!(b.dependencies[0].predecessor_task_id, "A");
    assert_eq!(b.dependencies[0].edge_id, "DEP-001");
    assert!(view.row_for("A").unwrap().dependencies.is_empty());
}

#[test]
fn childless_phase_keeps_own_dates() {
    let phase = task("PH", TaskKind::Phase, None, 1, (day(3, 1), day(3, 9)));
    let view = ScheduleView::from_parts(vec![phase], &[]);
    let row = view.row_for("PH").unwrap();
    assert_eq!((row.start, row.end), (day(3, 1), day(3, 9)));
}

#[test]
fn optimistic_move_rolls_back_to_exact_snapshot() {
    let (tasks, edges) = sample();
    let mut timeline = OptimisticTimeline::new(tasks.clone(), edges.clone());
    let pending = timeline
        .apply(TimelineEdit::Move {
            task_id: "B".to_string(),
            start: day(1, 11),
        })
        .unwrap();
    let moved = timeline.view().row_for("B").unwrap();
    assert_eq!((moved.start, moved.end), (day(1, 11), day(1, 30)));

    assert!(timeline.rollback(pending));
    assert_eq!(timeline.tasks(), tasks.as_slice());
    assert_eq!(timeline.edges(), edges.as_slice());
}

#[test]
fn stale_results_are_ignored() {
    let (tasks, edges) = sample();
    let mut timeline = OptimisticTimeline::new(tasks, edges);
    let first = timeline
        .apply(TimelineEdit::Progress {
            task_id: "B".to_string(),
            percent: 50.0,
        })
        .unwrap();
    let second = timeline
        .apply(TimelineEdit::Resize {
            task_id: "B".to_string(),
            end: day(1, 28),
        })
        .unwrap();

    assert!(!timeline.rollback(first));
    let b = timeline.view().row_for("B").unwrap();
    assert_eq!(b.progress, 50.0);
    assert_eq!(b.end, day(1, 28));

    let reloaded = timeline.tasks().to_vec();
    assert!(timeline.settle(second, reloaded, Vec::new()));
    assert!(timeline.edges().is_empty());
}

#[test]
fn invalid_local_edit_leaves_state_untouched() {
    let (tasks, edges) = sample();
    let mut timeline = OptimisticTimeline::new(tasks.clone(), edges);
    let err = timeline
        .apply(TimelineEdit::Resize {
            task_id: "A".to_string(),
            end: day(1, 1) - chrono::Duration::days(1),
        })
        .unwrap_err();
    assert!(matches!(err, ValidationError::EndBeforeStart { .. }));
    assert_eq!(timeline.generation(), 0);
    assert_eq!(timeline.tasks(), tasks.as_slice());

    let err = timeline
        .apply(TimelineEdit::Delete {
            task_id: "PH".to_string(),
        })
        .unwrap_err();
    assert!(matches!(err, ValidationError::HasChildren { children: 2, .. }));
}

#[test]
fn move_past_the_calendar_end_is_rejected() {
    let (tasks, edges) = sample();
    let mut timeline = OptimisticTimeline::new(tasks.clone(), edges);
    let err = timeline
        .apply(TimelineEdit::Move {
            task_id: "A".to_string(),
            start: NaiveDate::MAX,
        })
        .unwrap_err();
    assert_eq!(err, ValidationError::DateOutOfRange(NaiveDate::MAX));
    assert_eq!(timeline.generation(), 0);
    assert_eq!(timeline.tasks(), tasks.as_slice());
}

#[test]
fn local_delete_drops_edges() {
    let (tasks, edges) = sample();
    let mut timeline = OptimisticTimeline::new(tasks, edges);
    let _pending = timeline
        .apply(TimelineEdit::Delete {
            task_id: "A".to_string(),
        })
        .unwrap();
    assert!(timeline.edges().is_empty());
    assert!(timeline.view().row_for("A").is_none());
}
