#![forbid(unsafe_code)]

mod common;

use common::*;
use proptest::prelude::*;
use wbs_core::ValidationError;
use wbs_core::model::{LinkType, Task};
use wbs_storage::{AddDependencyRequest, DeleteTaskRequest, ErrorKind, SqliteStore};

/// Scenario setup: `A` (Jan 1-10) and `B` (Jan 5-15) in the active schedule of `P1`.
fn two_tasks() -> (SqliteStore, String, Task, Task) {
    let (mut store, schedule) = store_with_schedule();
    let a = create_task(&mut store, &schedule.id, "A", day(2024, 1, 1), day(2024, 1, 10));
    let b = create_task(&mut store, &schedule.id, "B", day(2024, 1, 5), day(2024, 1, 15));
    (store, schedule.id, a, b)
}

#[test]
fn finish_to_start_edge_is_listed() {
    let (mut store, schedule_id, a, b) = two_tasks();

    let edge = store
        .add_dependency(AddDependencyRequest::finish_to_start(&a.id, &b.id))
        .expect("add edge");
    assert_eq!(edge.id, "DEP-001");
    assert_eq!(edge.schedule_id, schedule_id);
    assert_eq!(edge.link_type, LinkType::FinishToStart);
    assert_eq!(edge.lag_days, 0);

    let edges = store.list_dependencies(&schedule_id).expect("edges");
    assert_eq!(edges, vec![edge]);

    let tasks = store.list_tasks(&schedule_id).expect("tasks");
    let listed_b = tasks.iter().find(|t| t.id == b.id).expect("b listed");
    assert_eq!(listed_b.predecessors, vec![a.id.clone()]);
    assert_eq!(store.get_task(&b.id).expect("b").predecessors, vec![a.id]);
}

#[test]
fn reverse_edge_would_create_a_cycle() {
    let (mut store, schedule_id, a, b) = two_tasks();
    store
        .add_dependency(AddDependencyRequest::finish_to_start(&a.id, &b.id))
        .expect("add edge");
    let before = store.list_dependencies(&schedule_id).expect("edges");

    let err = store
        .add_dependency(AddDependencyRequest::finish_to_start(&b.id, &a.id))
        .expect_err("cycle");
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(matches!(
        err.validation(),
        Some(ValidationError::WouldCreateCycle { .. })
    ));
    assert_eq!(store.list_dependencies(&schedule_id).expect("edges"), before);
}

#[test]
fn longer_cycles_are_detected() {
    let (mut store, schedule) = store_with_schedule();
    let ids: Vec<String> = ["A", "B", "C", "D"]
        .iter()
        .map(|name| create_task(&mut store, &schedule.id, name, day(2024, 1, 1), day(2024, 1, 2)).id)
        .collect();
    for pair in ids.windows(2) {
        store
            .add_dependency(AddDependencyRequest::finish_to_start(&pair[0], &pair[1]))
            .expect("chain edge");
    }

    let err = store
        .add_dependency(AddDependencyRequest::finish_to_start(&ids[3], &ids[0]))
        .expect_err("closes the chain");
    assert!(matches!(
        err.validation(),
        Some(ValidationError::WouldCreateCycle { .. })
    ));

    // A shortcut along the chain direction is fine.
    store
        .add_dependency(AddDependencyRequest {
            link_type: LinkType::StartToStart,
            lag_days: -2,
            ..AddDependencyRequest::finish_to_start(&ids[0], &ids[3])
        })
        .expect("shortcut");

    let graph = store.dependency_graph(&schedule.id).expect("graph");
    let order = graph.topological_order().expect("acyclic");
    let position = |id: &str| order.iter().position(|o| *o == id).expect("in order");
    for pair in ids.windows(2) {
        assert!(position(pair[0].as_str()) < position(pair[1].as_str()));
    }
    assert_eq!(graph.successors(&ids[0]), vec![ids[1].as_str(), ids[3].as_str()]);
}

#[test]
fn self_loop_is_rejected() {
    let (mut store, schedule_id, a, _b) = two_tasks();
    let err = store
        .add_dependency(AddDependencyRequest::finish_to_start(&a.id, &a.id))
        .expect_err("self loop");
    assert_eq!(err.validation(), Some(&ValidationError::SelfLoop(a.id)));
    assert!(store.list_dependencies(&schedule_id).expect("edges").is_empty());
}

#[test]
fn duplicate_edge_is_rejected() {
    let (mut store, _schedule_id, a, b) = two_tasks();
    store
        .add_dependency(AddDependencyRequest::finish_to_start(&a.id, &b.id))
        .expect("add edge");
    let err = store
        .add_dependency(AddDependencyRequest {
            lag_days: 3,
            ..AddDependencyRequest::finish_to_start(&a.id, &b.id)
        })
        .expect_err("duplicate");
    assert!(matches!(
        err.validation(),
        Some(ValidationError::DuplicateDependency { .. })
    ));
}

#[test]
fn cross_schedule_edge_is_rejected() {
    let (mut store, schedule_id, a, _b) = two_tasks();
    let p2 = project("P2");
    store.create_project(&p2, "Tower B").expect("project");
    let other = store.get_or_create_active_schedule(&p2).expect("schedule");
    let foreign = create_task(&mut store, &other.id, "X", day(2024, 1, 1), day(2024, 1, 2));

    let err = store
        .add_dependency(AddDependencyRequest::finish_to_start(&a.id, &foreign.id))
        .expect_err("cross schedule");
    assert!(matches!(
        err.validation(),
        Some(ValidationError::CrossScheduleDependency { .. })
    ));
    assert!(store.list_dependencies(&schedule_id).expect("edges").is_empty());
    assert!(store.list_dependencies(&other.id).expect("edges").is_empty());
}

#[test]
fn unknown_endpoint_is_not_found() {
    let (mut store, _schedule_id, a, _b) = two_tasks();
    let err = store
        .add_dependency(AddDependencyRequest::finish_to_start(&a.id, "TASK-404"))
        .expect_err("unknown successor");
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[test]
fn deleting_an_endpoint_removes_its_edges() {
    let (mut store, schedule_id, a, b) = two_tasks();
    store
        .add_dependency(AddDependencyRequest::finish_to_start(&a.id, &b.id))
        .expect("add edge");

    store
        .delete_task(DeleteTaskRequest::leaf(&a.id))
        .expect("delete a");

    let edges = store.list_dependencies(&schedule_id).expect("edges");
    assert!(edges.iter().all(|e| e.predecessor_task_id != a.id && e.successor_task_id != a.id));
    assert!(edges.is_empty());
    assert!(store.get_task(&b.id).expect("b").predecessors.is_empty());
}

#[test]
fn remove_dependency_then_not_found() {
    let (mut store, schedule_id, a, b) = two_tasks();
    let edge = store
        .add_dependency(AddDependencyRequest::finish_to_start(&a.id, &b.id))
        .expect("add edge");

    store.remove_dependency(&edge.id).expect("remove");
    assert!(store.list_dependencies(&schedule_id).expect("edges").is_empty());

    let err = store.remove_dependency(&edge.id).expect_err("already removed");
    assert_eq!(err.kind(), ErrorKind::NotFound);

    // Removing the edge makes the reverse direction legal.
    store
        .add_dependency(AddDependencyRequest::finish_to_start(&b.id, &a.id))
        .expect("reverse edge");
}

#[test]
fn reads_are_never_stale_across_mutations() {
    let (mut store, schedule_id, a, b) = two_tasks();

    let before = store.list_dependencies(&schedule_id).expect("edges");
    assert!(before.is_empty());
    assert_eq!(store.cached_schedules(), 1);

    store
        .add_dependency(AddDependencyRequest::finish_to_start(&a.id, &b.id))
        .expect("add edge");
    assert_eq!(store.cached_schedules(), 0);
    assert_eq!(store.list_dependencies(&schedule_id).expect("edges").len(), 1);

    let first = store.schedule_snapshot(&schedule_id).expect("snapshot");
    let second = store.schedule_snapshot(&schedule_id).expect("snapshot");
    assert!(std::sync::Arc::ptr_eq(&first, &second));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn stored_graph_stays_acyclic(pairs in prop::collection::vec((0usize..6, 0usize..6), 0..30)) {
        let (mut store, schedule) = store_with_schedule();
        let ids: Vec<String> = (0..6)
            .map(|i| {
                create_task(&mut store, &schedule.id, &format!("T{i}"), day(2024, 1, 1), day(2024, 1, 2)).id
            })
            .collect();

        for (from, to) in pairs {
            let before = store.list_dependencies(&schedule.id).expect("edges").len();
            match store.add_dependency(AddDependencyRequest::finish_to_start(&ids[from], &ids[to])) {
                Ok(_) => {
                    prop_assert_eq!(store.list_dependencies(&schedule.id).expect("edges").len(), before + 1);
                }
                Err(err) => {
                    prop_assert_eq!(err.kind(), ErrorKind::Validation);
                    prop_assert_eq!(store.list_dependencies(&schedule.id).expect("edges").len(), before);
                }
            }
        }

        let graph = store.dependency_graph(&schedule.id).expect("graph");
        prop_assert!(graph.topological_order().is_some());
        for edge in store.list_dependencies(&schedule.id).expect("edges") {
            prop_assert_ne!(&edge.predecessor_task_id, &edge.successor_task_id);
        }
    }
}
