// tests/validation.rs

use std::error::Error;

use taskdag::dag::{find_cycle, validate, TaskGraph};
use taskdag::errors::TaskdagError;
use taskdag_test_utils::builders::GraphBuilder;
use taskdag_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn acyclic_fully_referenced_graph_is_valid() -> TestResult {
    init_tracing();

    let graph = GraphBuilder::new()
        .root("fetch", 1.0)
        .task("compile", 3.0, &["fetch"])
        .task("lint", 1.0, &["fetch"])
        .task("test", 2.0, &["compile"])
        .task("package", 1.0, &["compile", "lint", "test"])
        .root("docs", 4.0)
        .build();

    validate(&graph)?;
    Ok(())
}

#[test]
fn empty_graph_is_valid() -> TestResult {
    validate(&TaskGraph::default())?;
    Ok(())
}

#[test]
fn missing_dependency_names_task_and_dependency() {
    let graph = GraphBuilder::new()
        .root("A", 1.0)
        .task("B", 1.0, &["A", "Nope"])
        .build();

    match validate(&graph) {
        Err(TaskdagError::InvalidDependency { task, dependency }) => {
            assert_eq!(task, "B");
            assert_eq!(dependency, "Nope");
        }
        other => panic!("expected InvalidDependency, got {other:?}"),
    }
}

#[test]
fn invalid_dependency_message_matches_cli_output() {
    let graph = GraphBuilder::new().task("B", 1.0, &["Nope"]).build();

    let err = validate(&graph).unwrap_err();

    assert_eq!(err.to_string(), "Invalid dependency 'Nope' in task 'B'");
}

#[test]
fn self_dependency_is_cyclic() {
    let graph = GraphBuilder::new().task("A", 1.0, &["A"]).build();

    match validate(&graph) {
        Err(TaskdagError::CyclicDependency { cycle }) => assert_eq!(cycle, vec!["A", "A"]),
        other => panic!("expected CyclicDependency, got {other:?}"),
    }
}

#[test]
fn two_task_cycle_is_cyclic() {
    let graph = GraphBuilder::new()
        .task("A", 1.0, &["B"])
        .task("B", 1.0, &["A"])
        .build();

    let err = validate(&graph).unwrap_err();

    assert!(matches!(err, TaskdagError::CyclicDependency { .. }));
    assert!(err.to_string().contains("A -> B -> A"));
}

#[test]
fn cycle_hidden_behind_valid_prefix_is_found() {
    let graph = GraphBuilder::new()
        .root("start", 1.0)
        .task("x", 1.0, &["start", "z"])
        .task("y", 1.0, &["x"])
        .task("z", 1.0, &["y"])
        .build();

    let cycle = find_cycle(&graph).expect("cycle x -> z -> y -> x");

    assert_eq!(cycle.first(), cycle.last());
    for name in ["x", "y", "z"] {
        assert!(cycle.iter().any(|c| c == name), "{name} missing from {cycle:?}");
    }
    assert!(!cycle.iter().any(|c| c == "start"));
}

#[test]
fn reference_errors_are_reported_before_cycles() {
    let graph = GraphBuilder::new()
        .task("A", 1.0, &["B"])
        .task("B", 1.0, &["A", "ghost"])
        .build();

    assert!(matches!(
        validate(&graph),
        Err(TaskdagError::InvalidDependency { .. })
    ));
}

#[test]
fn blank_dependencies_are_not_references() -> TestResult {
    let graph = GraphBuilder::new()
        .root("A", 1.0)
        .task("B", 1.0, &["", " ", "A"])
        .build();

    validate(&graph)?;
    assert_eq!(graph.dependencies_of("B"), ["A".to_string()]);
    Ok(())
}

#[test]
fn validation_is_repeatable() {
    let graph = GraphBuilder::new()
        .task("A", 1.0, &["C"])
        .task("B", 1.0, &["A"])
        .task("C", 1.0, &["B"])
        .build();

    let first = find_cycle(&graph);
    for _ in 0..5 {
        assert_eq!(find_cycle(&graph), first);
    }
}

#[test]
fn graph_round_trips_regardless_of_insertion_order() {
    let forward = GraphBuilder::new()
        .root("A", 2.0)
        .task("B", 3.0, &["A"])
        .task("C", 1.0, &["A", "B"]);
    let mut reversed = forward.records().to_vec();
    reversed.reverse();

    let a = forward.build();
    let b = TaskGraph::from_records(reversed);

    assert_eq!(a.len(), b.len());
    for task in a.tasks() {
        let other = b.get(&task.name).expect("same task names");
        assert_eq!(other, task);
    }
}
