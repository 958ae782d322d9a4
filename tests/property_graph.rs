// tests/property_graph.rs

use std::collections::HashSet;
use std::sync::Arc;

use petgraph::algo::is_cyclic_directed;
use petgraph::graphmap::DiGraphMap;
use proptest::prelude::*;

use taskdag::config::TaskRecord;
use taskdag::dag::{compute_expected_runtime, critical_path, find_cycle, validate, TaskGraph};
use taskdag::exec::{execute, SleepWork};

// Strategy to generate a valid DAG as records.
// We ensure acyclicity by only allowing task N to depend on tasks 0..N-1.
fn dag_records_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<TaskRecord>> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        let deps_strat = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..num_tasks),
            num_tasks,
        );
        let durations_strat = proptest::collection::vec(0u32..1000, num_tasks);

        (deps_strat, durations_strat).prop_map(|(raw_deps, durations)| {
            raw_deps
                .into_iter()
                .zip(durations)
                .enumerate()
                .map(|(i, (potential_deps, millis))| {
                    // Sanitize dependencies: only allow deps < i.
                    let mut deps: Vec<String> = potential_deps
                        .into_iter()
                        .filter(|_| i > 0)
                        .map(|d| format!("task_{}", d % i.max(1)))
                        .collect::<HashSet<_>>()
                        .into_iter()
                        .collect();
                    deps.sort();
                    TaskRecord::new(format!("task_{i}"), f64::from(millis) / 1000.0, deps)
                })
                .collect()
        })
    })
}

// Arbitrary (possibly cyclic) edge lists over a small set of nodes.
fn any_edges_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
    (1usize..8).prop_flat_map(|n| (Just(n), proptest::collection::vec((0..n, 0..n), 0..16)))
}

fn graph_from_edges(n: usize, edges: &[(usize, usize)]) -> TaskGraph {
    TaskGraph::from_records((0..n).map(|i| {
        let deps = edges
            .iter()
            .filter(|(from, _)| *from == i)
            .map(|(_, to)| format!("n{to}"))
            .collect();
        TaskRecord::new(format!("n{i}"), 1.0, deps)
    }))
}

proptest! {
    #[test]
    fn generated_dags_validate(records in dag_records_strategy(25)) {
        let graph = TaskGraph::from_records(records);
        prop_assert!(validate(&graph).is_ok());
    }

    #[test]
    fn cycle_detection_agrees_with_petgraph((n, edges) in any_edges_strategy()) {
        let graph = graph_from_edges(n, &edges);

        let mut oracle: DiGraphMap<usize, ()> = DiGraphMap::new();
        for i in 0..n {
            oracle.add_node(i);
        }
        for &(from, to) in &edges {
            oracle.add_edge(from, to, ());
        }

        let cycle = find_cycle(&graph);
        prop_assert_eq!(cycle.is_some(), is_cyclic_directed(&oracle));

        // Every consecutive pair in a reported cycle is a real edge.
        if let Some(cycle) = cycle {
            prop_assert_eq!(cycle.first(), cycle.last());
            for pair in cycle.windows(2) {
                prop_assert!(graph.dependencies_of(&pair[0]).contains(&pair[1]));
            }
        }
    }

    #[test]
    fn finish_time_bounds_hold(records in dag_records_strategy(25)) {
        let graph = TaskGraph::from_records(records);
        let cp = critical_path(&graph);

        for task in graph.tasks() {
            let finish = cp.finish_times[&task.name];
            prop_assert!(finish >= task.duration - 1e-9);
            for dep in &task.dependencies {
                prop_assert!(finish >= cp.finish_times[dep] + task.duration - 1e-9);
            }
            prop_assert!(cp.expected_runtime >= finish - 1e-9);
        }

        // The reported path is a real chain whose durations sum to the runtime.
        let total: f64 = cp.path.iter().map(|n| graph.get(n).unwrap().duration).sum();
        prop_assert!((total - cp.expected_runtime).abs() < 1e-6);
        for pair in cp.path.windows(2) {
            prop_assert!(graph.dependencies_of(&pair[1]).contains(&pair[0]));
        }

        prop_assert_eq!(compute_expected_runtime(&graph), cp.expected_runtime);
    }

    #[test]
    fn insertion_order_does_not_change_results(records in dag_records_strategy(15)) {
        let mut reversed = records.clone();
        reversed.reverse();

        let a = TaskGraph::from_records(records);
        let b = TaskGraph::from_records(reversed);

        prop_assert_eq!(critical_path(&a).finish_times, critical_path(&b).finish_times);
        for task in a.tasks() {
            prop_assert_eq!(b.get(&task.name), Some(task));
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn execution_respects_edges_and_approaches_expected(records in dag_records_strategy(12)) {
        let graph = TaskGraph::from_records(records);

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();
        let result = runtime.block_on(execute(&graph, Arc::new(SleepWork::default())));

        prop_assert!(result.is_success());
        prop_assert_eq!(result.timeline.len(), graph.len());
        for task in graph.tasks() {
            let entry = result.timeline[&task.name];
            prop_assert!(entry.end >= entry.start);
            for dep in &task.dependencies {
                prop_assert!(result.timeline[dep].end <= entry.start);
            }
        }
        // Virtual time: only timer rounding separates actual from expected.
        prop_assert!(result.actual_runtime >= result.expected_runtime - 1e-9);
        prop_assert!(result.runtime_difference() < 0.05);
    }
}
