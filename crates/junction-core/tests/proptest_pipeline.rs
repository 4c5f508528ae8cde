use std::collections::BTreeSet;

use junction_core::graph::UndirectedGraph;
use junction_core::verify::{
    check_cliques, check_perfect_elimination_ordering, check_running_intersection,
};
use junction_core::{NetworkDescription, PipelineConfig, VarId, build_junction_tree};
use proptest::prelude::*;

use generators::arb_dag;

/// Unverified config so each property checks its own invariant directly.
const RAW: PipelineConfig = PipelineConfig {
    check_acyclic: true,
    verify: false,
};

/// All maximal complete vertex subsets, by brute force.
fn brute_force_cliques(graph: &UndirectedGraph) -> BTreeSet<Vec<VarId>> {
    let mut vertices: Vec<VarId> = graph.nodes().collect();
    vertices.sort_unstable();
    let n = vertices.len();

    let complete: Vec<Vec<VarId>> = (1u32..(1 << n))
        .map(|mask| {
            (0..n)
                .filter(|&i| mask & (1 << i) != 0)
                .map(|i| vertices[i])
                .collect::<Vec<_>>()
        })
        .filter(|set| {
            set.iter()
                .enumerate()
                .all(|(k, &a)| set[k + 1..].iter().all(|&b| graph.contains_edge(a, b)))
        })
        .collect();

    complete
        .iter()
        .filter(|set| {
            !complete
                .iter()
                .any(|other| other.len() > set.len() && set.iter().all(|v| other.contains(v)))
        })
        .cloned()
        .collect()
}

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(256))]

    #[test]
    fn moral_graph_is_complete_and_a_superset(desc in arb_dag(12)) {
        let out = build_junction_tree(&desc, &RAW).expect("pipeline");
        for (from, to) in out.directed.edges() {
            prop_assert!(out.moral.graph.contains_edge(from, to));
        }
        for child in out.directed.vertices() {
            let parents = out.directed.parents(child);
            for (i, &a) in parents.iter().enumerate() {
                for &b in &parents[i + 1..] {
                    prop_assert!(out.moral.graph.contains_edge(a, b), "co-parents {} {} unmarried", a, b);
                }
            }
        }
    }

    #[test]
    fn triangulation_is_chordal_superset(desc in arb_dag(12)) {
        let out = build_junction_tree(&desc, &RAW).expect("pipeline");
        for (a, b) in out.moral.edges() {
            prop_assert!(out.triangulation.graph.contains_edge(a, b));
        }
        prop_assert_eq!(
            check_perfect_elimination_ordering(&out.triangulation.graph, &out.triangulation.ordering),
            Ok(())
        );
    }

    #[test]
    fn cliques_are_exactly_the_maximal_ones(desc in arb_dag(9)) {
        let out = build_junction_tree(&desc, &RAW).expect("pipeline");
        prop_assert_eq!(check_cliques(&out.triangulation.graph, &out.cliques), Ok(()));

        let found: BTreeSet<Vec<VarId>> = out.cliques.iter().map(|c| c.members().to_vec()).collect();
        prop_assert_eq!(found.len(), out.cliques.len(), "no clique listed twice");
        prop_assert_eq!(found, brute_force_cliques(&out.triangulation.graph));
    }

    #[test]
    fn junction_forest_has_running_intersection(desc in arb_dag(12)) {
        let out = build_junction_tree(&desc, &RAW).expect("pipeline");
        prop_assert_eq!(check_running_intersection(&out.junction_tree), Ok(()));

        let tree = &out.junction_tree;
        prop_assert_eq!(tree.component_count(), out.clique_graph.component_count());
        prop_assert_eq!(tree.edge_count() + tree.component_count(), tree.clique_count());
    }

    #[test]
    fn pipeline_is_deterministic(desc in arb_dag(12)) {
        let first = build_junction_tree(&desc, &RAW).expect("pipeline");
        let second = build_junction_tree(&desc, &RAW).expect("pipeline");
        prop_assert_eq!(first.report(), second.report());

        // Declaration order is irrelevant.
        let mut shuffled: NetworkDescription = desc.clone();
        shuffled.nodes.reverse();
        shuffled.edges.reverse();
        let third = build_junction_tree(&shuffled, &RAW).expect("pipeline");
        prop_assert_eq!(first.report(), third.report());
    }

    #[test]
    fn verified_run_accepts_every_dag(desc in arb_dag(12)) {
        prop_assert!(build_junction_tree(&desc, &PipelineConfig::default()).is_ok());
    }
}
