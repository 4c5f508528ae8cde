//! Directed-cycle detection for the input network.
//!
//! Moralization and triangulation run on cyclic input without complaint, but
//! the resulting tree is meaningless for inference. [`find_all_cycles`] lets
//! graph construction fail fast instead.

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;

use crate::model::VarId;

/// Find all cycles currently present in `graph`.
///
/// Each entry is the sorted member list of one strongly connected component
/// with more than one vertex. Self-loops are reported as a one-element
/// cycle. The outer list is sorted.
#[must_use]
pub fn find_all_cycles(graph: &DiGraphMap<VarId, ()>) -> Vec<Vec<VarId>> {
    let mut cycles: Vec<Vec<VarId>> = tarjan_scc(graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1
                || component
                    .first()
                    .is_some_and(|&v| graph.contains_edge(v, v))
        })
        .map(|mut component| {
            component.sort_unstable();
            component
        })
        .collect();

    cycles.sort_unstable();
    cycles
}

/// Return `true` if `graph` has no directed cycle.
#[must_use]
pub fn is_acyclic(graph: &DiGraphMap<VarId, ()>) -> bool {
    !petgraph::algo::is_cyclic_directed(graph)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn digraph(edges: &[(VarId, VarId)]) -> DiGraphMap<VarId, ()> {
        DiGraphMap::from_edges(edges)
    }

    #[test]
    fn dag_has_no_cycles() {
        let g = digraph(&[(1, 2), (2, 3), (1, 3)]);
        assert!(find_all_cycles(&g).is_empty());
        assert!(is_acyclic(&g));
    }

    #[test]
    fn two_cycles_reported_sorted() {
        let g = digraph(&[(5, 4), (4, 5), (3, 1), (1, 2), (2, 3), (3, 6)]);
        assert_eq!(find_all_cycles(&g), vec![vec![1, 2, 3], vec![4, 5]]);
        assert!(!is_acyclic(&g));
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let g = digraph(&[(7, 7), (7, 8)]);
        assert_eq!(find_all_cycles(&g), vec![vec![7]]);
        assert!(!is_acyclic(&g));
    }
}
