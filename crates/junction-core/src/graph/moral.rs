//! Moralization: marry co-parents and drop edge direction.
//!
//! The moral graph has the same vertex set as the [`DirectedGraph`]. Its edge
//! set is the undirected skeleton of the directed edges plus one "marriage"
//! edge for every pair of vertices that share a child. The result does not
//! depend on the order children are visited in, since each marriage depends
//! only on that child's fixed parent set.

use petgraph::graphmap::UnGraphMap;
use tracing::{debug, instrument, trace};

use crate::graph::build::DirectedGraph;
use crate::graph::{UndirectedGraph, normalize_edge, sorted_edges};
use crate::model::VarId;

/// Undirected moral graph of a directed network.
#[derive(Debug, Clone)]
pub struct MoralGraph {
    pub graph: UndirectedGraph,
    /// Edges added between co-parents that were not already adjacent,
    /// normalized `(low, high)` and sorted.
    pub marriages: Vec<(VarId, VarId)>,
}

impl MoralGraph {
    /// Moralize `dag`. The directed graph is not modified.
    ///
    /// Self loops (only possible when the acyclicity check is disabled) are
    /// dropped from the skeleton so the result is a simple graph.
    #[must_use]
    #[instrument(skip(dag), fields(vertices = dag.node_count()))]
    pub fn from_directed(dag: &DirectedGraph) -> Self {
        let mut graph: UndirectedGraph =
            UnGraphMap::with_capacity(dag.node_count(), dag.edge_count());
        for v in dag.vertices() {
            graph.add_node(v);
        }
        for (from, to) in dag.edges() {
            if from != to {
                graph.add_edge(from, to, ());
            }
        }

        let mut marriages = Vec::new();
        for child in dag.vertices() {
            let parents: Vec<VarId> = dag.parents(child).into_iter().filter(|&p| p != child).collect();
            for (i, &a) in parents.iter().enumerate() {
                for &b in &parents[i + 1..] {
                    if !graph.contains_edge(a, b) {
                        graph.add_edge(a, b, ());
                        marriages.push(normalize_edge(a, b));
                    }
                }
            }
        }
        marriages.sort_unstable();

        debug!(
            edges = graph.edge_count(),
            marriages = marriages.len(),
            "moral graph built"
        );
        trace!(directed = ?dag.edges(), moral = ?sorted_edges(&graph), "moralized edges");

        Self { graph, marriages }
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// All edges, normalized `(low, high)` and sorted.
    #[must_use]
    pub fn edges(&self) -> Vec<(VarId, VarId)> {
        sorted_edges(&self.graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NetworkDescription;

    fn moralize(ids: &[VarId], edges: &[(VarId, VarId)]) -> MoralGraph {
        let desc = NetworkDescription::from_edges(ids.iter().copied(), edges);
        let dag = DirectedGraph::from_description(&desc).expect("valid network");
        MoralGraph::from_directed(&dag)
    }

    #[test]
    fn chain_gains_no_marriages() {
        let m = moralize(&[1, 2, 3], &[(1, 2), (2, 3)]);
        assert_eq!(m.edges(), vec![(1, 2), (2, 3)]);
        assert!(m.marriages.is_empty());
    }

    #[test]
    fn v_structure_marries_parents() {
        let m = moralize(&[1, 2, 3], &[(1, 3), (2, 3)]);
        assert_eq!(m.edges(), vec![(1, 2), (1, 3), (2, 3)]);
        assert_eq!(m.marriages, vec![(1, 2)]);
    }

    #[test]
    fn already_adjacent_parents_are_not_remarried() {
        // 1 → 2, 1 → 3, 2 → 3: parents of 3 are already adjacent.
        let m = moralize(&[1, 2, 3], &[(1, 2), (1, 3), (2, 3)]);
        assert_eq!(m.edge_count(), 3);
        assert!(m.marriages.is_empty());
    }

    #[test]
    fn three_parents_become_a_triangle() {
        let m = moralize(&[0, 1, 2, 3], &[(0, 3), (1, 3), (2, 3)]);
        assert_eq!(m.marriages, vec![(0, 1), (0, 2), (1, 2)]);
        assert_eq!(m.edge_count(), 6);
    }

    #[test]
    fn opposite_directed_edges_merge_into_one() {
        let desc = NetworkDescription::from_edges([1, 2], &[(1, 2), (2, 1)]);
        let dag = DirectedGraph::from_description(&desc).expect("structurally valid");
        let m = MoralGraph::from_directed(&dag);
        assert_eq!(m.edges(), vec![(1, 2)]);
    }

    #[test]
    fn isolated_vertices_survive() {
        let m = moralize(&[1, 2, 3], &[(1, 2)]);
        assert_eq!(m.node_count(), 3);
        assert!(m.graph.contains_node(3));
    }
}
