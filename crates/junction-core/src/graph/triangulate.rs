//! Triangulation by minimum-degree elimination.
//!
//! # Algorithm
//!
//! Two passes over independent copies of the moral graph:
//!
//! 1. **Ordering.** On a scratch copy, repeatedly pick the vertex of minimum
//!    current degree (ties → smallest id), connect all of its neighbours,
//!    remove it, and append it to the ordering.
//! 2. **Fill-in.** On a fresh copy, visit vertices in that order and connect
//!    every pair of the vertex's neighbours that come later in the ordering.
//!
//! Once a vertex has been visited in pass 2, no later step adds an edge
//! incident to it, so its later neighbourhood stays a clique. The ordering is
//! therefore a perfect elimination ordering of the result, which makes the
//! result chordal.

use std::collections::HashMap;

use tracing::{debug, instrument, trace};

use crate::graph::moral::MoralGraph;
use crate::graph::{UndirectedGraph, normalize_edge, sorted_edges, sorted_neighbors};
use crate::model::VarId;

/// Output of triangulation.
#[derive(Debug, Clone)]
pub struct Triangulation {
    /// Chordal supergraph of the moral graph.
    pub graph: UndirectedGraph,
    /// Elimination ordering; a perfect elimination ordering of `graph`.
    pub ordering: Vec<VarId>,
    /// Edges added on top of the moral graph, normalized and sorted.
    pub fill_in: Vec<(VarId, VarId)>,
}

impl Triangulation {
    /// Triangulate `moral` with the minimum-degree heuristic.
    #[must_use]
    #[instrument(skip(moral), fields(vertices = moral.node_count(), edges = moral.edge_count()))]
    pub fn from_moral(moral: &MoralGraph) -> Self {
        let ordering = min_degree_ordering(&moral.graph);
        let (graph, fill_in) = fill_along(&moral.graph, &ordering);

        debug!(
            fill_in = fill_in.len(),
            edges = graph.edge_count(),
            "triangulated graph built"
        );
        trace!(?ordering, triangulated = ?sorted_edges(&graph), "elimination ordering");

        Self {
            graph,
            ordering,
            fill_in,
        }
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

    /// Position of every vertex in the elimination ordering.
    #[must_use]
    pub fn positions(&self) -> HashMap<VarId, usize> {
        positions(&self.ordering)
    }
}

/// Compute a minimum-degree elimination ordering of `graph`.
///
/// Simulates elimination on an owned copy; `graph` itself is untouched.
#[must_use]
pub fn min_degree_ordering(graph: &UndirectedGraph) -> Vec<VarId> {
    let mut work = graph.clone();
    let mut ordering = Vec::with_capacity(graph.node_count());

    loop {
        let Some(v) = work.nodes().min_by_key(|&n| (work.neighbors(n).count(), n)) else {
            break;
        };
        let neighbors = sorted_neighbors(&work, v);
        connect_pairwise(&mut work, &neighbors);
        work.remove_node(v);
        ordering.push(v);
    }

    ordering
}

/// Replay fill-in along `ordering` on a fresh copy of `graph`.
///
/// Returns the filled graph and the added edges.
fn fill_along(graph: &UndirectedGraph, ordering: &[VarId]) -> (UndirectedGraph, Vec<(VarId, VarId)>) {
    let position = positions(ordering);
    let mut filled = graph.clone();
    let mut fill_in = Vec::new();

    for (i, &v) in ordering.iter().enumerate() {
        let later: Vec<VarId> = sorted_neighbors(&filled, v)
            .into_iter()
            .filter(|n| position.get(n).is_some_and(|&p| p > i))
            .collect();
        fill_in.extend(connect_pairwise(&mut filled, &later));
    }

    fill_in.sort_unstable();
    (filled, fill_in)
}

/// Connect every pair in `vertices`; return the edges that were new.
fn connect_pairwise(graph: &mut UndirectedGraph, vertices: &[VarId]) -> Vec<(VarId, VarId)> {
    let mut added = Vec::new();
    for (i, &a) in vertices.iter().enumerate() {
        for &b in &vertices[i + 1..] {
            if !graph.contains_edge(a, b) {
                graph.add_edge(a, b, ());
                added.push(normalize_edge(a, b));
            }
        }
    }
    added
}

fn positions(ordering: &[VarId]) -> HashMap<VarId, usize> {
    ordering.iter().enumerate().map(|(i, &v)| (v, i)).collect()
}
