//! Graph stages of junction-tree construction.
//!
//! # Overview
//!
//! Each stage consumes the previous stage's output by reference and returns
//! a new owned value; no stage mutates its input or shares adjacency with
//! another stage.
//!
//! ## Pipeline
//!
//! ```text
//! NetworkDescription
//!        ↓  build::DirectedGraph::from_description()
//! DirectedGraph (DiGraphMap, acyclic unless the check is disabled)
//!        ↓  moral::MoralGraph::from_directed()
//! MoralGraph (skeleton + co-parent marriages)
//!        ↓  triangulate::Triangulation::from_moral()
//! Triangulation (chordal graph + minimum-degree elimination ordering)
//!        ↓  cliques::maximal_cliques()
//! Vec<Clique> (largest first)
//!        ↓  clique_graph::CliqueGraph::from_cliques()
//! CliqueGraph (edges weighted by |intersection|)
//!        ↓  junction::JunctionTree::from_clique_graph()
//! JunctionTree (maximum-weight spanning forest + separators)
//! ```
//!
//! [`crate::pipeline::build_junction_tree`] runs all of them in order.

pub mod build;
pub mod clique_graph;
pub mod cliques;
pub mod cycles;
pub mod junction;
pub mod moral;
pub mod triangulate;

use petgraph::graphmap::UnGraphMap;

use crate::model::VarId;

// Re-export primary types at module level for convenience.
pub use build::DirectedGraph;
pub use clique_graph::{CliqueGraph, SharedVars};
pub use cliques::{Clique, maximal_cliques};
pub use cycles::{find_all_cycles, is_acyclic};
pub use junction::{JunctionTree, Separator};
pub use moral::MoralGraph;
pub use triangulate::{Triangulation, min_degree_ordering};

/// Undirected simple graph keyed by variable id.
pub type UndirectedGraph = UnGraphMap<VarId, ()>;

/// Order an undirected edge as `(low, high)`.
#[must_use]
pub const fn normalize_edge(a: VarId, b: VarId) -> (VarId, VarId) {
    if a <= b { (a, b) } else { (b, a) }
}

/// All edges of `graph`, normalized and sorted.
#[must_use]
pub fn sorted_edges(graph: &UndirectedGraph) -> Vec<(VarId, VarId)> {
    let mut edges: Vec<(VarId, VarId)> = graph
        .all_edges()
        .map(|(a, b, _)| normalize_edge(a, b))
        .collect();
    edges.sort_unstable();
    edges
}

/// Neighbours of `v`, ascending.
#[must_use]
pub fn sorted_neighbors(graph: &UndirectedGraph, v: VarId) -> Vec<VarId> {
    let mut neighbors: Vec<VarId> = graph.neighbors(v).collect();
    neighbors.sort_unstable();
    neighbors
}
