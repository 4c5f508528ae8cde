//! Clique graph: one vertex per clique, edges weighted by overlap.

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use tracing::{debug, instrument};

use crate::graph::cliques::Clique;
use crate::model::VarId;

/// Edge payload: the variables two cliques share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedVars {
    /// Ascending variable ids; never empty.
    pub vars: Vec<VarId>,
}

impl SharedVars {
    /// Edge weight used by the spanning-tree search.
    #[must_use]
    pub fn weight(&self) -> usize {
        self.vars.len()
    }
}

/// Weighted graph over the ordered clique list.
///
/// Node `i` of [`CliqueGraph::graph`] is clique `i` of the list it was built
/// from. Cliques sharing no variable are not adjacent.
#[derive(Debug, Clone)]
pub struct CliqueGraph {
    pub graph: UnGraph<Clique, SharedVars>,
}

impl CliqueGraph {
    /// Build the clique graph, comparing every unordered pair `(i, j)`.
    ///
    /// Edges are inserted in `(i, j)` lexicographic order with `i < j`.
    #[must_use]
    #[instrument(skip(cliques), fields(cliques = cliques.len()))]
    pub fn from_cliques(cliques: &[Clique]) -> Self {
        let mut graph = UnGraph::with_capacity(cliques.len(), 0);
        let nodes: Vec<NodeIndex> = cliques.iter().map(|c| graph.add_node(c.clone())).collect();

        for (i, a) in cliques.iter().enumerate() {
            for (j, b) in cliques.iter().enumerate().skip(i + 1) {
                let vars = a.intersection(b);
                if !vars.is_empty() {
                    graph.add_edge(nodes[i], nodes[j], SharedVars { vars });
                }
            }
        }

        debug!(edges = graph.edge_count(), "clique graph built");
        Self { graph }
    }

    #[must_use]
    pub fn clique_count(&self) -> usize {
        self.graph.node_count()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Clique at list position `i`.
    #[must_use]
    pub fn clique(&self, i: usize) -> Option<&Clique> {
        self.graph.node_weight(NodeIndex::new(i))
    }

    /// Every edge as `(i, j, shared)` with `i < j`, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize, &SharedVars)> + '_ {
        self.graph.edge_references().map(|e| {
            let (a, b) = (e.source().index(), e.target().index());
            (a.min(b), a.max(b), e.weight())
        })
    }

    /// Shared variables between cliques `i` and `j`, if they overlap.
    #[must_use]
    pub fn shared(&self, i: usize, j: usize) -> Option<&SharedVars> {
        self.graph
            .find_edge(NodeIndex::new(i), NodeIndex::new(j))
            .and_then(|e: EdgeIndex| self.graph.edge_weight(e))
    }

    /// Number of connected components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        petgraph::algo::connected_components(&self.graph)
    }
}
