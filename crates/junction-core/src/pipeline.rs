//! End-to-end junction-tree construction.
//!
//! [`build_junction_tree`] runs every stage in order and keeps each
//! intermediate artifact on [`PipelineOutput`]. The run either completes or
//! returns the first error; there is no partial output.

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::PipelineConfig;
use crate::error::JunctionError;
use crate::graph::{
    Clique, CliqueGraph, DirectedGraph, JunctionTree, MoralGraph, Triangulation, find_all_cycles,
    is_acyclic, maximal_cliques,
};
use crate::model::{NetworkDescription, VarId};
use crate::verify;

/// Every stage's output for one invocation.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub directed: DirectedGraph,
    pub moral: MoralGraph,
    pub triangulation: Triangulation,
    /// Maximal cliques, largest first.
    pub cliques: Vec<Clique>,
    pub clique_graph: CliqueGraph,
    pub junction_tree: JunctionTree,
}

/// Serializable summary handed to inference consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JunctionReport {
    pub content_hash: String,
    pub cliques: Vec<Vec<VarId>>,
    pub edges: Vec<ReportEdge>,
    pub components: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEdge {
    pub a: usize,
    pub b: usize,
    pub separator: Vec<VarId>,
}

/// Intermediate edge sets, for `--stages` style diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub directed_edges: Vec<(VarId, VarId)>,
    pub moral_edges: Vec<(VarId, VarId)>,
    pub marriages: Vec<(VarId, VarId)>,
    pub elimination_ordering: Vec<VarId>,
    pub fill_in: Vec<(VarId, VarId)>,
    pub clique_graph_edges: Vec<ReportEdge>,
}

/// Validate `desc` and build its directed graph, honouring
/// `config.check_acyclic`.
///
/// # Errors
///
/// Any [`DirectedGraph::from_description`] error, or
/// [`JunctionError::CycleDetected`] when the check is on.
pub fn load_directed(
    desc: &NetworkDescription,
    config: &PipelineConfig,
) -> Result<DirectedGraph, JunctionError> {
    let directed = DirectedGraph::from_description(desc)?;
    if config.check_acyclic {
        directed.ensure_acyclic()?;
    } else if !is_acyclic(&directed.graph) {
        let cycles = find_all_cycles(&directed.graph);
        warn!(
            cycles = cycles.len(),
            first = ?cycles.first(),
            "network is cyclic; acyclicity check disabled, continuing"
        );
    }
    Ok(directed)
}

/// Run the full pipeline on `desc`.
///
/// # Errors
///
/// - [`JunctionError::EmptyGraph`], [`JunctionError::DuplicateVariable`],
///   [`JunctionError::UnknownVertex`] for malformed input.
/// - [`JunctionError::CycleDetected`] for cyclic input when
///   `config.check_acyclic` is set.
/// - [`JunctionError::InternalInvariant`] if verification is on and a stage
///   produced an invalid structure.
#[instrument(skip_all, fields(nodes = desc.nodes.len(), edges = desc.edges.len()))]
pub fn build_junction_tree(
    desc: &NetworkDescription,
    config: &PipelineConfig,
) -> Result<PipelineOutput, JunctionError> {
    let directed = load_directed(desc, config)?;
    let moral = MoralGraph::from_directed(&directed);
    let triangulation = Triangulation::from_moral(&moral);
    let cliques = maximal_cliques(&triangulation.graph);
    let clique_graph = CliqueGraph::from_cliques(&cliques);
    let junction_tree = JunctionTree::from_clique_graph(&clique_graph);

    let output = PipelineOutput {
        directed,
        moral,
        triangulation,
        cliques,
        clique_graph,
        junction_tree,
    };

    if config.verify {
        output.verify()?;
    }

    info!(
        cliques = output.cliques.len(),
        tree_edges = output.junction_tree.edge_count(),
        components = output.junction_tree.component_count(),
        "junction tree built"
    );
    Ok(output)
}

impl PipelineOutput {
    /// Re-check every stage guarantee.
    ///
    /// # Errors
    ///
    /// Returns [`JunctionError::InternalInvariant`] on the first violation.
    pub fn verify(&self) -> Result<(), JunctionError> {
        if self.moral.node_count() != self.directed.node_count() {
            return Err(JunctionError::invariant(
                "moral graph vertex set differs from the network",
            ));
        }
        for (from, to) in self.directed.edges() {
            if from != to && !self.moral.graph.contains_edge(from, to) {
                return Err(JunctionError::invariant(format!(
                    "moral graph lost edge {from} - {to}"
                )));
            }
        }
        for (a, b) in self.moral.edges() {
            if !self.triangulation.graph.contains_edge(a, b) {
                return Err(JunctionError::invariant(format!(
                    "triangulated graph lost edge {a} - {b}"
                )));
            }
        }
        verify::check_perfect_elimination_ordering(
            &self.triangulation.graph,
            &self.triangulation.ordering,
        )?;
        verify::check_cliques(&self.triangulation.graph, &self.cliques)?;
        verify::check_running_intersection(&self.junction_tree)
    }

    /// Cliques and separators in their serializable form.
    #[must_use]
    pub fn report(&self) -> JunctionReport {
        JunctionReport {
            content_hash: self.directed.content_hash.clone(),
            cliques: self
                .cliques
                .iter()
                .map(|c| c.members().to_vec())
                .collect(),
            edges: self
                .junction_tree
                .separators
                .iter()
                .map(|s| ReportEdge {
                    a: s.a,
                    b: s.b,
                    separator: s.vars.clone(),
                })
                .collect(),
            components: self.junction_tree.component_count(),
        }
    }

    /// Intermediate edge sets of every stage.
    #[must_use]
    pub fn stages(&self) -> StageReport {
        StageReport {
            directed_edges: self.directed.edges(),
            moral_edges: self.moral.edges(),
            marriages: self.moral.marriages.clone(),
            elimination_ordering: self.triangulation.ordering.clone(),
            fill_in: self.triangulation.fill_in.clone(),
            clique_graph_edges: self
                .clique_graph
                .edges()
                .map(|(a, b, shared)| ReportEdge {
                    a,
                    b,
                    separator: shared.vars.clone(),
                })
                .collect(),
        }
    }
}
