//! Directed graph construction from a [`NetworkDescription`].
//!
//! # Overview
//!
//! The directed graph is the leaf of the pipeline: vertices are variable
//! ids, an edge `A → B` means "B is a child of A". It is built once and
//! never mutated afterwards; later stages take `&DirectedGraph`.
//!
//! ## Validation
//!
//! - empty variable list → [`JunctionError::EmptyGraph`]
//! - repeated variable id → [`JunctionError::DuplicateVariable`]
//! - edge endpoint not declared → [`JunctionError::UnknownVertex`]
//!
//! Acyclicity is checked separately by [`DirectedGraph::ensure_acyclic`] so
//! callers can opt out of it.
//!
//! ## Content Hash
//!
//! [`DirectedGraph::content_hash`] is a BLAKE3 hash of the sorted vertex ids
//! and sorted edge list. Two descriptions with the same structure hash the
//! same regardless of declaration order or payloads.

use std::collections::BTreeMap;

use petgraph::Direction;
use petgraph::graphmap::DiGraphMap;
use tracing::{debug, instrument};

use crate::error::JunctionError;
use crate::graph::cycles::{find_all_cycles, is_acyclic};
use crate::model::{NetworkDescription, VarId, Variable};

// ---------------------------------------------------------------------------
// DirectedGraph
// ---------------------------------------------------------------------------

/// The Bayesian network as a directed graph.
#[derive(Debug, Clone)]
pub struct DirectedGraph {
    /// Vertices are variable ids, inserted in ascending order.
    pub graph: DiGraphMap<VarId, ()>,
    /// Variable payloads keyed by id. Opaque to every later stage.
    pub variables: BTreeMap<VarId, Variable>,
    /// BLAKE3 content hash of the vertex and edge sets.
    pub content_hash: String,
}

impl DirectedGraph {
    /// Build a [`DirectedGraph`] from a network description.
    ///
    /// Duplicate edges collapse into one.
    ///
    /// # Errors
    ///
    /// Returns [`JunctionError::EmptyGraph`], [`JunctionError::DuplicateVariable`]
    /// or [`JunctionError::UnknownVertex`] as described in the module docs.
    #[instrument(skip(desc), fields(nodes = desc.nodes.len(), edges = desc.edges.len()))]
    pub fn from_description(desc: &NetworkDescription) -> Result<Self, JunctionError> {
        if desc.nodes.is_empty() {
            return Err(JunctionError::EmptyGraph);
        }

        let mut variables: BTreeMap<VarId, Variable> = BTreeMap::new();
        for var in &desc.nodes {
            if variables.insert(var.id, var.clone()).is_some() {
                return Err(JunctionError::DuplicateVariable(var.id));
            }
        }

        let mut graph = DiGraphMap::with_capacity(variables.len(), desc.edges.len());
        for &id in variables.keys() {
            graph.add_node(id);
        }

        for edge in &desc.edges {
            for endpoint in [edge.from, edge.to] {
                if !variables.contains_key(&endpoint) {
                    return Err(JunctionError::UnknownVertex {
                        from: edge.from,
                        to: edge.to,
                        missing: endpoint,
                    });
                }
            }
            graph.add_edge(edge.from, edge.to, ());
        }

        let content_hash = compute_content_hash(&graph);
        debug!(
            vertices = graph.node_count(),
            edges = graph.edge_count(),
            %content_hash,
            "directed graph built"
        );

        Ok(Self {
            graph,
            variables,
            content_hash,
        })
    }

    /// Fail if the edge set contains a directed cycle.
    ///
    /// # Errors
    ///
    /// Returns [`JunctionError::CycleDetected`] carrying the members of the
    /// first cycle (cycles ordered by their sorted member lists).
    pub fn ensure_acyclic(&self) -> Result<(), JunctionError> {
        if is_acyclic(&self.graph) {
            return Ok(());
        }
        match find_all_cycles(&self.graph).into_iter().next() {
            Some(members) => Err(JunctionError::CycleDetected { members }),
            None => Ok(()),
        }
    }

    /// Return the number of vertices (variables).
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of distinct directed edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Vertex ids in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = VarId> + '_ {
        self.variables.keys().copied()
    }

    /// Parents of `v` (sources of edges into `v`), ascending.
    #[must_use]
    pub fn parents(&self, v: VarId) -> Vec<VarId> {
        let mut parents: Vec<VarId> = self
            .graph
            .neighbors_directed(v, Direction::Incoming)
            .collect();
        parents.sort_unstable();
        parents
    }

    /// All directed edges as `(from, to)` pairs, sorted.
    #[must_use]
    pub fn edges(&self) -> Vec<(VarId, VarId)> {
        let mut edges: Vec<(VarId, VarId)> =
            self.graph.all_edges().map(|(a, b, _)| (a, b)).collect();
        edges.sort_unstable();
        edges
    }

    /// Look up a variable's payload.
    #[must_use]
    pub fn variable(&self, id: VarId) -> Option<&Variable> {
        self.variables.get(&id)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn compute_content_hash(graph: &DiGraphMap<VarId, ()>) -> String {
    let mut vertices: Vec<VarId> = graph.nodes().collect();
    vertices.sort_unstable();
    let mut edges: Vec<(VarId, VarId)> = graph.all_edges().map(|(a, b, _)| (a, b)).collect();
    edges.sort_unstable();

    let mut hasher = blake3::Hasher::new();
    for v in vertices {
        hasher.update(&v.to_le_bytes());
    }
    hasher.update(b"\x00");
    for (from, to) in edges {
        hasher.update(&from.to_le_bytes());
        hasher.update(&to.to_le_bytes());
    }
    format!("blake3:{}", hasher.finalize())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
