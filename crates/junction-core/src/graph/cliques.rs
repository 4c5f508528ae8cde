//! Maximal-clique enumeration over the triangulated graph.
//!
//! # Algorithm
//!
//! Bron–Kerbosch with Tomita pivoting. Each search frame owns its partial
//! clique and its candidate/excluded sets (as [`FixedBitSet`]s over a dense
//! vertex index), and frames live on an explicit stack, so sibling branches
//! never share mutable state.
//!
//! Vertices are indexed in ascending id order and branches are explored
//! smallest index first, which makes discovery order deterministic. The final
//! list is sorted by descending size; equal sizes keep discovery order.

use std::cmp::Reverse;
use std::collections::HashMap;

use fixedbitset::FixedBitSet;
use tracing::{debug, instrument, trace};

use crate::graph::UndirectedGraph;
use crate::model::VarId;

// ---------------------------------------------------------------------------
// Clique
// ---------------------------------------------------------------------------

/// A set of variables, stored sorted and deduplicated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Clique {
    members: Vec<VarId>,
}

impl Clique {
    #[must_use]
    pub fn new(members: impl IntoIterator<Item = VarId>) -> Self {
        let mut members: Vec<VarId> = members.into_iter().collect();
        members.sort_unstable();
        members.dedup();
        Self { members }
    }

    /// Members in ascending order.
    #[must_use]
    pub fn members(&self) -> &[VarId] {
        &self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub fn contains(&self, v: VarId) -> bool {
        self.members.binary_search(&v).is_ok()
    }

    /// Shared variables, ascending.
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Vec<VarId> {
        let (mut i, mut j) = (0, 0);
        let mut shared = Vec::new();
        while i < self.members.len() && j < other.members.len() {
            match self.members[i].cmp(&other.members[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    shared.push(self.members[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        shared
    }

    #[must_use]
    pub fn is_subset(&self, other: &Self) -> bool {
        self.members.iter().all(|&v| other.contains(v))
    }
}

// ---------------------------------------------------------------------------
// Enumeration
// ---------------------------------------------------------------------------

struct Frame {
    clique: Vec<usize>,
    candidates: FixedBitSet,
    excluded: FixedBitSet,
}

/// Enumerate every maximal clique of `graph`, largest first.
///
/// Isolated vertices form singleton cliques. An empty graph yields an empty
/// list.
#[must_use]
#[instrument(skip(graph), fields(vertices = graph.node_count(), edges = graph.edge_count()))]
pub fn maximal_cliques(graph: &UndirectedGraph) -> Vec<Clique> {
    let mut vertices: Vec<VarId> = graph.nodes().collect();
    vertices.sort_unstable();
    let n = vertices.len();
    let index: HashMap<VarId, usize> = vertices.iter().enumerate().map(|(i, &v)| (v, i)).collect();

    let adjacency: Vec<FixedBitSet> = vertices
        .iter()
        .map(|&v| {
            let mut bits = FixedBitSet::with_capacity(n);
            for neighbor in graph.neighbors(v) {
                if neighbor != v {
                    bits.insert(index[&neighbor]);
                }
            }
            bits
        })
        .collect();

    let mut everything = FixedBitSet::with_capacity(n);
    everything.insert_range(..);

    let mut stack = vec![Frame {
        clique: Vec::new(),
        candidates: everything,
        excluded: FixedBitSet::with_capacity(n),
    }];
    let mut found = Vec::new();

    while let Some(Frame {
        clique,
        mut candidates,
        mut excluded,
    }) = stack.pop()
    {
        let Some(pivot) = candidates
            .union(&excluded)
            .max_by_key(|&u| (candidates.intersection(&adjacency[u]).count(), Reverse(u)))
        else {
            if !clique.is_empty() {
                found.push(Clique::new(clique.iter().map(|&i| vertices[i])));
            }
            continue;
        };

        let branch: Vec<usize> = candidates.difference(&adjacency[pivot]).collect();
        let mut children = Vec::with_capacity(branch.len());
        for v in branch {
            let mut next = clique.clone();
            next.push(v);
            let mut next_candidates = candidates.clone();
            next_candidates.intersect_with(&adjacency[v]);
            let mut next_excluded = excluded.clone();
            next_excluded.intersect_with(&adjacency[v]);
            children.push(Frame {
                clique: next,
                candidates: next_candidates,
                excluded: next_excluded,
            });

            candidates.set(v, false);
            excluded.insert(v);
        }
        // Reversed so the smallest branch is popped first.
        stack.extend(children.into_iter().rev());
    }

    found.sort_by_key(|c| Reverse(c.len()));

    debug!(cliques = found.len(), largest = found.first().map_or(0, Clique::len), "maximal cliques found");
    for (i, clique) in found.iter().enumerate() {
        trace!(index = i, members = ?clique.members(), "clique");
    }

    found
}
