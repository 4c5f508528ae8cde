//! Junction-tree assembly by maximum-weight spanning forest.
//!
//! # Algorithm
//!
//! Kruskal over the clique-graph edges, heaviest first. Equal weights are
//! ordered by clique-index pair `(i, j)`, so the chosen forest is fully
//! determined by the clique list. A disconnected clique graph yields one tree
//! per component; that is a normal outcome for networks made of independent
//! sub-models.
//!
//! Every kept edge records its separator, the variables shared by its two
//! endpoint cliques.

use std::cmp::Reverse;
use std::collections::{HashMap, VecDeque};

use petgraph::unionfind::UnionFind;
use tracing::{debug, instrument, trace};

use crate::graph::clique_graph::CliqueGraph;
use crate::graph::cliques::Clique;
use crate::model::VarId;

/// A junction-tree edge between cliques `a < b`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Separator {
    pub a: usize,
    pub b: usize,
    /// Variables shared by cliques `a` and `b`, ascending.
    pub vars: Vec<VarId>,
}

/// Maximum-weight spanning forest of a [`CliqueGraph`].
#[derive(Debug, Clone)]
pub struct JunctionTree {
    /// Cliques in list order; tree vertex `i` is `cliques[i]`.
    pub cliques: Vec<Clique>,
    /// Tree edges sorted by `(a, b)`.
    pub separators: Vec<Separator>,
}

impl JunctionTree {
    /// Assemble the forest from `clique_graph`.
    #[must_use]
    #[instrument(skip(clique_graph), fields(cliques = clique_graph.clique_count(), edges = clique_graph.edge_count()))]
    pub fn from_clique_graph(clique_graph: &CliqueGraph) -> Self {
        let n = clique_graph.clique_count();
        let cliques: Vec<Clique> = clique_graph.graph.node_weights().cloned().collect();

        let mut candidates: Vec<_> = clique_graph.edges().collect();
        candidates.sort_by_key(|&(i, j, shared)| (Reverse(shared.weight()), i, j));

        let mut sets = UnionFind::<usize>::new(n);
        let mut separators = Vec::with_capacity(n.saturating_sub(1));
        for (a, b, shared) in candidates {
            if sets.union(a, b) {
                separators.push(Separator {
                    a,
                    b,
                    vars: shared.vars.clone(),
                });
            }
        }
        separators.sort_by_key(|s| (s.a, s.b));

        let tree = Self { cliques, separators };
        debug!(
            edges = tree.separators.len(),
            components = tree.component_count(),
            "junction tree assembled"
        );
        for sep in &tree.separators {
            trace!(a = sep.a, b = sep.b, vars = ?sep.vars, "separator");
        }
        tree
    }

    #[must_use]
    pub fn clique_count(&self) -> usize {
        self.cliques.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.separators.len()
    }

    /// Number of trees in the forest.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.cliques.len().saturating_sub(self.separators.len())
    }

    /// Separator between cliques `i` and `j`, if they are tree neighbours.
    #[must_use]
    pub fn separator(&self, i: usize, j: usize) -> Option<&Separator> {
        let key = (i.min(j), i.max(j));
        self.separators
            .binary_search_by_key(&key, |s| (s.a, s.b))
            .ok()
            .map(|pos| &self.separators[pos])
    }

    /// Tree neighbours of every clique, ascending.
    #[must_use]
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adjacency = vec![Vec::new(); self.cliques.len()];
        for sep in &self.separators {
            adjacency[sep.a].push(sep.b);
            adjacency[sep.b].push(sep.a);
        }
        for neighbors in &mut adjacency {
            neighbors.sort_unstable();
        }
        adjacency
    }

    /// Cliques grouped by tree, each group ascending, groups ordered by
    /// their smallest clique index.
    #[must_use]
    pub fn components(&self) -> Vec<Vec<usize>> {
        let mut sets = UnionFind::<usize>::new(self.cliques.len());
        for sep in &self.separators {
            sets.union(sep.a, sep.b);
        }

        let mut groups: Vec<Vec<usize>> = Vec::new();
        let mut group_of_root = HashMap::new();
        for i in 0..self.cliques.len() {
            let root = sets.find(i);
            let slot = *group_of_root.entry(root).or_insert_with(|| {
                groups.push(Vec::new());
                groups.len() - 1
            });
            groups[slot].push(i);
        }
        groups
    }

    /// Clique path from `from` to `to` (inclusive), or `None` when they lie
    /// in different trees or an index is out of range.
    #[must_use]
    pub fn path(&self, from: usize, to: usize) -> Option<Vec<usize>> {
        let n = self.cliques.len();
        if from >= n || to >= n {
            return None;
        }

        let adjacency = self.adjacency();
        let mut parent: Vec<Option<usize>> = vec![None; n];
        let mut seen = vec![false; n];
        let mut queue = VecDeque::from([from]);
        seen[from] = true;

        while let Some(current) = queue.pop_front() {
            if current == to {
                let mut path = vec![to];
                let mut cursor = to;
                while let Some(prev) = parent[cursor] {
                    path.push(prev);
                    cursor = prev;
                }
                path.reverse();
                return Some(path);
            }
            for &next in &adjacency[current] {
                if !seen[next] {
                    seen[next] = true;
                    parent[next] = Some(current);
                    queue.push_back(next);
                }
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assemble(cliques: &[&[VarId]]) -> JunctionTree {
        let cliques: Vec<Clique> = cliques.iter().map(|c| Clique::new(c.iter().copied())).collect();
        JunctionTree::from_clique_graph(&CliqueGraph::from_cliques(&cliques))
    }

    #[test]
    fn chain_cliques_form_one_edge() {
        let jt = assemble(&[&[1, 2], &[2, 3]]);
        assert_eq!(
            jt.separators,
            vec![Separator {
                a: 0,
                b: 1,
                vars: vec![2]
            }]
        );
        assert_eq!(jt.component_count(), 1);
    }

    #[test]
    fn single_clique_has_no_edges() {
        let jt = assemble(&[&[1, 2, 3]]);
        assert!(jt.separators.is_empty());
        assert_eq!(jt.component_count(), 1);
    }

    #[test]
    fn heavier_overlap_wins() {
        // 0 and 1 share {2,3}; 2 shares only {3} with both.
        let jt = assemble(&[&[1, 2, 3], &[2, 3, 4], &[3, 5]]);
        assert_eq!(jt.edge_count(), 2);
        assert!(jt.separator(0, 1).is_some(), "weight-2 edge kept");
        // Tie between (0,2) and (1,2) at weight 1 → lower pair wins.
        assert!(jt.separator(0, 2).is_some());
        assert!(jt.separator(1, 2).is_none());
    }

    #[test]
    fn disconnected_cliques_form_a_forest() {
        let jt = assemble(&[&[1, 2], &[3, 4]]);
        assert!(jt.separators.is_empty());
        assert_eq!(jt.component_count(), 2);
        assert_eq!(jt.components(), vec![vec![0], vec![1]]);
        assert_eq!(jt.path(0, 1), None);
    }

    #[test]
    fn path_walks_the_tree() {
        let jt = assemble(&[&[1, 2], &[2, 3], &[3, 4]]);
        assert_eq!(jt.path(0, 2), Some(vec![0, 1, 2]));
        assert_eq!(jt.path(2, 0), Some(vec![2, 1, 0]));
        assert_eq!(jt.path(1, 1), Some(vec![1]));
        assert_eq!(jt.path(0, 9), None);
    }

    #[test]
    fn separator_lookup_is_symmetric() {
        let jt = assemble(&[&[1, 2], &[2, 3]]);
        assert_eq!(jt.separator(1, 0), jt.separator(0, 1));
        assert_eq!(jt.separator(0, 1).map(|s| s.vars.clone()), Some(vec![2]));
    }
}
