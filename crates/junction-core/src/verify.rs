//! Structural checks over pipeline outputs.
//!
//! These re-derive the guarantees each stage is supposed to provide. The
//! pipeline runs them after assembly when [`crate::PipelineConfig::verify`]
//! is set; a failure is always reported as
//! [`JunctionError::InternalInvariant`] because it means a stage is wrong,
//! not the input.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::JunctionError;
use crate::graph::{Clique, JunctionTree, UndirectedGraph, sorted_neighbors};
use crate::model::VarId;

/// Check that `ordering` is a perfect elimination ordering of `graph`.
///
/// `ordering` must be a permutation of the vertex set, and every vertex's
/// neighbours that come later in it must be pairwise adjacent. A graph has
/// such an ordering iff it is chordal.
///
/// # Errors
///
/// Returns [`JunctionError::InternalInvariant`] naming the first offending
/// vertex.
pub fn check_perfect_elimination_ordering(
    graph: &UndirectedGraph,
    ordering: &[VarId],
) -> Result<(), JunctionError> {
    let position: HashMap<VarId, usize> = ordering.iter().enumerate().map(|(i, &v)| (v, i)).collect();
    if position.len() != ordering.len()
        || ordering.len() != graph.node_count()
        || !graph.nodes().all(|v| position.contains_key(&v))
    {
        return Err(JunctionError::invariant(
            "elimination ordering is not a permutation of the vertices",
        ));
    }

    for (i, &v) in ordering.iter().enumerate() {
        let later: Vec<VarId> = sorted_neighbors(graph, v)
            .into_iter()
            .filter(|n| position[n] > i)
            .collect();
        for (k, &a) in later.iter().enumerate() {
            for &b in &later[k + 1..] {
                if !graph.contains_edge(a, b) {
                    return Err(JunctionError::invariant(format!(
                        "graph is not chordal: later neighbours {a} and {b} of {v} are not adjacent"
                    )));
                }
            }
        }
    }

    Ok(())
}

/// Check that `cliques` is exactly the list of maximal cliques of `graph`,
/// largest first.
///
/// Verifies completeness, maximality, uniqueness, size ordering, and that
/// every vertex is covered. Together these pin the set: any complete
/// subgraph extends to a maximal one, and a maximal one that is complete and
/// covers its vertices is in the list.
///
/// # Errors
///
/// Returns [`JunctionError::InternalInvariant`] describing the violation.
pub fn check_cliques(graph: &UndirectedGraph, cliques: &[Clique]) -> Result<(), JunctionError> {
    let mut seen: HashSet<&Clique> = HashSet::with_capacity(cliques.len());
    let mut covered: HashSet<VarId> = HashSet::with_capacity(graph.node_count());

    for (i, clique) in cliques.iter().enumerate() {
        if clique.is_empty() {
            return Err(JunctionError::invariant(format!("clique {i} is empty")));
        }
        if !seen.insert(clique) {
            return Err(JunctionError::invariant(format!(
                "clique {i} {:?} is listed twice",
                clique.members()
            )));
        }
        if i > 0 && cliques[i - 1].len() < clique.len() {
            return Err(JunctionError::invariant(format!(
                "clique {i} is larger than its predecessor"
            )));
        }

        let members = clique.members();
        for (k, &a) in members.iter().enumerate() {
            if !graph.contains_node(a) {
                return Err(JunctionError::invariant(format!(
                    "clique {i} contains unknown vertex {a}"
                )));
            }
            for &b in &members[k + 1..] {
                if !graph.contains_edge(a, b) {
                    return Err(JunctionError::invariant(format!(
                        "clique {i} is not complete: {a} and {b} are not adjacent"
                    )));
                }
            }
        }

        // Maximal iff no outside vertex is adjacent to every member.
        if let Some(&first) = members.first() {
            let extension = graph
                .neighbors(first)
                .filter(|n| !clique.contains(*n))
                .find(|&n| members.iter().all(|&m| graph.contains_edge(m, n)));
            if let Some(n) = extension {
                return Err(JunctionError::invariant(format!(
                    "clique {i} is not maximal: {n} is adjacent to every member"
                )));
            }
        }

        covered.extend(members.iter().copied());
    }

    if let Some(v) = graph.nodes().find(|v| !covered.contains(v)) {
        return Err(JunctionError::invariant(format!(
            "vertex {v} is not in any clique"
        )));
    }

    Ok(())
}

/// Check that `tree` is a forest with the running-intersection property.
///
/// For every variable, the cliques containing it must induce a connected
/// subtree. Separators must equal the intersection of their endpoints.
///
/// # Errors
///
/// Returns [`JunctionError::InternalInvariant`] describing the violation.
pub fn check_running_intersection(tree: &JunctionTree) -> Result<(), JunctionError> {
    let n = tree.clique_count();
    let mut sets = petgraph::unionfind::UnionFind::<usize>::new(n);
    for sep in &tree.separators {
        if sep.a >= n || sep.b >= n || sep.a >= sep.b {
            return Err(JunctionError::invariant(format!(
                "separator ({}, {}) has invalid endpoints",
                sep.a, sep.b
            )));
        }
        if !sets.union(sep.a, sep.b) {
            return Err(JunctionError::invariant(format!(
                "edge ({}, {}) closes a cycle in the junction tree",
                sep.a, sep.b
            )));
        }
        let expected = tree.cliques[sep.a].intersection(&tree.cliques[sep.b]);
        if expected.is_empty() || expected != sep.vars {
            return Err(JunctionError::invariant(format!(
                "separator ({}, {}) is {:?}, cliques share {expected:?}",
                sep.a, sep.b, sep.vars
            )));
        }
    }

    let mut holders: HashMap<VarId, Vec<usize>> = HashMap::new();
    for (i, clique) in tree.cliques.iter().enumerate() {
        for &v in clique.members() {
            holders.entry(v).or_default().push(i);
        }
    }

    let adjacency = tree.adjacency();
    let mut vars: Vec<VarId> = holders.keys().copied().collect();
    vars.sort_unstable();
    for v in vars {
        let containing = &holders[&v];
        let reached = reach_within(&adjacency, containing[0], |c| tree.cliques[c].contains(v));
        if reached != containing.len() {
            return Err(JunctionError::invariant(format!(
                "running intersection fails for variable {v}: {} of {} cliques reachable",
                reached,
                containing.len()
            )));
        }
    }

    Ok(())
}

/// Count cliques reachable from `start` through cliques satisfying `keep`.
fn reach_within(adjacency: &[Vec<usize>], start: usize, keep: impl Fn(usize) -> bool) -> usize {
    let mut seen = vec![false; adjacency.len()];
    let mut queue = VecDeque::from([start]);
    seen[start] = true;
    let mut count = 0;
    while let Some(current) = queue.pop_front() {
        count += 1;
        for &next in &adjacency[current] {
            if !seen[next] && keep(next) {
                seen[next] = true;
                queue.push_back(next);
            }
        }
    }
    count
}
