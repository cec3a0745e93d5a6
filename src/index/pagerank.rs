//! Iterative PageRank over the accumulated link graph (spec §4.7).
//!
//! Each sweep's per-node update only reads the *previous* sweep's ranks, so the nodes
//! within one sweep are independent of each other; we fan that out with `rayon` instead
//! of a sequential loop, matching the teacher's existing `rayon` dependency and the
//! data-parallel nature the spec calls out explicitly (SPEC_FULL §4.7/§10).

use rayon::prelude::*;
use std::collections::HashMap;

use crate::index::store::LinkGraph;
use crate::model::DocId;

pub struct PageRank;

impl PageRank {
    /// Computes PageRank over `nodes` using `graph`'s outlinks, with damping `d` over a
    /// fixed `iterations` sweeps. No convergence check (spec §4.7): the iteration count
    /// is the only stopping condition.
    pub fn compute(
        nodes: &[DocId],
        graph: &LinkGraph,
        damping: f64,
        iterations: usize,
    ) -> HashMap<DocId, f64> {
        if nodes.is_empty() {
            return HashMap::new();
        }

        let n = nodes.len() as f64;
        let mut ranks: HashMap<DocId, f64> = nodes.iter().map(|&id| (id, 1.0)).collect();

        // Incoming-edge index: for each node, which nodes link to it. Built once; the
        // link graph doesn't change mid-computation.
        let mut incoming: HashMap<DocId, Vec<DocId>> = HashMap::new();
        for &from in nodes {
            for to in graph.outlinks(from) {
                incoming.entry(to).or_default().push(from);
            }
        }

        for _ in 0..iterations {
            let base = (1.0 - damping) / n;
            let new_ranks: Vec<(DocId, f64)> = nodes
                .par_iter()
                .map(|&node| {
                    let contrib: f64 = incoming
                        .get(&node)
                        .map(|sources| {
                            sources
                                .iter()
                                .map(|&src| {
                                    let out_degree = graph.out_degree(src);
                                    if out_degree == 0 {
                                        0.0 // dangling nodes contribute nothing (spec §4.7).
                                    } else {
                                        ranks.get(&src).copied().unwrap_or(0.0) / out_degree as f64
                                    }
                                })
                                .sum()
                        })
                        .unwrap_or(0.0);
                    (node, base + damping * contrib)
                })
                .collect();

            ranks = new_ranks.into_iter().collect();
        }

        ranks
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph_with_edges(edges: &[(u64, u64)]) -> (LinkGraph, Vec<DocId>) {
        let graph = LinkGraph::new();
        let mut nodes = std::collections::HashSet::new();
        for &(from, to) in edges {
            graph.add_edge(DocId(from), DocId(to));
            nodes.insert(DocId(from));
            nodes.insert(DocId(to));
        }
        let mut nodes: Vec<DocId> = nodes.into_iter().collect();
        nodes.sort();
        (graph, nodes)
    }

    #[test]
    fn empty_graph_yields_no_ranks() {
        let graph = LinkGraph::new();
        let ranks = PageRank::compute(&[], &graph, 0.85, 50);
        assert!(ranks.is_empty());
    }

    #[test]
    fn ranks_converge_to_stationary_mass_of_one() {
        // With no dangling nodes, each sweep's total mass is (1-d) + d*previous_mass,
        // a contraction toward the fixed point 1 (spec §3: "sum to 1 ... after any
        // completed iteration sweep"). After 50 sweeps at d=0.85 the residual is
        // negligible.
        let (graph, nodes) = graph_with_edges(&[(1, 2), (2, 3), (3, 4), (4, 1)]);
        let ranks = PageRank::compute(&nodes, &graph, 0.85, 50);
        let sum: f64 = ranks.values().sum();
        assert!((sum - 1.0).abs() < 1e-6, "got sum {sum}");
    }

    #[test]
    fn uniform_ring_converges_to_equal_ranks() {
        let (graph, nodes) = graph_with_edges(&[(1, 2), (2, 3), (3, 4), (4, 1)]);
        let ranks = PageRank::compute(&nodes, &graph, 0.85, 50);
        let values: Vec<f64> = ranks.values().copied().collect();
        for w in values.windows(2) {
            assert!((w[0] - w[1]).abs() < 1e-6);
        }
    }

    #[test]
    fn hub_page_outranks_leaf_pages() {
        // 1 -> 2, 1 -> 3, 1 -> 4, and 2,3,4 all link back to 1: node 1 should dominate.
        let (graph, nodes) = graph_with_edges(&[(1, 2), (1, 3), (1, 4), (2, 1), (3, 1), (4, 1)]);
        let ranks = PageRank::compute(&nodes, &graph, 0.85, 50);
        let r1 = ranks[&DocId(1)];
        for id in [2u64, 3, 4] {
            assert!(r1 > ranks[&DocId(id)], "hub should outrank leaf {id}");
        }
    }

    #[test]
    fn dangling_node_contributes_zero_not_redistributed() {
        // Node 2 has no outlinks (dangling). Node 1 links to node 2 only.
        let (graph, nodes) = graph_with_edges(&[(1, 2)]);
        let ranks = PageRank::compute(&nodes, &graph, 0.85, 50);
        // Node 1 receives no incoming rank, so it converges toward the random-jump floor.
        let base = (1.0 - 0.85) / nodes.len() as f64;
        assert!((ranks[&DocId(1)] - base).abs() < 1e-6);
    }
}
