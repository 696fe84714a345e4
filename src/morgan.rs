//! # Morgan Refinement
//!
//! Round 1 seeds each atom with
//! `hash(properties ++ bond orders sorted descending)`. Round `s` for
//! `s = 2..=max_radius` replaces every invariant with
//!
//! ```text
//! hash(prev, order_1, nb_prev_1, order_2, nb_prev_2, …)
//! ```
//!
//! where the `(order, nb_prev)` pairs are sorted descending. Rounds at or
//! past `min_radius` contribute their invariants to the output set.
//!
//! Rounds are sequential; atoms within a round are independent.

use hashbrown::HashSet;
use smallvec::SmallVec;
use tracing::trace;

use crate::config::Execution;
use crate::graph::{Adjacency, MolecularGraph};
use crate::hash::TupleHasher;
use crate::model::BondOrder;

/// Round-1 invariants, by dense atom index.
pub fn initial_invariants<A: Adjacency>(graph: &MolecularGraph, adj: &A) -> Vec<u64> {
    graph
        .properties()
        .iter()
        .enumerate()
        .map(|(atom, props)| {
            let mut orders: SmallVec<[BondOrder; 6]> = adj.neighbors(atom as u32).map(|(_, o)| o).collect();
            orders.sort_unstable_by(|a, b| b.cmp(a));

            let mut h = TupleHasher::new();
            h.write_all(props);
            for order in orders {
                h.write(order.value());
            }
            h.finish()
        })
        .collect()
}

/// One refinement round for a single atom.
fn refine_atom<A: Adjacency>(atom: u32, prev: &[u64], adj: &A) -> u64 {
    let mut pairs: SmallVec<[(u64, u64); 6]> = adj
        .neighbors(atom)
        .map(|(nb, order)| (order.value(), prev[nb as usize]))
        .collect();
    pairs.sort_unstable_by(|a, b| b.cmp(a));

    let mut h = TupleHasher::new();
    h.write(prev[atom as usize]);
    for (order, invariant) in pairs {
        h.write(order);
        h.write(invariant);
    }
    h.finish()
}

/// Next round's invariants from `prev`.
pub fn refine<A: Adjacency>(prev: &[u64], adj: &A, execution: Execution) -> Vec<u64> {
    match execution {
        #[cfg(feature = "parallel")]
        Execution::Parallel => {
            use rayon::prelude::*;
            (0..prev.len() as u32)
                .into_par_iter()
                .map(|atom| refine_atom(atom, prev, adj))
                .collect()
        }
        _ => (0..prev.len() as u32).map(|atom| refine_atom(atom, prev, adj)).collect(),
    }
}

/// Union of invariants from rounds `min_radius..=max_radius`.
pub fn morgan_hashes<A: Adjacency>(
    graph: &MolecularGraph,
    adj: &A,
    min_radius: usize,
    max_radius: usize,
    execution: Execution,
) -> HashSet<u64> {
    let mut invariants = initial_invariants(graph, adj);
    let mut out = HashSet::new();
    if min_radius <= 1 {
        out.extend(invariants.iter().copied());
    }

    for step in 2..=max_radius {
        invariants = refine(&invariants, adj, execution);
        if step >= min_radius {
            out.extend(invariants.iter().copied());
        }
        trace!(step, distinct = out.len(), "morgan round");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::tuple_hash;
    use crate::model::LabeledGraph;

    // 1 - 2 = 3
    fn graph() -> MolecularGraph {
        let g = LabeledGraph::from_labels([6, 6, 8])
            .with_bond(1, 2, BondOrder::SINGLE)
            .with_bond(2, 3, BondOrder::DOUBLE);
        MolecularGraph::build(&g, false).unwrap()
    }

    #[test]
    fn test_initial_invariant_appends_sorted_orders() {
        let g = graph();
        let inv = initial_invariants(&g, &g.neighbor_table());
        assert_eq!(inv[0], tuple_hash(&[6, 1]));
        assert_eq!(inv[1], tuple_hash(&[6, 2, 1]));
        assert_eq!(inv[2], tuple_hash(&[8, 2]));
    }

    #[test]
    fn test_refined_invariant_layout() {
        let g = graph();
        let adj = g.neighbor_table();
        let inv = initial_invariants(&g, &adj);
        let next = refine(&inv, &adj, Execution::Sequential);
        assert_eq!(next[1], tuple_hash(&[inv[1], 2, inv[2], 1, inv[0]]));
        assert_eq!(next[0], tuple_hash(&[inv[0], 1, inv[1]]));
    }

    #[test]
    fn test_radius_one_is_seed_only() {
        let g = graph();
        let adj = g.dense();
        let seeds: HashSet<u64> = initial_invariants(&g, &adj).into_iter().collect();
        assert_eq!(morgan_hashes(&g, &adj, 1, 1, Execution::Sequential), seeds);
    }

    #[test]
    fn test_min_radius_skips_early_rounds() {
        let g = graph();
        let adj = g.neighbor_table();
        let seeds: HashSet<u64> = initial_invariants(&g, &adj).into_iter().collect();
        let late = morgan_hashes(&g, &adj, 2, 2, Execution::Sequential);
        assert!(late.is_disjoint(&seeds));
        assert_eq!(late.len(), 3);
    }

    #[test]
    fn test_parallel_round_matches_sequential() {
        let g = graph();
        let adj = g.neighbor_table();
        let seq = morgan_hashes(&g, &adj, 1, 4, Execution::Sequential);
        let par = morgan_hashes(&g, &adj, 1, 4, Execution::Parallel);
        assert_eq!(seq, par);
    }

    #[test]
    fn test_symmetric_atoms_share_invariants() {
        let g = LabeledGraph::from_labels([6, 8, 6])
            .with_bond(1, 2, BondOrder::SINGLE)
            .with_bond(2, 3, BondOrder::SINGLE);
        let g = MolecularGraph::build(&g, false).unwrap();
        let adj = g.neighbor_table();
        let mut inv = initial_invariants(&g, &adj);
        for _ in 0..3 {
            inv = refine(&inv, &adj, Execution::Sequential);
            assert_eq!(inv[0], inv[2]);
        }
    }
}
