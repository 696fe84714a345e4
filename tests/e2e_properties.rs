//! Property tests over randomly generated small molecules.

use std::collections::{BTreeMap, VecDeque};

use proptest::collection::vec;
use proptest::prelude::*;

use structure_fingerprint::canon::{canonicalize, FragmentKey};
use structure_fingerprint::{
    AdjacencyLayout, BondOrder, Execution, FingerprintConfig, FingerprintMode, Fingerprinter,
    LabeledGraph,
};

// ============================================================================
// Strategies
// ============================================================================

/// Up to 7 atoms with small labels of either sign and up to 10 bonds
/// (self-loops and repeated pairs dropped).
fn small_graph() -> impl Strategy<Value = LabeledGraph> {
    (1u32..8).prop_flat_map(|n| {
        (
            vec(prop_oneof![0u64..4, (u64::MAX - 3)..=u64::MAX], n as usize),
            vec((1..=n, 1..=n, 1u8..4), 0..10),
        )
            .prop_map(|(labels, edges)| {
                let mut g = LabeledGraph::from_labels(labels);
                let mut seen = std::collections::HashSet::new();
                for (a, b, order) in edges {
                    if a != b && seen.insert((a.min(b), a.max(b))) {
                        g = g.with_bond(a, b, BondOrder(order));
                    }
                }
                g
            })
    })
}

fn config(mode: FingerprintMode, min_radius: usize, max_radius: usize) -> FingerprintConfig {
    FingerprintConfig { mode, ..FingerprintConfig::default() }
        .with_radius(min_radius, max_radius)
        .with_length(256)
}

/// Count simple paths per canonical key with a plain queue of owned paths.
fn reference_counts(g: &LabeledGraph, min_radius: usize, max_radius: usize) -> BTreeMap<Vec<u64>, usize> {
    let label = |id: u32| g.atoms.iter().find(|(a, _)| a.0 == id).map(|(_, l)| *l).unwrap();
    let order = |a: u32, b: u32| {
        g.bonds
            .iter()
            .find(|bd| (bd.a.0, bd.b.0) == (a, b) || (bd.a.0, bd.b.0) == (b, a))
            .map(|bd| bd.order.value())
    };

    let mut counts = BTreeMap::new();
    for &(start, _) in &g.atoms {
        let mut queue = VecDeque::from([vec![start.0]]);
        while let Some(path) = queue.pop_front() {
            if path.len() >= min_radius && (path.len() == 1 || path[0] > path[path.len() - 1]) {
                let mut key = vec![label(path[0])];
                for w in path.windows(2) {
                    key.push(order(w[0], w[1]).unwrap());
                    key.push(label(w[1]));
                }
                let rev: Vec<u64> = key.iter().rev().copied().collect();
                let signed = |k: &Vec<u64>| k.iter().map(|&e| e as i64).collect::<Vec<_>>();
                let canonical = if signed(&key) > signed(&rev) { key } else { rev };
                *counts.entry(canonical).or_insert(0) += 1;
            }
            if path.len() < max_radius {
                let tip = *path.last().unwrap();
                for nb in g.atoms.iter().map(|(a, _)| a.0) {
                    if order(tip, nb).is_some() && !path.contains(&nb) {
                        let mut next = path.clone();
                        next.push(nb);
                        queue.push_back(next);
                    }
                }
            }
        }
    }
    counts
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_deterministic(g in small_graph(), morgan in any::<bool>()) {
        let mode = if morgan { FingerprintMode::Morgan } else { FingerprintMode::Linear };
        let fp = Fingerprinter::new(config(mode, 1, 4)).unwrap();
        prop_assert_eq!(fp.fingerprint(&g).unwrap(), fp.fingerprint(&g).unwrap());
    }

    #[test]
    fn prop_canonical_key_symmetric(key in vec(any::<u64>(), 0..12)) {
        let fwd: FragmentKey = key.iter().copied().collect();
        let rev: FragmentKey = key.iter().rev().copied().collect();
        prop_assert_eq!(canonicalize(fwd), canonicalize(rev));
    }

    #[test]
    fn prop_enumeration_matches_reference(g in small_graph(), min in 1usize..4, extra in 0usize..3) {
        let max = min + extra;
        let fp = Fingerprinter::new(config(FingerprintMode::Linear, min, max)).unwrap();
        let table = fp.fragments(&g).unwrap();
        let got: BTreeMap<Vec<u64>, usize> = table.iter().map(|(k, c)| (k.to_vec(), c)).collect();
        prop_assert_eq!(got, reference_counts(&g, min, max));
    }

    #[test]
    fn prop_radius_growth_keeps_bits(g in small_graph(), min in 1usize..3, morgan in any::<bool>()) {
        let mode = if morgan { FingerprintMode::Morgan } else { FingerprintMode::Linear };
        let short = Fingerprinter::new(config(mode, min, min + 1)).unwrap().fingerprint(&g).unwrap();
        let long = Fingerprinter::new(config(mode, min, min + 2)).unwrap().fingerprint(&g).unwrap();
        prop_assert!(short.is_subset_of(&long));
    }

    #[test]
    fn prop_strategies_agree(g in small_graph(), morgan in any::<bool>()) {
        let mode = if morgan { FingerprintMode::Morgan } else { FingerprintMode::Linear };
        let base = config(mode, 1, 4);
        let reference = Fingerprinter::new(base.clone().with_execution(Execution::Sequential))
            .unwrap()
            .fingerprint(&g)
            .unwrap();
        let parallel_dense = Fingerprinter::new(
            base.with_execution(Execution::Parallel).with_adjacency(AdjacencyLayout::Dense),
        )
        .unwrap()
        .fingerprint(&g)
        .unwrap();
        prop_assert_eq!(reference, parallel_dense);
    }

    #[test]
    fn prop_length_invariant(g in small_graph(), log in 0u32..13, bits in 1usize..6) {
        let length = 1usize << log;
        let cfg = FingerprintConfig::default().with_length(length).with_active_bits(bits);
        let fp = Fingerprinter::new(cfg).unwrap().fingerprint(&g).unwrap();
        prop_assert_eq!(fp.len(), length);
        prop_assert!(fp.active_bits().iter().all(|&b| b < length));
    }

    #[test]
    fn prop_repeat_cap(copies in 1usize..12, pairs in 1usize..6) {
        // `copies` isolated identical atoms: one key seen `copies` times.
        let g = LabeledGraph::from_labels(std::iter::repeat(7).take(copies));
        let cfg = FingerprintConfig::default().with_radius(1, 1).with_bit_pairs(pairs);
        let hashes = Fingerprinter::new(cfg).unwrap().hashes(&g).unwrap();
        prop_assert_eq!(hashes.len(), copies.min(pairs));
    }
}
