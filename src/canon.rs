//! # Fragment Canonicalization
//!
//! A fragment `p0 - p1 - … - pk` is keyed by interleaving atom labels and
//! bond orders along the path:
//!
//! ```text
//! label(p0), order(p0,p1), label(p1), …, order(pk-1,pk), label(pk)
//! ```
//!
//! The key is compared against its own reversal and the lexicographically
//! greater of the two is kept, so a fragment and its mirror image share one
//! entry. A palindromic key is its own reversal.
//!
//! Elements compare as signed 64-bit integers. Labels are native signed
//! hashes, and fingerprints from earlier runs depend on that direction.

use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

use crate::graph::Adjacency;
use crate::hash::TupleHasher;

/// Canonical interleaved key. Inline up to 8-atom fragments.
pub type FragmentKey = SmallVec<[u64; 15]>;

/// Canonical key of the path `path` (dense atom indices).
///
/// Consecutive atoms must be bonded in `adj`; `labels` is indexed by
/// dense atom index.
pub fn canonical_key<A: Adjacency>(path: &[u32], labels: &[u64], adj: &A) -> FragmentKey {
    let mut key = FragmentKey::with_capacity(path.len() * 2);
    let Some((&first, rest)) = path.split_first() else {
        return key;
    };
    key.push(labels[first as usize]);
    let mut prev = first;
    for &atom in rest {
        // Enumerated paths only step along bonds.
        let order = adj.bond_order(prev, atom).map(|o| o.value()).unwrap_or(0);
        key.push(order);
        key.push(labels[atom as usize]);
        prev = atom;
    }
    canonicalize(key)
}

/// Keep the greater of `key` and its reversal, comparing elements as `i64`.
pub fn canonicalize(mut key: FragmentKey) -> FragmentKey {
    let signed = |e: &u64| *e as i64;
    if key.iter().map(signed).lt(key.iter().rev().map(signed)) {
        key.reverse();
    }
    key
}

// ============================================================================
// FragmentTable
// ============================================================================

/// Canonical key → number of distinct fragments with that key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentTable {
    counts: HashMap<FragmentKey, usize>,
}

impl FragmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one occurrence of `key`.
    pub fn insert(&mut self, key: FragmentKey) {
        *self.counts.entry(key).or_default() += 1;
    }

    pub fn count(&self, key: &[u64]) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct canonical keys.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total fragments recorded.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FragmentKey, usize)> + '_ {
        self.counts.iter().map(|(k, c)| (k, *c))
    }

    /// Keys sorted ascending, for stable inspection.
    pub fn sorted_keys(&self) -> Vec<FragmentKey> {
        let mut keys: Vec<_> = self.counts.keys().cloned().collect();
        keys.sort_unstable();
        keys
    }

    /// Repeat-aware hashes: `hash(key ++ (r,))` for
    /// `r in 0..min(count, number_bit_pairs)`.
    pub fn hashes(&self, number_bit_pairs: usize) -> HashSet<u64> {
        let mut out = HashSet::with_capacity(self.counts.len());
        for (key, &count) in &self.counts {
            let mut prefix = TupleHasher::new();
            prefix.write_all(key);
            for repeat in 0..count.min(number_bit_pairs) {
                let mut h = prefix;
                h.write(repeat as u64);
                out.insert(h.finish());
            }
        }
        out
    }
}

impl FromIterator<FragmentKey> for FragmentTable {
    fn from_iter<I: IntoIterator<Item = FragmentKey>>(iter: I) -> Self {
        let mut table = Self::new();
        for key in iter {
            table.insert(key);
        }
        table
    }
}
