//! Adjacency shapes over dense atom indices.
//!
//! Both shapes answer every query identically and report neighbors in
//! ascending index order.

use crate::model::BondOrder;

/// Padding value in [`NeighborTable`] rows.
pub const NO_NEIGHBOR: u32 = u32::MAX;

/// Read-only neighbor queries, shared across worker threads.
pub trait Adjacency: Sync {
    fn atom_count(&self) -> usize;

    /// Largest number of bonds on any atom.
    fn max_degree(&self) -> usize;

    /// `(neighbor, order)` pairs of `atom`, ascending by neighbor.
    fn neighbors(&self, atom: u32) -> impl Iterator<Item = (u32, BondOrder)> + '_;

    fn bond_order(&self, a: u32, b: u32) -> Option<BondOrder>;

    fn degree(&self, atom: u32) -> usize {
        self.neighbors(atom).count()
    }
}

// ============================================================================
// DenseAdjacency
// ============================================================================

/// `n × n` bond-order matrix, `0` = no bond.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseAdjacency {
    n: usize,
    orders: Vec<u8>,
    max_degree: usize,
}

impl DenseAdjacency {
    /// `bonds` must be validated: in range, no self-loops, no duplicates.
    pub(crate) fn from_bonds(n: usize, bonds: &[(u32, u32, BondOrder)]) -> Self {
        let mut orders = vec![0u8; n * n];
        let mut degree = vec![0usize; n];
        for &(a, b, order) in bonds {
            let (a, b) = (a as usize, b as usize);
            orders[a * n + b] = order.0;
            orders[b * n + a] = order.0;
            degree[a] += 1;
            degree[b] += 1;
        }
        Self { n, orders, max_degree: degree.into_iter().max().unwrap_or(0) }
    }

    /// Row of bond orders for `atom`.
    pub fn row(&self, atom: u32) -> &[u8] {
        let start = atom as usize * self.n;
        &self.orders[start..start + self.n]
    }
}

impl Adjacency for DenseAdjacency {
    fn atom_count(&self) -> usize {
        self.n
    }

    fn max_degree(&self) -> usize {
        self.max_degree
    }

    fn neighbors(&self, atom: u32) -> impl Iterator<Item = (u32, BondOrder)> + '_ {
        self.row(atom)
            .iter()
            .enumerate()
            .filter(|(_, o)| **o != 0)
            .map(|(j, o)| (j as u32, BondOrder(*o)))
    }

    fn bond_order(&self, a: u32, b: u32) -> Option<BondOrder> {
        match self.orders[a as usize * self.n + b as usize] {
            0 => None,
            o => Some(BondOrder(o)),
        }
    }
}

// ============================================================================
// NeighborTable
// ============================================================================

/// Per-atom neighbor rows padded with [`NO_NEIGHBOR`] to a common width.
///
/// Fixed stride lets parallel workers index any atom's row directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborTable {
    n: usize,
    width: usize,
    neighbors: Vec<u32>,
    orders: Vec<u8>,
}

impl NeighborTable {
    /// `bonds` must be validated: in range, no self-loops, no duplicates.
    pub(crate) fn from_bonds(n: usize, bonds: &[(u32, u32, BondOrder)]) -> Self {
        let mut lists: Vec<Vec<(u32, u8)>> = vec![Vec::new(); n];
        for &(a, b, order) in bonds {
            lists[a as usize].push((b, order.0));
            lists[b as usize].push((a, order.0));
        }
        let width = lists.iter().map(Vec::len).max().unwrap_or(0);

        let mut neighbors = vec![NO_NEIGHBOR; n * width];
        let mut orders = vec![0u8; n * width];
        for (atom, list) in lists.iter_mut().enumerate() {
            list.sort_unstable();
            for (slot, &(nb, order)) in list.iter().enumerate() {
                neighbors[atom * width + slot] = nb;
                orders[atom * width + slot] = order;
            }
        }
        Self { n, width, neighbors, orders }
    }

    /// Row width (the maximum degree).
    pub fn width(&self) -> usize {
        self.width
    }

    /// Padded neighbor row of `atom`.
    pub fn row(&self, atom: u32) -> &[u32] {
        let start = atom as usize * self.width;
        &self.neighbors[start..start + self.width]
    }
}

impl Adjacency for NeighborTable {
    fn atom_count(&self) -> usize {
        self.n
    }

    fn max_degree(&self) -> usize {
        self.width
    }

    fn neighbors(&self, atom: u32) -> impl Iterator<Item = (u32, BondOrder)> + '_ {
        let start = atom as usize * self.width;
        self.neighbors[start..start + self.width]
            .iter()
            .zip(&self.orders[start..start + self.width])
            .take_while(|(nb, _)| **nb != NO_NEIGHBOR)
            .map(|(nb, o)| (*nb, BondOrder(*o)))
    }

    fn bond_order(&self, a: u32, b: u32) -> Option<BondOrder> {
        self.neighbors(a).find(|(nb, _)| *nb == b).map(|(_, o)| o)
    }
}
