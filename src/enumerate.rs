//! # Fragment Enumerator
//!
//! Breadth-first enumeration of simple paths into a pre-sized arena.
//!
//! Every starting atom owns an equally sized region of the buffer, large
//! enough for every path it can root:
//!
//! ```text
//! rows_per_root = Σ_{L=1..R} bound(L)
//! bound(1) = 1,  bound(2) = D,  bound(L) = D·(D−1)^(L−2)
//! ```
//!
//! with `D` the maximum degree and `R` the maximum radius. After the root's
//! first hop the incoming atom can never be revisited, so each tip offers at
//! most `D − 1` extensions. Regions never overlap, which lets the parallel
//! strategy hand one region to each worker with no synchronization.
//!
//! Unused rows keep length `0` and are skipped by [`PathBuffer::fragments`].

use tracing::trace;

use crate::config::Execution;
use crate::graph::{Adjacency, NO_NEIGHBOR};
use crate::{Error, Result};

/// Upper bound on the number of simple paths of `1..=max_radius` atoms
/// rooted at one atom of a graph with maximum degree `max_degree`.
///
/// `None` if the bound does not fit in `usize`.
pub fn rows_per_root(max_degree: usize, max_radius: usize) -> Option<usize> {
    let mut total: usize = 0;
    let mut level: usize = 1;
    for length in 1..=max_radius {
        level = match length {
            1 => 1,
            2 => max_degree,
            _ => level.checked_mul(max_degree.saturating_sub(1))?,
        };
        total = total.checked_add(level)?;
        if level == 0 {
            break;
        }
    }
    Some(total)
}

// ============================================================================
// PathBuffer
// ============================================================================

/// Arena of paths: `rows` fixed-stride slots of `stride` atom indices.
#[derive(Debug, Clone)]
pub struct PathBuffer {
    stride: usize,
    rows_per_root: usize,
    atoms: Vec<u32>,
    /// Path length per row; `0` marks an empty slot.
    lengths: Vec<u32>,
}

impl PathBuffer {
    /// Enumerate every simple path of `1..=max_radius` atoms from every atom.
    ///
    /// The buffer size grows as `n·D^R`; bounding `max_radius` on densely
    /// connected graphs is the caller's job. A size that cannot be
    /// represented fails with [`Error::Capacity`] instead of truncating.
    pub fn enumerate<A: Adjacency>(adj: &A, max_radius: usize, execution: Execution) -> Result<Self> {
        let n = adj.atom_count();
        let stride = max_radius.max(1);
        let per_root = rows_per_root(adj.max_degree(), stride).ok_or_else(|| {
            Error::Capacity(format!(
                "path bound overflows for max_degree {} and max_radius {}",
                adj.max_degree(),
                stride
            ))
        })?;
        let rows = per_root.checked_mul(n).ok_or_else(|| {
            Error::Capacity(format!("{n} roots × {per_root} paths overflows"))
        })?;
        let cells = rows.checked_mul(stride).ok_or_else(|| {
            Error::Capacity(format!("{rows} paths × {stride} atoms overflows"))
        })?;
        trace!(atoms = n, per_root, rows, "path buffer sized");

        let mut buffer = Self {
            stride,
            rows_per_root: per_root,
            atoms: vec![NO_NEIGHBOR; cells],
            lengths: vec![0; rows],
        };
        if n == 0 {
            return Ok(buffer);
        }

        match execution {
            Execution::Sequential => buffer.fill_sequential(adj),
            Execution::Parallel => buffer.fill_parallel(adj),
        }
        Ok(buffer)
    }

    fn fill_sequential<A: Adjacency>(&mut self, adj: &A) {
        let (stride, per_root) = (self.stride, self.rows_per_root);
        for (root, (atoms, lengths)) in self
            .atoms
            .chunks_mut(per_root * stride)
            .zip(self.lengths.chunks_mut(per_root))
            .enumerate()
        {
            fill_root(adj, root as u32, atoms, lengths, stride);
        }
    }

    #[cfg(feature = "parallel")]
    fn fill_parallel<A: Adjacency>(&mut self, adj: &A) {
        use rayon::prelude::*;

        let (stride, per_root) = (self.stride, self.rows_per_root);
        self.atoms
            .par_chunks_mut(per_root * stride)
            .zip(self.lengths.par_chunks_mut(per_root))
            .enumerate()
            .for_each(|(root, (atoms, lengths))| {
                fill_root(adj, root as u32, atoms, lengths, stride);
            });
    }

    #[cfg(not(feature = "parallel"))]
    fn fill_parallel<A: Adjacency>(&mut self, adj: &A) {
        self.fill_sequential(adj);
    }

    /// Total slots, used or not.
    pub fn capacity(&self) -> usize {
        self.lengths.len()
    }

    /// Slots holding a path.
    pub fn used(&self) -> usize {
        self.lengths.iter().filter(|&&l| l != 0).count()
    }

    /// Every stored path, both orientations, in buffer order.
    pub fn paths(&self) -> impl Iterator<Item = &[u32]> + '_ {
        self.lengths
            .iter()
            .enumerate()
            .filter(|(_, len)| **len != 0)
            .map(move |(row, len)| {
                let start = row * self.stride;
                &self.atoms[start..start + *len as usize]
            })
    }

    /// Undirected fragments of `min_radius..=max_radius` atoms, each once.
    ///
    /// A path of two or more atoms is found from both ends; only the
    /// orientation starting at the larger index is kept.
    pub fn fragments(&self, min_radius: usize, max_radius: usize) -> impl Iterator<Item = &[u32]> + '_ {
        self.paths().filter(move |p| {
            (min_radius..=max_radius).contains(&p.len())
                && (p.len() == 1 || p[0] > p[p.len() - 1])
        })
    }
}

/// BFS from `root` into its own region. `atoms` holds `lengths.len()` rows.
fn fill_root<A: Adjacency>(adj: &A, root: u32, atoms: &mut [u32], lengths: &mut [u32], stride: usize) {
    atoms[0] = root;
    lengths[0] = 1;
    let mut next = 1;
    let (mut start, mut end) = (0, 1);

    for _ in 1..stride {
        for row in start..end {
            let len = lengths[row] as usize;
            let base = row * stride;
            let tip = atoms[base + len - 1];

            for (nb, _) in adj.neighbors(tip) {
                if atoms[base..base + len].contains(&nb) {
                    continue;
                }
                debug_assert!(next < lengths.len(), "path bound exceeded");
                let dst = next * stride;
                atoms.copy_within(base..base + len, dst);
                atoms[dst + len] = nb;
                lengths[next] = len as u32 + 1;
                next += 1;
            }
        }
        if next == end {
            break;
        }
        start = end;
        end = next;
    }
}
