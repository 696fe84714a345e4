//! # structure-fingerprint: Molecular Graph Fingerprints
//!
//! Fixed-length binary fingerprints of molecules for use as ML features.
//! A molecule is an undirected labeled graph; bounded substructures are
//! enumerated, canonicalized, hashed and folded into a bit vector.
//!
//! ## Pipeline
//!
//! ```text
//! MoleculeGraph ─► graph (adjacency) ─┬─► enumerate ─► canon ─┐
//!                                     └─► morgan ─────────────┴─► hash ─► fold ─► Fingerprint
//! ```
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `MoleculeGraph` is the contract with whatever owns the molecule
//! 2. **Frozen hash**: `tuple_hash` output is persisted; it never changes
//! 3. **Arena buffers**: path state lives in a pre-sized `PathBuffer`, indexed by integers
//! 4. **Order-free output**: folding is a set union, discovery order never matters
//!
//! ## Quick Start
//!
//! ```rust
//! use structure_fingerprint::{Atom, BondOrder, FingerprintConfig, Fingerprinter, Molecule};
//!
//! # fn example() -> structure_fingerprint::Result<()> {
//! let ethanol = Molecule::new()
//!     .with_atom(1, Atom::new(6))
//!     .with_atom(2, Atom::new(6))
//!     .with_atom(3, Atom::new(8))
//!     .with_bond(1, 2, BondOrder::SINGLE)
//!     .with_bond(2, 3, BondOrder::SINGLE);
//!
//! let fp = Fingerprinter::new(FingerprintConfig::linear())?;
//! let bits = fp.fingerprint(&ethanol)?;
//! assert_eq!(bits.len(), 1024);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Modes
//!
//! | Mode | Substructure | Repeat counts |
//! |------|--------------|---------------|
//! | `Linear` | simple paths of `min_radius..=max_radius` atoms | up to `number_bit_pairs` |
//! | `Morgan` | atom neighborhoods refined `max_radius − 1` times | not encoded |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod config;
pub mod hash;
pub mod graph;
pub mod enumerate;
pub mod canon;
pub mod fold;
pub mod morgan;

use tracing::{debug, warn};

// ============================================================================
// Re-exports
// ============================================================================

pub use model::{
    Atom, AtomId, AtomProperties, Bond, BondOrder,
    Fingerprint, LabeledGraph, Molecule, MoleculeGraph,
};
pub use config::{AdjacencyLayout, Execution, FingerprintConfig, FingerprintMode};
pub use hash::{tuple_hash, TupleHasher};
pub use graph::{Adjacency, DenseAdjacency, MolecularGraph, NeighborTable};
pub use enumerate::PathBuffer;
pub use canon::{FragmentKey, FragmentTable};
pub use fold::Folder;

// ============================================================================
// Fingerprinter
// ============================================================================

/// The primary entry point. Holds a validated configuration and turns
/// molecules into fingerprints.
#[derive(Debug, Clone)]
pub struct Fingerprinter {
    config: FingerprintConfig,
    folder: Folder,
}

impl Fingerprinter {
    /// Validate `config` and build a fingerprinter.
    pub fn new(config: FingerprintConfig) -> Result<Self> {
        config.validate()?;
        let folder = Folder::new(config.length, config.number_active_bits);
        Ok(Self { config, folder })
    }

    pub fn config(&self) -> &FingerprintConfig {
        &self.config
    }

    /// Linear-mode fragment count table, whatever the configured mode.
    pub fn fragments<M: MoleculeGraph + ?Sized>(&self, molecule: &M) -> Result<FragmentTable> {
        let graph = MolecularGraph::build(molecule, self.config.include_hydrogens)?;
        match self.config.adjacency {
            AdjacencyLayout::NeighborTable => self.fragment_table(&graph, &graph.neighbor_table()),
            AdjacencyLayout::Dense => self.fragment_table(&graph, &graph.dense()),
        }
    }

    /// Distinct hashes fed to folding, sorted ascending.
    pub fn hashes<M: MoleculeGraph + ?Sized>(&self, molecule: &M) -> Result<Vec<u64>> {
        // Phase 1: Adapt
        let graph = MolecularGraph::build(molecule, self.config.include_hydrogens)?;
        debug!(atoms = graph.atom_count(), bonds = graph.bond_count(), "graph built");

        // Phase 2: Enumerate + hash
        let set = match self.config.adjacency {
            AdjacencyLayout::NeighborTable => self.hash_set(&graph, &graph.neighbor_table())?,
            AdjacencyLayout::Dense => self.hash_set(&graph, &graph.dense())?,
        };

        let mut hashes: Vec<u64> = set.into_iter().collect();
        hashes.sort_unstable();
        Ok(hashes)
    }

    /// Active bit indices, sorted ascending.
    pub fn active_bits<M: MoleculeGraph + ?Sized>(&self, molecule: &M) -> Result<Vec<usize>> {
        Ok(self.fingerprint(molecule)?.active_bits())
    }

    /// Fingerprint of one molecule.
    pub fn fingerprint<M: MoleculeGraph + ?Sized>(&self, molecule: &M) -> Result<Fingerprint> {
        let hashes = self.hashes(molecule)?;

        // Phase 3: Fold
        let fp = self.folder.fold(hashes);
        debug!(length = fp.len(), active = fp.count_ones(), "fingerprint folded");
        Ok(fp)
    }

    /// Fingerprints in input order, or the error of the first failing
    /// molecule. Sequential execution stops there; parallel execution
    /// finishes the batch before reporting.
    pub fn transform<M: MoleculeGraph + Sync>(&self, molecules: &[M]) -> Result<Vec<Fingerprint>> {
        match self.config.execution {
            Execution::Sequential => molecules
                .iter()
                .enumerate()
                .map(|(index, molecule)| self.batch_item(index, molecule))
                .collect(),
            Execution::Parallel => self.run_batch(molecules).into_iter().collect(),
        }
    }

    /// Per-molecule results in input order. Failures carry their index and
    /// do not stop the batch.
    pub fn transform_each<M: MoleculeGraph + Sync>(&self, molecules: &[M]) -> Vec<Result<Fingerprint>> {
        let results = self.run_batch(molecules);
        for result in &results {
            if let Err(Error::Molecule { index, source }) = result {
                warn!(index, error = %source, "molecule failed");
            }
        }
        results
    }

    /// `molecules.len() × length` matrix of `0`/`1` bytes.
    pub fn transform_dense<M: MoleculeGraph + Sync>(&self, molecules: &[M]) -> Result<Vec<Vec<u8>>> {
        Ok(self.transform(molecules)?.iter().map(Fingerprint::to_dense).collect())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn run_batch<M: MoleculeGraph + Sync>(&self, molecules: &[M]) -> Vec<Result<Fingerprint>> {
        debug!(molecules = molecules.len(), mode = ?self.config.mode, "batch started");
        let one = |(index, molecule): (usize, &M)| self.batch_item(index, molecule);
        match self.config.execution {
            #[cfg(feature = "parallel")]
            Execution::Parallel => {
                use rayon::prelude::*;
                molecules.par_iter().enumerate().map(one).collect()
            }
            _ => molecules.iter().enumerate().map(one).collect(),
        }
    }

    fn batch_item<M: MoleculeGraph + ?Sized>(&self, index: usize, molecule: &M) -> Result<Fingerprint> {
        self.fingerprint(molecule).map_err(|source| Error::Molecule {
            index,
            source: Box::new(source),
        })
    }

    fn hash_set<A: Adjacency>(&self, graph: &MolecularGraph, adj: &A) -> Result<hashbrown::HashSet<u64>> {
        match self.config.mode {
            FingerprintMode::Linear => {
                let table = self.fragment_table(graph, adj)?;
                debug!(keys = table.len(), fragments = table.total(), "fragments canonicalized");
                Ok(table.hashes(self.config.number_bit_pairs))
            }
            FingerprintMode::Morgan => Ok(morgan::morgan_hashes(
                graph,
                adj,
                self.config.min_radius,
                self.config.max_radius,
                self.config.execution,
            )),
        }
    }

    fn fragment_table<A: Adjacency>(&self, graph: &MolecularGraph, adj: &A) -> Result<FragmentTable> {
        let buffer = PathBuffer::enumerate(adj, self.config.max_radius, self.config.execution)?;
        Ok(buffer
            .fragments(self.config.min_radius, self.config.max_radius)
            .map(|path| canon::canonical_key(path, graph.labels(), adj))
            .collect())
    }
}

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Bond {}-{} references unknown atom {atom}", .bond.0, .bond.1)]
    UnknownAtom { atom: AtomId, bond: (AtomId, AtomId) },

    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    #[error("Molecule {index}: {source}")]
    Molecule {
        index: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("Capacity error: {0}")]
    Capacity(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Index of the failing molecule in a batch, if any.
    pub fn molecule_index(&self) -> Option<usize> {
        match self {
            Error::Molecule { index, .. } => Some(*index),
            _ => None,
        }
    }

    /// True for errors caused by the molecule itself rather than the run.
    pub fn is_graph_error(&self) -> bool {
        match self {
            Error::UnknownAtom { .. } | Error::InvalidGraph(_) => true,
            Error::Molecule { source, .. } => source.is_graph_error(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
