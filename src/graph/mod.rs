//! # Graph Adapter
//!
//! Turns a [`MoleculeGraph`] collaborator into validated, index-based
//! data the enumerator and the Morgan loop can work on.
//!
//! Atom ids are sorted ascending and remapped to dense indices `0..n`;
//! every internal buffer is addressed by index, never by id.
//!
//! | Shape | Type | Memory |
//! |-------|------|--------|
//! | Padded neighbor rows | [`NeighborTable`] | `n × max_degree` |
//! | Bond-order matrix | [`DenseAdjacency`] | `n × n` |

pub mod adjacency;

use hashbrown::{HashMap, HashSet};

use crate::model::{AtomId, AtomProperties, BondOrder, MoleculeGraph};
use crate::{Error, Result};

pub use adjacency::{Adjacency, DenseAdjacency, NeighborTable, NO_NEIGHBOR};

/// One molecule, validated and remapped to dense indices.
#[derive(Debug, Clone)]
pub struct MolecularGraph {
    ids: Vec<AtomId>,
    labels: Vec<u64>,
    properties: Vec<AtomProperties>,
    bonds: Vec<(u32, u32, BondOrder)>,
}

impl MolecularGraph {
    /// Validate `molecule` and build its index form.
    ///
    /// Fails on atom id 0, duplicate atom ids, bonds to unknown atoms,
    /// self-loops, repeated atom pairs and zero bond orders.
    pub fn build<M: MoleculeGraph + ?Sized>(molecule: &M, include_hydrogens: bool) -> Result<Self> {
        let mut atoms = molecule.atom_labels(include_hydrogens);
        atoms.sort_unstable_by_key(|(id, _)| *id);

        let mut index: HashMap<AtomId, u32> = HashMap::with_capacity(atoms.len());
        for (i, (id, _)) in atoms.iter().enumerate() {
            if id.0 == 0 {
                return Err(Error::InvalidGraph("atom id 0 is not allowed".into()));
            }
            if index.insert(*id, i as u32).is_some() {
                return Err(Error::InvalidGraph(format!("duplicate atom id {id}")));
            }
        }

        let mut bonds = Vec::new();
        let mut seen: HashSet<(u32, u32)> = HashSet::new();
        for bond in molecule.bonds() {
            let lookup = |atom: AtomId| {
                index.get(&atom).copied().ok_or(Error::UnknownAtom {
                    atom,
                    bond: (bond.a, bond.b),
                })
            };
            let (a, b) = (lookup(bond.a)?, lookup(bond.b)?);
            if a == b {
                return Err(Error::InvalidGraph(format!("self-loop on atom {}", bond.a)));
            }
            if bond.order.0 == 0 {
                return Err(Error::InvalidGraph(format!(
                    "bond {}-{} has order 0",
                    bond.a, bond.b
                )));
            }
            if !seen.insert((a.min(b), a.max(b))) {
                return Err(Error::InvalidGraph(format!(
                    "duplicate bond between atoms {} and {}",
                    bond.a, bond.b
                )));
            }
            bonds.push((a, b, bond.order));
        }

        let mut properties = vec![AtomProperties::new(); atoms.len()];
        for (id, props) in molecule.atom_properties(include_hydrogens) {
            let i = index.get(&id).copied().ok_or_else(|| {
                Error::InvalidGraph(format!("properties reported for unknown atom {id}"))
            })?;
            properties[i as usize] = props;
        }

        let (ids, labels) = atoms.into_iter().unzip();
        Ok(Self { ids, labels, properties, bonds })
    }

    pub fn atom_count(&self) -> usize {
        self.ids.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Original id of dense index `atom`.
    pub fn atom_id(&self, atom: u32) -> AtomId {
        self.ids[atom as usize]
    }

    /// Labels by dense index.
    pub fn labels(&self) -> &[u64] {
        &self.labels
    }

    /// Morgan seed properties by dense index.
    pub fn properties(&self) -> &[AtomProperties] {
        &self.properties
    }

    pub fn dense(&self) -> DenseAdjacency {
        DenseAdjacency::from_bonds(self.ids.len(), &self.bonds)
    }

    pub fn neighbor_table(&self) -> NeighborTable {
        NeighborTable::from_bonds(self.ids.len(), &self.bonds)
    }
}
