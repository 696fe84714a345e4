//! The molecule collaborator contract and two ready-made implementations.

use serde::{Deserialize, Serialize};
use smallvec::smallvec;

use super::{Atom, AtomId, AtomProperties, Bond, BondOrder};

// ============================================================================
// MoleculeGraph trait
// ============================================================================

/// What the fingerprinting core needs from a molecule.
///
/// Implementations only report data; validation (unknown atoms, duplicate
/// bonds, ...) happens when the core builds its adjacency.
pub trait MoleculeGraph {
    /// Every atom with its linear-mode label.
    fn atom_labels(&self, include_hydrogens: bool) -> Vec<(AtomId, u64)>;

    /// Every bond, in any orientation.
    fn bonds(&self) -> Vec<Bond>;

    /// Intrinsic properties seeding the Morgan invariant of each atom.
    /// Bond orders are appended by the core and must not be included here.
    /// Implementations may ignore `include_hydrogens`; [`Molecule`] always
    /// reports the hydrogen count.
    ///
    /// Defaults to the single-element tuple `(label,)`.
    fn atom_properties(&self, include_hydrogens: bool) -> Vec<(AtomId, AtomProperties)> {
        self.atom_labels(include_hydrogens)
            .into_iter()
            .map(|(id, label)| (id, smallvec![label]))
            .collect()
    }
}

impl<M: MoleculeGraph + ?Sized> MoleculeGraph for &M {
    fn atom_labels(&self, include_hydrogens: bool) -> Vec<(AtomId, u64)> {
        (**self).atom_labels(include_hydrogens)
    }

    fn bonds(&self) -> Vec<Bond> {
        (**self).bonds()
    }

    fn atom_properties(&self, include_hydrogens: bool) -> Vec<(AtomId, AtomProperties)> {
        (**self).atom_properties(include_hydrogens)
    }
}

// ============================================================================
// Molecule
// ============================================================================

/// A chemical molecule: [`Atom`]s keyed by id plus bonds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Molecule {
    pub atoms: Vec<(AtomId, Atom)>,
    pub bonds: Vec<Bond>,
}

impl Molecule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_atom(mut self, id: u32, atom: Atom) -> Self {
        self.add_atom(id, atom);
        self
    }

    pub fn with_bond(mut self, a: u32, b: u32, order: BondOrder) -> Self {
        self.add_bond(a, b, order);
        self
    }

    pub fn add_atom(&mut self, id: u32, atom: Atom) {
        self.atoms.push((AtomId(id), atom));
    }

    pub fn add_bond(&mut self, a: u32, b: u32, order: BondOrder) {
        self.bonds.push(Bond::new(a, b, order));
    }

    /// Number of bonds touching `id`.
    pub fn degree(&self, id: AtomId) -> usize {
        self.bonds.iter().filter(|b| b.a == id || b.b == id).count()
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }
}

impl MoleculeGraph for Molecule {
    fn atom_labels(&self, include_hydrogens: bool) -> Vec<(AtomId, u64)> {
        self.atoms
            .iter()
            .map(|(id, atom)| (*id, atom.label(include_hydrogens)))
            .collect()
    }

    fn bonds(&self) -> Vec<Bond> {
        self.bonds.clone()
    }

    fn atom_properties(&self, _include_hydrogens: bool) -> Vec<(AtomId, AtomProperties)> {
        let mut degree: hashbrown::HashMap<AtomId, usize> = hashbrown::HashMap::new();
        for bond in &self.bonds {
            *degree.entry(bond.a).or_default() += 1;
            *degree.entry(bond.b).or_default() += 1;
        }
        self.atoms
            .iter()
            .map(|(id, atom)| {
                let d = degree.get(id).copied().unwrap_or(0);
                (*id, atom.properties(d))
            })
            .collect()
    }
}

// ============================================================================
// LabeledGraph
// ============================================================================

/// A graph whose atom labels are already opaque integers.
///
/// `include_hydrogens` has no effect: the label is taken as given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledGraph {
    pub atoms: Vec<(AtomId, u64)>,
    pub bonds: Vec<Bond>,
}

impl LabeledGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atoms numbered `1..=labels.len()` in order.
    pub fn from_labels(labels: impl IntoIterator<Item = u64>) -> Self {
        let atoms = labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| (AtomId(i as u32 + 1), label))
            .collect();
        Self { atoms, bonds: Vec::new() }
    }

    pub fn with_atom(mut self, id: u32, label: u64) -> Self {
        self.atoms.push((AtomId(id), label));
        self
    }

    pub fn with_bond(mut self, a: u32, b: u32, order: BondOrder) -> Self {
        self.bonds.push(Bond::new(a, b, order));
        self
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }
}

impl MoleculeGraph for LabeledGraph {
    fn atom_labels(&self, _include_hydrogens: bool) -> Vec<(AtomId, u64)> {
        self.atoms.clone()
    }

    fn bonds(&self) -> Vec<Bond> {
        self.bonds.clone()
    }
}
