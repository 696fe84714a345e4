//! Atom and bond primitives.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::hash::{signed_element, tuple_hash};

/// Atom identifier within one molecule. Positive; need not be contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AtomId(pub u32);

impl std::fmt::Display for AtomId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for AtomId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

/// Bond multiplicity / type code. Zero is reserved for "no bond".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BondOrder(pub u8);

impl BondOrder {
    pub const SINGLE: BondOrder = BondOrder(1);
    pub const DOUBLE: BondOrder = BondOrder(2);
    pub const TRIPLE: BondOrder = BondOrder(3);
    pub const AROMATIC: BondOrder = BondOrder(4);

    #[inline]
    pub fn value(self) -> u64 {
        self.0 as u64
    }
}

impl std::fmt::Display for BondOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An undirected bond. `(a, b)` and `(b, a)` describe the same bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bond {
    pub a: AtomId,
    pub b: AtomId,
    pub order: BondOrder,
}

impl Bond {
    pub fn new(a: u32, b: u32, order: BondOrder) -> Self {
        Self { a: AtomId(a), b: AtomId(b), order }
    }

    /// The other endpoint, if `from` is on this bond.
    pub fn other(&self, from: AtomId) -> Option<AtomId> {
        if from == self.a { Some(self.b) }
        else if from == self.b { Some(self.a) }
        else { None }
    }
}

/// Property tuple seeding an atom's Morgan invariant.
pub type AtomProperties = SmallVec<[u64; 8]>;

/// A chemical atom with the properties that make up its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atom {
    pub atomic_number: u8,
    /// Mass number, `None` for natural abundance.
    pub isotope: Option<u16>,
    pub charge: i8,
    pub is_radical: bool,
    pub hybridization: u8,
    pub implicit_hydrogens: u8,
}

impl Atom {
    pub fn new(atomic_number: u8) -> Self {
        Self {
            atomic_number,
            isotope: None,
            charge: 0,
            is_radical: false,
            hybridization: 1,
            implicit_hydrogens: 0,
        }
    }

    pub fn with_isotope(mut self, isotope: u16) -> Self {
        self.isotope = Some(isotope);
        self
    }

    pub fn with_charge(mut self, charge: i8) -> Self {
        self.charge = charge;
        self
    }

    pub fn with_radical(mut self, is_radical: bool) -> Self {
        self.is_radical = is_radical;
        self
    }

    pub fn with_hybridization(mut self, hybridization: u8) -> Self {
        self.hybridization = hybridization;
        self
    }

    pub fn with_hydrogens(mut self, implicit_hydrogens: u8) -> Self {
        self.implicit_hydrogens = implicit_hydrogens;
        self
    }

    /// Linear-mode label: `hash(isotope, atomic_number, charge, is_radical[, hydrogens])`.
    pub fn label(&self, include_hydrogens: bool) -> u64 {
        let mut tuple: SmallVec<[u64; 5]> = SmallVec::new();
        tuple.push(self.isotope.unwrap_or(0) as u64);
        tuple.push(self.atomic_number as u64);
        tuple.push(signed_element(self.charge as i64));
        tuple.push(self.is_radical as u64);
        if include_hydrogens {
            tuple.push(self.implicit_hydrogens as u64);
        }
        tuple_hash(&tuple)
    }

    /// Intrinsic properties for the Morgan seed:
    /// `(degree, hybridization, atomic_number, isotope, charge, hydrogens)`.
    /// `degree` comes from the owning molecule.
    pub fn properties(&self, degree: usize) -> AtomProperties {
        let mut props = AtomProperties::new();
        props.push(degree as u64);
        props.push(self.hybridization as u64);
        props.push(self.atomic_number as u64);
        props.push(self.isotope.unwrap_or(0) as u64);
        props.push(signed_element(self.charge as i64));
        props.push(self.implicit_hydrogens as u64);
        props
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_depends_on_hydrogen_flag() {
        let methane = Atom::new(6).with_hydrogens(4);
        let bare = Atom::new(6);
        assert_eq!(methane.label(false), bare.label(false));
        assert_ne!(methane.label(true), bare.label(true));
    }

    #[test]
    fn test_label_is_tuple_hash_of_properties() {
        let n = Atom::new(7).with_charge(1);
        assert_eq!(n.label(false), tuple_hash(&[0, 7, 1, 0]));
        let o = Atom::new(8).with_charge(-1);
        assert_eq!(o.label(false), tuple_hash(&[0, 8, u64::MAX, 0]));
    }

    #[test]
    fn test_properties_always_carry_hydrogens() {
        let props = Atom::new(8).with_hydrogens(2).with_charge(-1).properties(1);
        assert_eq!(props.as_slice(), &[1, 1, 8, 0, u64::MAX, 2]);
        assert_ne!(Atom::new(6).properties(2), Atom::new(6).with_hydrogens(1).properties(2));
    }

    #[test]
    fn test_isotope_changes_label() {
        assert_ne!(Atom::new(6).label(false), Atom::new(6).with_isotope(13).label(false));
    }

    #[test]
    fn test_bond_other_end() {
        let bond = Bond::new(1, 2, BondOrder::SINGLE);
        assert_eq!(bond.other(AtomId(1)), Some(AtomId(2)));
        assert_eq!(bond.other(AtomId(2)), Some(AtomId(1)));
        assert_eq!(bond.other(AtomId(3)), None);
    }
}
