//! # Molecule Model
//!
//! Plain data that crosses the boundary between callers and the
//! fingerprinting core: atoms, bonds, the `MoleculeGraph` contract and the
//! output `Fingerprint`.
//!
//! Design rule: no adjacency, no buffers, no hashing state here.
//! This module is pure data with no I/O.

pub mod atom;
pub mod molecule;
pub mod fingerprint;

pub use atom::{Atom, AtomId, AtomProperties, Bond, BondOrder};
pub use molecule::{LabeledGraph, Molecule, MoleculeGraph};
pub use fingerprint::Fingerprint;
