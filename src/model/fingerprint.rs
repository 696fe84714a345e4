//! Fixed-length bit vector produced per molecule.

use serde::{Deserialize, Serialize};

/// A fingerprint of `len()` bits, packed into 64-bit words.
///
/// The length is fixed at construction and every molecule fingerprinted
/// with the same configuration gets the same length, whatever its size.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint {
    length: usize,
    words: Vec<u64>,
}

impl Fingerprint {
    /// All-zero fingerprint of `length` bits.
    pub fn zero(length: usize) -> Self {
        Self { length, words: vec![0u64; length.div_ceil(64)] }
    }

    /// Build from active bit indices. Indices `>= length` are ignored.
    pub fn from_active_bits(length: usize, bits: impl IntoIterator<Item = usize>) -> Self {
        let mut fp = Self::zero(length);
        for bit in bits {
            if bit < length {
                fp.set(bit);
            }
        }
        fp
    }

    /// Number of bits.
    #[inline]
    pub fn len(&self) -> usize {
        self.length
    }

    /// True for a zero-length fingerprint.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// True if no bit is set.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    #[inline]
    pub(crate) fn set(&mut self, bit: usize) {
        self.words[bit / 64] |= 1u64 << (bit % 64);
    }

    #[inline]
    pub fn get(&self, bit: usize) -> bool {
        bit < self.length && (self.words[bit / 64] >> (bit % 64)) & 1 == 1
    }

    /// Population count.
    #[inline]
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// Set bit indices in ascending order.
    pub fn active_bits(&self) -> Vec<usize> {
        let mut bits = Vec::with_capacity(self.count_ones() as usize);
        for (i, &word) in self.words.iter().enumerate() {
            let mut w = word;
            while w != 0 {
                let tz = w.trailing_zeros() as usize;
                bits.push(i * 64 + tz);
                w &= w - 1;
            }
        }
        bits
    }

    /// One `0`/`1` byte per bit, as a feature-matrix row.
    pub fn to_dense(&self) -> Vec<u8> {
        (0..self.length).map(|i| self.get(i) as u8).collect()
    }

    /// Packed words, least significant bit first.
    pub fn words(&self) -> &[u64] {
        &self.words
    }

    /// True if every bit set in `self` is also set in `other`.
    pub fn is_subset_of(&self, other: &Fingerprint) -> bool {
        self.length == other.length
            && self.words.iter().zip(&other.words).all(|(a, b)| a & !b == 0)
    }
}

impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Fingerprint(len={}, pop={})", self.length, self.count_ones())
    }
}
