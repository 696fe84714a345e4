//! # Hash Folding
//!
//! Maps 64-bit hashes onto a `length`-bit vector (`length = 2^log`):
//!
//! ```text
//! bit_0 = h & mask
//! bit_i = (h >> i·log) & mask     for i in 1..number_active_bits
//! ```
//!
//! Shifts are arithmetic on the signed view of `h`, so once the shifted
//! window runs past bit 63 the sign bit is replicated, as native signed
//! hashes behave.

use crate::model::Fingerprint;

/// Folding parameters for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Folder {
    length: usize,
    mask: u64,
    log: u32,
    number_active_bits: usize,
}

impl Folder {
    /// `length` must be a power of two and `number_active_bits >= 1`;
    /// both are checked by config validation.
    pub fn new(length: usize, number_active_bits: usize) -> Self {
        debug_assert!(length.is_power_of_two());
        Self {
            length,
            mask: length as u64 - 1,
            log: length.trailing_zeros(),
            number_active_bits: number_active_bits.max(1),
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Call `activate` with every bit index `hash` maps to.
    #[inline]
    pub fn bits_of(&self, hash: u64, mut activate: impl FnMut(usize)) {
        let mut h = hash as i64;
        activate((h as u64 & self.mask) as usize);
        for _ in 1..self.number_active_bits {
            h >>= self.log;
            activate((h as u64 & self.mask) as usize);
        }
    }

    /// Union of the bits of every hash.
    pub fn fold(&self, hashes: impl IntoIterator<Item = u64>) -> Fingerprint {
        let mut fp = Fingerprint::zero(self.length);
        for hash in hashes {
            self.bits_of(hash, |bit| fp.set(bit));
        }
        fp
    }
}
