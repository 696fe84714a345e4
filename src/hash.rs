//! # Tuple Hash
//!
//! Deterministic, order-sensitive 64-bit mixing hash over flat integer
//! tuples. Every fragment key, atom label and Morgan invariant goes
//! through this function, and fingerprints produced by earlier runs are
//! compared against new ones, so the output is a frozen binary format.
//!
//! ```text
//! acc = SEED
//! for e in tuple:  acc = rotl(acc + e·P2, 31) · P1
//! acc += len ^ LENGTH_SALT
//! acc == u64::MAX  →  OVERFLOW_SUBSTITUTE
//! ```
//!
//! For tuples of small non-negative integers this reproduces the CPython
//! tuple hash bit for bit: `tuple_hash(&[1, 2, 3]) as i64 == hash((1, 2, 3))`.

// ============================================================================
// Constants
// ============================================================================

const SEED: u64 = 0x27D4_EB2F_1656_67C5;
const PRIME_1: u64 = 0x9E37_79B1_85EB_CA87;
const PRIME_2: u64 = 0xC2B2_AE3D_27D4_EB4F;
const LENGTH_SALT: u64 = 2_870_177_450_013_471_926;

/// Returned in place of `u64::MAX`, which the native hash reserves as an
/// error marker.
pub const OVERFLOW_SUBSTITUTE: u64 = 1_546_275_796;

// ============================================================================
// TupleHasher
// ============================================================================

/// Streaming form of [`tuple_hash`].
///
/// Feeding elements one by one and calling [`finish`](Self::finish) gives
/// exactly the same value as hashing the collected slice. Used to append a
/// repeat index to a fragment key without copying the key.
#[derive(Debug, Clone, Copy)]
pub struct TupleHasher {
    acc: u64,
    len: u64,
}

impl TupleHasher {
    #[inline]
    pub fn new() -> Self {
        Self { acc: SEED, len: 0 }
    }

    /// Mix one tuple element.
    #[inline]
    pub fn write(&mut self, element: u64) {
        self.acc = self.acc.wrapping_add(element.wrapping_mul(PRIME_2));
        self.acc = self.acc.rotate_left(31);
        self.acc = self.acc.wrapping_mul(PRIME_1);
        self.len += 1;
    }

    #[inline]
    pub fn write_all(&mut self, elements: &[u64]) {
        for &e in elements {
            self.write(e);
        }
    }

    /// Number of elements mixed so far.
    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn finish(&self) -> u64 {
        let acc = self.acc.wrapping_add(self.len ^ LENGTH_SALT);
        if acc == u64::MAX { OVERFLOW_SUBSTITUTE } else { acc }
    }
}

impl Default for TupleHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// Hash a flat tuple of integers.
#[inline]
pub fn tuple_hash(elements: &[u64]) -> u64 {
    let mut hasher = TupleHasher::new();
    hasher.write_all(elements);
    hasher.finish()
}

/// Two's-complement embedding of a signed property (e.g. formal charge)
/// into a tuple element.
#[inline]
pub fn signed_element(value: i64) -> u64 {
    value as u64
}

// ============================================================================
// Tests
// ============================================================================
