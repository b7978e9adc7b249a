//! Memory address decomposition.
//!
//! This module splits a 64-bit memory address into the three fields a
//! set-associative cache looks at. It provides the following:
//! 1. **Strong Typing:** `Address` wraps the raw trace value so it cannot be confused with a tag or index.
//! 2. **Field Extraction:** Tag, set index and block offset for a given geometry.
//! 3. **Edge Geometries:** Zero set bits or zero block bits decompose without shift overflow.

use std::fmt;

use crate::config::Geometry;

/// A byte address as it appears in a memory trace.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address(pub u64);

/// An address split into cache fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedAddr {
    /// High-order bits above the set index.
    pub tag: u64,
    /// Which set the block maps to; always `< 2^s`.
    pub set_index: usize,
    /// Low-order bits within the block. Not used by hit/miss logic.
    pub offset: u64,
}

/// Returns a mask with the low `bits` bits set. `bits` may be 0..=64.
#[inline(always)]
const fn low_mask(bits: u32) -> u64 {
    if bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << bits) - 1
    }
}

/// Logical right shift that yields 0 instead of overflowing when `amount == 64`.
#[inline(always)]
const fn shr(value: u64, amount: u32) -> u64 {
    if amount >= u64::BITS {
        0
    } else {
        value >> amount
    }
}

impl Address {
    /// Creates a new address from a raw 64-bit value.
    #[inline(always)]
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    /// Returns the raw 64-bit address value.
    #[inline(always)]
    pub const fn val(self) -> u64 {
        self.0
    }

    /// Extracts the tag: everything above the set-index and block-offset bits.
    #[inline]
    pub const fn tag(self, geometry: &Geometry) -> u64 {
        shr(self.0, geometry.set_bits + geometry.block_bits)
    }

    /// Extracts the `s` bits immediately above the block offset.
    #[inline]
    pub const fn set_index(self, geometry: &Geometry) -> usize {
        (shr(self.0, geometry.block_bits) & low_mask(geometry.set_bits)) as usize
    }

    /// Extracts the low `b` bits.
    #[inline]
    pub const fn offset(self, geometry: &Geometry) -> u64 {
        self.0 & low_mask(geometry.block_bits)
    }

    /// Splits the address into tag, set index and block offset.
    ///
    /// # Arguments
    ///
    /// * `geometry` - The cache geometry supplying `s` and `b`.
    ///
    /// # Returns
    ///
    /// The decomposed fields. `set_index` is always below `geometry.num_sets()`.
    #[inline]
    pub const fn decode(self, geometry: &Geometry) -> DecodedAddr {
        DecodedAddr {
            tag: self.tag(geometry),
            set_index: self.set_index(geometry),
            offset: self.offset(geometry),
        }
    }
}

impl From<u64> for Address {
    fn from(addr: u64) -> Self {
        Self(addr)
    }
}

impl fmt::LowerHex for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}
