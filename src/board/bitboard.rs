//! Bitboard implementation for line checks

use super::{Pos, TOTAL_CELLS};

/// Mask covering all nine cells
const FULL_MASK: u16 = (1 << TOTAL_CELLS) - 1;

/// Bitboard representation of one side's pieces.
/// Bit `i` is the cell with index `i` (row-major), bits 9..16 are always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Bitboard {
    bits: u16,
}

impl Bitboard {
    /// Create empty bitboard
    pub const fn new() -> Self {
        Self { bits: 0 }
    }

    /// Build from a raw mask (extra bits are dropped)
    pub const fn from_bits(bits: u16) -> Self {
        Self {
            bits: bits & FULL_MASK,
        }
    }

    #[inline]
    pub const fn bits(self) -> u16 {
        self.bits
    }

    /// Set a bit at position
    #[inline]
    pub fn set(&mut self, pos: Pos) {
        self.bits |= 1u16 << pos.to_index();
    }

    /// Clear a bit at position
    #[inline]
    pub fn clear(&mut self, pos: Pos) {
        self.bits &= !(1u16 << pos.to_index());
    }

    /// Check if bit is set at position
    #[inline]
    pub fn get(&self, pos: Pos) -> bool {
        (self.bits >> pos.to_index()) & 1 == 1
    }

    /// Count total set bits (popcount)
    #[inline]
    pub fn count(&self) -> u32 {
        self.bits.count_ones()
    }

    /// Check if empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    /// True when every bit of `mask` is set
    #[inline]
    pub fn contains_all(&self, mask: u16) -> bool {
        self.bits & mask == mask
    }

    /// Iterate over set bit positions
    pub fn iter_ones(&self) -> BitboardIter {
        BitboardIter { bits: self.bits }
    }
}

impl std::ops::BitOr for Bitboard {
    type Output = Bitboard;

    fn bitor(self, rhs: Bitboard) -> Bitboard {
        Bitboard::from_bits(self.bits | rhs.bits)
    }
}

/// Iterator over set bits in a Bitboard
pub struct BitboardIter {
    bits: u16,
}

impl Iterator for BitboardIter {
    type Item = Pos;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }

        let idx = self.bits.trailing_zeros() as usize;
        // Clear the bit we just found
        self.bits &= self.bits - 1;

        Some(Pos::from_index(idx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_clear() {
        let mut bb = Bitboard::new();
        let pos = Pos::new(1, 2);
        assert!(!bb.get(pos));
        bb.set(pos);
        assert!(bb.get(pos));
        assert_eq!(bb.count(), 1);
        bb.clear(pos);
        assert!(bb.is_empty());
    }

    #[test]
    fn test_iter_ones_order() {
        let mut bb = Bitboard::new();
        bb.set(Pos::new(2, 2));
        bb.set(Pos::new(0, 1));
        bb.set(Pos::new(1, 0));

        let cells: Vec<Pos> = bb.iter_ones().collect();
        assert_eq!(cells, vec![Pos::new(0, 1), Pos::new(1, 0), Pos::new(2, 2)]);
    }

    #[test]
    fn test_from_bits_masks_extra_bits() {
        let bb = Bitboard::from_bits(0xFFFF);
        assert_eq!(bb.count(), 9);
        assert!(bb.contains_all(0b111));
    }
}
