// Fixed-size capability bitmaps (EVIOCGBIT / EVIOCGKEY layout)

use std::fmt;

use libc::c_ulong;

use super::{ABS_CNT, KEY_CNT};

const WORD_BITS: usize = c_ulong::BITS as usize;

pub const fn words_for(bits: usize) -> usize {
    bits.div_ceil(WORD_BITS)
}

fn mask(bit: u16) -> c_ulong {
    (1 as c_ulong) << (bit as usize % WORD_BITS)
}

/// Bitmap with the kernel's `unsigned long[]` ABI: bit `n` is bit `n % BITS_PER_LONG`
/// of word `n / BITS_PER_LONG`, words stored in native byte order. On little-endian
/// hosts this is the same as bit `n % 8` of byte `n / 8`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct BitSet<const WORDS: usize> {
    words: [c_ulong; WORDS],
}

pub type KeyBits = BitSet<{ words_for(KEY_CNT) }>;
pub type AbsBits = BitSet<{ words_for(ABS_CNT) }>;

impl<const WORDS: usize> Default for BitSet<WORDS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const WORDS: usize> BitSet<WORDS> {
    pub const BITS: usize = WORDS * WORD_BITS;

    pub const fn new() -> Self {
        Self { words: [0; WORDS] }
    }

    pub fn set(&mut self, bit: u16) {
        if let Some(word) = self.words.get_mut(bit as usize / WORD_BITS) {
            *word |= mask(bit);
        }
    }

    pub fn clear(&mut self, bit: u16) {
        if let Some(word) = self.words.get_mut(bit as usize / WORD_BITS) {
            *word &= !mask(bit);
        }
    }

    pub fn test(&self, bit: u16) -> bool {
        self.words
            .get(bit as usize / WORD_BITS)
            .is_some_and(|word| *word & mask(bit) != 0)
    }

    pub fn union_with(&mut self, other: &Self) {
        for (word, theirs) in self.words.iter_mut().zip(other.words.iter()) {
            *word |= theirs;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        (0..Self::BITS)
            .filter(move |bit| self.test(*bit as u16))
            .map(|bit| bit as u16)
    }

    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: the word array is plain integers; the slice covers it exactly.
        unsafe {
            std::slice::from_raw_parts(
                self.words.as_ptr().cast::<u8>(),
                std::mem::size_of_val(&self.words),
            )
        }
    }

    pub fn as_mut_bytes(&mut self) -> &mut [u8] {
        // SAFETY: as above; any byte pattern is a valid c_ulong.
        unsafe {
            std::slice::from_raw_parts_mut(
                self.words.as_mut_ptr().cast::<u8>(),
                std::mem::size_of_val(&self.words),
            )
        }
    }
}

impl<const WORDS: usize> FromIterator<u16> for BitSet<WORDS> {
    fn from_iter<I: IntoIterator<Item = u16>>(iter: I) -> Self {
        let mut bits = Self::new();
        for bit in iter {
            bits.set(bit);
        }
        bits
    }
}

impl<const WORDS: usize> fmt::Debug for BitSet<WORDS> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_clear_test() {
        let mut bits = KeyBits::new();
        assert!(!bits.test(0x130));
        bits.set(0x130);
        assert!(bits.test(0x130));
        bits.clear(0x130);
        assert!(!bits.test(0x130));
        assert!(bits.is_empty());
    }

    #[test]
    fn out_of_range_bits_are_ignored() {
        let mut bits = AbsBits::new();
        bits.set(AbsBits::BITS as u16 + 5);
        assert!(bits.is_empty());
        assert!(!bits.test(u16::MAX));
    }

    #[test]
    fn union_merges_both_sides() {
        let mut a: AbsBits = [0, 1].into_iter().collect();
        let b: AbsBits = [1, 16].into_iter().collect();
        a.union_with(&b);
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![0, 1, 16]);
    }

    #[test]
    fn sizes_cover_protocol_ranges() {
        assert!(KeyBits::BITS >= KEY_CNT);
        assert!(AbsBits::BITS >= ABS_CNT);
        assert_eq!(KeyBits::new().as_bytes().len(), KEY_CNT / 8);
    }

    #[cfg(target_endian = "little")]
    #[test]
    fn byte_layout_matches_kernel_on_little_endian() {
        let mut bits = KeyBits::new();
        bits.set(0);
        bits.set(9);
        bits.set(0x130);
        let bytes = bits.as_bytes();
        assert_eq!(bytes[0], 0b0000_0001);
        assert_eq!(bytes[1], 0b0000_0010);
        assert_eq!(bytes[0x130 / 8], 1 << (0x130 % 8));

        let mut back = KeyBits::new();
        back.as_mut_bytes().copy_from_slice(bytes);
        assert_eq!(back, bits);
    }
}
