use crate::error::{Error, Result};
use rand::Rng;
use std::ops::Range;

pub type Word = u64;

pub const WORD_BITS: usize = Word::BITS as usize;

/// Number of words needed to hold `bit_count` bits.
#[must_use]
pub fn word_count(bit_count: usize) -> usize {
    bit_count.div_ceil(WORD_BITS)
}

/// Mask selecting the valid bits of the last word of a `bit_count`-bit vector.
#[must_use]
pub(crate) fn tail_mask(bit_count: usize) -> Word {
    match bit_count % WORD_BITS {
        0 => Word::MAX,
        remainder => (1 << remainder) - 1,
    }
}

/// A dynamically-sized, word-packed bit vector.
///
/// Bit `i` lives in word `i / 64` at bit position `i % 64`. Bits past [`len`](BitVec::len)
/// are always zero, so word-level weight and equality never see stale padding.
///
/// # Example
///
/// ```
/// use gf2::BitVec;
///
/// let mut v = BitVec::zeros(10);
/// v.assign_index(3, true);
/// v.assign_index(7, true);
/// assert_eq!(v.weight(), 2);
/// assert_eq!(v.support().collect::<Vec<_>>(), vec![3, 7]);
///
/// let other = BitVec::ones(10);
/// v.bitxor_assign(&other);
/// assert_eq!(v.weight(), 8);
/// ```
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct BitVec {
    words: Vec<Word>,
    length: usize,
}

impl BitVec {
    pub fn zeros(length: usize) -> Self {
        Self {
            words: vec![0; word_count(length)],
            length,
        }
    }

    pub fn ones(length: usize) -> Self {
        let mut words = vec![Word::MAX; word_count(length)];
        if let Some(last) = words.last_mut() {
            *last &= tail_mask(length);
        }
        Self { words, length }
    }

    /// Builds a vector from raw words; bits past `length` are cleared.
    ///
    /// # Panics
    ///
    /// Panics if `words` holds fewer than `length` bits.
    pub fn from_words(length: usize, words: &[Word]) -> Self {
        let needed = word_count(length);
        assert!(
            words.len() >= needed,
            "{} words cannot hold {length} bits",
            words.len()
        );
        let mut words = words[..needed].to_vec();
        if let Some(last) = words.last_mut() {
            *last &= tail_mask(length);
        }
        Self { words, length }
    }

    pub fn random_with_rng<R: Rng>(length: usize, rng: &mut R) -> Self {
        let mut words = vec![0; word_count(length)];
        rng.fill(words.as_mut_slice());
        Self::from_words(length, &words)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.length
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[must_use]
    pub fn as_words(&self) -> &[Word] {
        &self.words
    }

    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[must_use]
    pub fn index(&self, index: usize) -> bool {
        assert!(index < self.length, "index {index} out of bounds for length {}", self.length);
        (self.words[index / WORD_BITS] >> (index % WORD_BITS)) & 1 == 1
    }

    pub fn try_index(&self, index: usize) -> Result<bool> {
        if index < self.length {
            Ok(self.index(index))
        } else {
            Err(Error::IndexOutOfBounds {
                index,
                length: self.length,
            })
        }
    }

    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    pub fn assign_index(&mut self, index: usize, to: bool) {
        assert!(index < self.length, "index {index} out of bounds for length {}", self.length);
        let mask = 1 << (index % WORD_BITS);
        let word = &mut self.words[index / WORD_BITS];
        if to {
            *word |= mask;
        } else {
            *word &= !mask;
        }
    }

    /// Hamming weight, recomputed from the words on every call.
    #[must_use]
    pub fn weight(&self) -> usize {
        self.words.iter().map(|word| word.count_ones() as usize).sum()
    }

    /// Weight of the bits whose index lies in `range`.
    ///
    /// # Panics
    ///
    /// Panics if `range.end > self.len()`.
    #[must_use]
    pub fn weight_in(&self, range: Range<usize>) -> usize {
        assert!(range.end <= self.length, "range {range:?} exceeds length {}", self.length);
        if range.start >= range.end {
            return 0;
        }
        let first_word = range.start / WORD_BITS;
        let last_word = (range.end - 1) / WORD_BITS;
        let start_mask = Word::MAX << (range.start % WORD_BITS);
        let end_mask = tail_mask(range.end);
        if first_word == last_word {
            return (self.words[first_word] & start_mask & end_mask).count_ones() as usize;
        }
        let mut weight = (self.words[first_word] & start_mask).count_ones() as usize;
        for word in &self.words[first_word + 1..last_word] {
            weight += word.count_ones() as usize;
        }
        weight + (self.words[last_word] & end_mask).count_ones() as usize
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|word| *word == 0)
    }

    /// Iterates over the indices of set bits in increasing order.
    pub fn support(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(word_index, &word)| {
            let mut remaining = word;
            std::iter::from_fn(move || {
                if remaining == 0 {
                    return None;
                }
                let bit = remaining.trailing_zeros() as usize;
                remaining &= remaining - 1;
                Some(word_index * WORD_BITS + bit)
            })
        })
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = bool> + '_ {
        (0..self.length).map(|index| self.index(index))
    }

    /// # Panics
    ///
    /// Panics if the lengths differ.
    pub fn bitxor_assign(&mut self, other: &BitVec) {
        assert_eq!(self.length, other.length, "bit vectors must have equal length");
        self.xor_words(&other.words);
    }

    /// Overwrites this vector with `other` without reallocating.
    ///
    /// # Panics
    ///
    /// Panics if the lengths differ.
    pub fn assign(&mut self, other: &BitVec) {
        assert_eq!(self.length, other.length, "bit vectors must have equal length");
        self.words.copy_from_slice(&other.words);
    }

    /// XORs raw words into the front of this vector. Used by matrix rows, whose
    /// padding is zero by construction.
    pub(crate) fn xor_words(&mut self, words: &[Word]) {
        for (to, from) in self.words.iter_mut().zip(words) {
            *to ^= *from;
        }
    }

    /// Returns the vector `result[j] = self[indices[j]]`.
    ///
    /// # Panics
    ///
    /// Panics if any index is out of bounds.
    pub fn select(&self, indices: &[usize]) -> BitVec {
        let mut result = BitVec::zeros(indices.len());
        for (position, &index) in indices.iter().enumerate() {
            if self.index(index) {
                result.assign_index(position, true);
            }
        }
        result
    }

    /// Inverse of [`select`](BitVec::select): returns a vector of `length` bits with
    /// `result[positions[j]] = self[j]` and zeros elsewhere.
    ///
    /// # Panics
    ///
    /// Panics if `positions.len() != self.len()` or a position is out of bounds.
    pub fn scatter(&self, positions: &[usize], length: usize) -> BitVec {
        assert_eq!(positions.len(), self.length, "one position per bit is required");
        let mut result = BitVec::zeros(length);
        for index in self.support() {
            result.assign_index(positions[index], true);
        }
        result
    }

    /// Returns the `width`-bit chunk covering bits `index * width .. (index + 1) * width`,
    /// most significant bit first. A trailing partial chunk is padded with zeros on the right.
    /// Returns `None` when the chunk starts past the end of the vector.
    ///
    /// # Panics
    ///
    /// Panics if `width` is zero or larger than 64.
    #[must_use]
    pub fn chunk(&self, index: usize, width: usize) -> Option<u64> {
        assert!((1..=WORD_BITS).contains(&width), "chunk width must be in 1..=64");
        let start = index.checked_mul(width)?;
        if start >= self.length {
            return None;
        }
        let mut value = 0u64;
        for offset in 0..width {
            let position = start + offset;
            let bit = position < self.length && self.index(position);
            value = (value << 1) | u64::from(bit);
        }
        Some(value)
    }
}

impl FromIterator<bool> for BitVec {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        let mut words = Vec::new();
        let mut length = 0;
        for bit in iter {
            if length % WORD_BITS == 0 {
                words.push(0);
            }
            if bit {
                if let Some(last) = words.last_mut() {
                    *last |= 1 << (length % WORD_BITS);
                }
            }
            length += 1;
        }
        Self { words, length }
    }
}

impl std::fmt::Display for BitVec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for bit in self.iter() {
            write!(f, "{}", u8::from(bit))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tail_mask_covers_partial_words() {
        assert_eq!(tail_mask(64), Word::MAX);
        assert_eq!(tail_mask(3), 0b111);
        assert_eq!(tail_mask(65), 1);
    }

    #[test]
    fn ones_keeps_padding_clear() {
        let ones = BitVec::ones(70);
        assert_eq!(ones.weight(), 70);
        assert_eq!(ones.as_words()[1], 0b11_1111);
    }

    #[test]
    fn chunk_is_msb_first() {
        let bits: BitVec = [true, false, false, false, false, false, false, true, true].into_iter().collect();
        assert_eq!(bits.chunk(0, 8), Some(0b1000_0001));
        assert_eq!(bits.chunk(1, 8), Some(0b1000_0000));
        assert_eq!(bits.chunk(2, 8), None);
    }
}
