use crate::code_matrix::{CodeMatrix, retained_columns};
use crate::error::{Error, Result};
use derive_more::Display;
use gf2::BitVec;
use std::fmt::Write;

/// Chunk widths supported by [`CodeWord::word_at`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display)]
pub enum WordWidth {
    #[display("32")]
    W32,
    #[display("64")]
    W64,
}

impl WordWidth {
    #[must_use]
    pub fn bits(self) -> usize {
        match self {
            WordWidth::W32 => 32,
            WordWidth::W64 => 64,
        }
    }
}

/// A codeword together with the generator rows that sum to it.
///
/// `coefficients` has one bit per generator row and `bits` is the expanded length-`n` word,
/// always equal to the XOR of the selected rows. The Hamming weight is recomputed from the bits
/// on every call.
///
/// Word-sized chunks are read most significant bit first: bit `index * width + j` of the
/// codeword is bit `width - 1 - j` of chunk `index`, the same order as the matrix file format.
///
/// # Example
///
/// ```
/// use gf2::BitVec;
/// use lowweight::{CodeMatrix, CodeWord};
///
/// let code = CodeMatrix::new("1100|0110".parse().unwrap()).unwrap();
/// let coefficients: BitVec = [true, true].into_iter().collect();
/// let word = CodeWord::from_combination(&code, coefficients).unwrap();
/// assert_eq!(word.to_string(), "1010");
/// assert_eq!(word.hamming_weight(), 2);
/// assert_eq!(word.word32(0).unwrap(), 0xA000_0000);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CodeWord {
    coefficients: BitVec,
    bits: BitVec,
}

impl CodeWord {
    /// Expands a coefficient vector by XOR-summing the selected generator rows.
    pub fn from_combination(matrix: &CodeMatrix, coefficients: BitVec) -> Result<Self> {
        if coefficients.len() != matrix.dimension() {
            return Err(Error::Dimension {
                expected: matrix.dimension(),
                found: coefficients.len(),
            });
        }
        let bits = matrix.generator().right_multiply(&coefficients);
        Ok(Self { coefficients, bits })
    }

    /// Recovers the coefficient vector of an expanded word. Fails with
    /// [`Error::NotACodeword`] when `bits` lies outside the code.
    pub fn from_bits(matrix: &CodeMatrix, bits: BitVec) -> Result<Self> {
        if bits.len() != matrix.length() {
            return Err(Error::Dimension {
                expected: matrix.length(),
                found: bits.len(),
            });
        }
        let coefficients = matrix.coefficients_of(&bits).ok_or(Error::NotACodeword)?;
        Ok(Self { coefficients, bits })
    }

    pub fn coefficients(&self) -> &BitVec {
        &self.coefficients
    }

    pub fn bits(&self) -> &BitVec {
        &self.bits
    }

    /// Code length `n`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.bits.is_zero()
    }

    #[must_use]
    pub fn hamming_weight(&self) -> usize {
        self.bits.weight()
    }

    /// Number of `width`-bit chunks, counting a trailing partial chunk.
    #[must_use]
    pub fn chunk_count(&self, width: WordWidth) -> usize {
        self.bits.len().div_ceil(width.bits())
    }

    /// The `width`-bit chunk starting at bit `index * width`; a trailing partial chunk is
    /// zero-padded on the right.
    pub fn word_at(&self, index: usize, width: WordWidth) -> Result<u64> {
        self.bits.chunk(index, width.bits()).ok_or_else(|| {
            Error::Index(gf2::Error::IndexOutOfBounds {
                index,
                length: self.chunk_count(width),
            })
        })
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn word32(&self, index: usize) -> Result<u32> {
        self.word_at(index, WordWidth::W32).map(|word| word as u32)
    }

    pub fn word64(&self, index: usize) -> Result<u64> {
        self.word_at(index, WordWidth::W64)
    }

    /// All 32-bit chunks in sequence order.
    #[allow(clippy::cast_possible_truncation)]
    pub fn words32(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.chunk_count(WordWidth::W32)).filter_map(|index| self.bits.chunk(index, 32).map(|word| word as u32))
    }

    /// One 64-bit chunk per line in hexadecimal, prefixed by its bit offset.
    #[must_use]
    pub fn hex_dump(&self) -> String {
        let mut dump = String::new();
        for index in 0..self.chunk_count(WordWidth::W64) {
            if let Some(word) = self.bits.chunk(index, 64) {
                let _ = writeln!(dump, "{:>6}: {word:016x}", index * 64);
            }
        }
        dump
    }

    /// Reinserts zeros at `forced_zero_columns`, mapping a codeword of a code shortened on those
    /// columns back to the original length.
    ///
    /// # Panics
    ///
    /// Panics if `length` minus the number of distinct forced columns differs from `self.len()`.
    pub fn lengthened(&self, forced_zero_columns: &[usize], length: usize) -> BitVec {
        let retained = retained_columns(forced_zero_columns, length);
        self.bits.scatter(&retained, length)
    }
}

impl std::fmt::Display for CodeWord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (index, bit) in self.bits.iter().enumerate() {
            if f.alternate() && index > 0 && index % 32 == 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", u8::from(bit))?;
        }
        Ok(())
    }
}
