use crate::error::{Error, Result};
use crate::vec::{BitVec, WORD_BITS, Word, tail_mask, word_count};
use rand::Rng;
use std::ops::Index;
use std::str::FromStr;

/// A rectangular matrix over GF(2), stored row-major with every row padded to whole words.
///
/// The shape is fixed at construction. Contents change only through the row and column
/// operations below, each of which costs `O(columns / 64)` word operations per row touched.
///
/// # Construction
///
/// ```
/// use gf2::BitMatrix;
///
/// let zeros = BitMatrix::zeros(10, 20);
/// let identity = BitMatrix::identity(4);
/// let parsed: BitMatrix = "1100|0011".parse().unwrap();
/// assert_eq!(parsed.shape(), (2, 4));
/// ```
///
/// # Row operations
///
/// ```
/// use gf2::BitMatrix;
///
/// let mut m = BitMatrix::identity(3);
/// m.add_into_row(0, 1);
/// assert_eq!(m.row(0).weight(), 2);
/// m.swap_columns(0, 2);
/// assert!(m.get((2, 0)));
/// ```
///
/// # Elimination
///
/// ```
/// use gf2::BitMatrix;
///
/// let mut m: BitMatrix = "101|010|111".parse().unwrap();
/// let pivots = m.echelonize();
/// assert_eq!(pivots, vec![0, 1]);
/// assert_eq!(m.rank(), 2);
/// ```
#[must_use]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct BitMatrix {
    words: Vec<Word>,
    row_count: usize,
    column_count: usize,
    rowstride: usize,
}

impl BitMatrix {
    pub fn zeros(row_count: usize, column_count: usize) -> Self {
        let rowstride = word_count(column_count);
        Self {
            words: vec![0; row_count * rowstride],
            row_count,
            column_count,
            rowstride,
        }
    }

    /// Alias for [`zeros`](BitMatrix::zeros).
    pub fn with_shape(row_count: usize, column_count: usize) -> Self {
        Self::zeros(row_count, column_count)
    }

    pub fn identity(dimension: usize) -> Self {
        let mut matrix = Self::zeros(dimension, dimension);
        for index in 0..dimension {
            matrix.set((index, index), true);
        }
        matrix
    }

    /// Creates a matrix from rows of booleans; rows shorter than `column_count` are zero-filled
    /// and longer rows are truncated.
    pub fn from_iter<Row, Rows>(rows: Rows, column_count: usize) -> Self
    where
        Row: IntoIterator<Item = bool>,
        Rows: IntoIterator<Item = Row>,
    {
        let rows: Vec<BitVec> = rows
            .into_iter()
            .map(|row| row.into_iter().take(column_count).collect::<BitVec>())
            .collect();
        let mut matrix = Self::zeros(rows.len(), column_count);
        for (row_index, row) in rows.iter().enumerate() {
            for column_index in row.support() {
                matrix.set((row_index, column_index), true);
            }
        }
        matrix
    }

    /// Stacks bit vectors as rows.
    ///
    /// # Panics
    ///
    /// Panics if a row's length differs from `column_count`.
    pub fn from_rows<'life>(rows: impl IntoIterator<Item = &'life BitVec>, column_count: usize) -> Self {
        let rowstride = word_count(column_count);
        let mut words = Vec::new();
        let mut row_count = 0;
        for row in rows {
            assert_eq!(row.len(), column_count, "row length must equal the column count");
            words.extend_from_slice(row.as_words());
            row_count += 1;
        }
        Self {
            words,
            row_count,
            column_count,
            rowstride,
        }
    }

    /// Creates a random matrix; padding bits stay zero.
    pub fn random_with_rng<R: Rng>(row_count: usize, column_count: usize, rng: &mut R) -> Self {
        let mut matrix = Self::zeros(row_count, column_count);
        rng.fill(matrix.words.as_mut_slice());
        matrix.clear_padding();
        matrix
    }

    /// Parses `row_count` rows of `ceil(column_count / 8)` bytes each. Bit 0 of a row is the
    /// most significant bit of its first byte.
    ///
    /// Fails with [`Error::Format`] when the byte count does not match the declared shape
    /// or when a padding bit past `column_count` is set.
    pub fn from_row_bytes(row_count: usize, column_count: usize, bytes: &[u8]) -> Result<Self> {
        let bytes_per_row = column_count.div_ceil(8);
        let expected = row_count
            .checked_mul(bytes_per_row)
            .ok_or_else(|| Error::Format(format!("shape ({row_count}, {column_count}) overflows")))?;
        if bytes.len() != expected {
            return Err(Error::Format(format!(
                "expected {expected} bytes for {row_count} rows of {column_count} bits, found {}",
                bytes.len()
            )));
        }
        let mut matrix = Self::zeros(row_count, column_count);
        if bytes_per_row == 0 {
            return Ok(matrix);
        }
        for (row_index, row_bytes) in bytes.chunks_exact(bytes_per_row).enumerate() {
            for (byte_index, &byte) in row_bytes.iter().enumerate() {
                for bit in 0..8 {
                    if byte & (0x80 >> bit) == 0 {
                        continue;
                    }
                    let column_index = byte_index * 8 + bit;
                    if column_index >= column_count {
                        return Err(Error::Format(format!(
                            "row {row_index} has a padding bit set at column {column_index}"
                        )));
                    }
                    matrix.set((row_index, column_index), true);
                }
            }
        }
        Ok(matrix)
    }

    /// Packs one row into `ceil(column_count / 8)` bytes, most significant bit first.
    ///
    /// # Panics
    ///
    /// Panics if the row index is out of bounds.
    #[must_use]
    pub fn row_bytes(&self, row_index: usize) -> Vec<u8> {
        let mut bytes = vec![0u8; self.column_count.div_ceil(8)];
        for column_index in self.row(row_index).support() {
            bytes[column_index / 8] |= 0x80 >> (column_index % 8);
        }
        bytes
    }

    /// All rows packed back to back, the inverse of [`from_row_bytes`](BitMatrix::from_row_bytes).
    #[must_use]
    pub fn to_row_bytes(&self) -> Vec<u8> {
        (0..self.row_count).flat_map(|row_index| self.row_bytes(row_index)).collect()
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.row_count, self.column_count)
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|word| *word == 0)
    }

    /// Returns a copy of a row.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn row(&self, index: usize) -> BitVec {
        BitVec::from_words(self.column_count, self.row_words(index))
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item = BitVec> + '_ {
        (0..self.row_count).map(|index| self.row(index))
    }

    /// Weight of a single row.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    #[must_use]
    pub fn row_weight(&self, index: usize) -> usize {
        self.row_words(index).iter().map(|word| word.count_ones() as usize).sum()
    }

    /// XORs row `index` into `target`.
    ///
    /// # Panics
    ///
    /// Panics if the index is out of bounds or `target.len() != self.column_count()`.
    pub fn add_row_to(&self, index: usize, target: &mut BitVec) {
        assert_eq!(target.len(), self.column_count, "target length must equal the column count");
        target.xor_words(self.row_words(index));
    }

    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn set(&mut self, index: (usize, usize), to: bool) {
        self.assert_in_range(index);
        let (word_index, mask) = self.word_and_mask_of(index);
        if to {
            self.words[word_index] |= mask;
        } else {
            self.words[word_index] &= !mask;
        }
    }

    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    #[must_use]
    pub fn get(&self, index: (usize, usize)) -> bool {
        self.assert_in_range(index);
        let (word_index, mask) = self.word_and_mask_of(index);
        self.words[word_index] & mask != 0
    }

    /// Checked variant of [`set`](BitMatrix::set).
    pub fn try_set(&mut self, index: (usize, usize), to: bool) -> Result<()> {
        self.check_range(index)?;
        self.set(index, to);
        Ok(())
    }

    /// Checked variant of [`get`](BitMatrix::get).
    pub fn try_get(&self, index: (usize, usize)) -> Result<bool> {
        self.check_range(index)?;
        Ok(self.get(index))
    }

    /// Adds (XORs) row `from_index` into row `to_index`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn add_into_row(&mut self, to_index: usize, from_index: usize) {
        assert!(
            to_index < self.row_count && from_index < self.row_count,
            "row index out of bounds for {} rows",
            self.row_count
        );
        let stride = self.rowstride;
        if to_index == from_index {
            self.words[to_index * stride..(to_index + 1) * stride].fill(0);
            return;
        }
        let (to_start, from_start) = (to_index * stride, from_index * stride);
        for offset in 0..stride {
            let value = self.words[from_start + offset];
            self.words[to_start + offset] ^= value;
        }
    }

    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn swap_rows(&mut self, left_row_index: usize, right_row_index: usize) {
        assert!(
            left_row_index < self.row_count && right_row_index < self.row_count,
            "row index out of bounds for {} rows",
            self.row_count
        );
        if left_row_index == right_row_index {
            return;
        }
        let stride = self.rowstride;
        for offset in 0..stride {
            self.words
                .swap(left_row_index * stride + offset, right_row_index * stride + offset);
        }
    }

    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn swap_columns(&mut self, left_column_index: usize, right_column_index: usize) {
        assert!(
            left_column_index < self.column_count && right_column_index < self.column_count,
            "column index out of bounds for {} columns",
            self.column_count
        );
        let left_mask: Word = 1 << (left_column_index % WORD_BITS);
        let right_mask: Word = 1 << (right_column_index % WORD_BITS);
        for row_index in 0..self.row_count {
            let base = row_index * self.rowstride;
            let left_word = base + left_column_index / WORD_BITS;
            let right_word = base + right_column_index / WORD_BITS;
            let left_bit = self.words[left_word] & left_mask != 0;
            let right_bit = self.words[right_word] & right_mask != 0;
            if left_bit != right_bit {
                self.words[left_word] ^= left_mask;
                self.words[right_word] ^= right_mask;
            }
        }
    }

    /// Permutes the columns: afterwards column `j` holds what was previously column
    /// `permutation[j]`.
    ///
    /// # Panics
    ///
    /// Panics if `permutation` is not a permutation of `0..column_count`.
    pub fn permute_columns(&mut self, permutation: &[usize]) {
        *self = self.permuted_columns(permutation);
    }

    /// Non-mutating form of [`permute_columns`](BitMatrix::permute_columns).
    ///
    /// # Panics
    ///
    /// Panics if `permutation` is not a permutation of `0..column_count`.
    pub fn permuted_columns(&self, permutation: &[usize]) -> Self {
        assert_permutation(permutation, self.column_count);
        self.select_columns(permutation)
    }

    /// Builds the matrix whose column `j` is column `columns[j]` of `self`.
    ///
    /// # Panics
    ///
    /// Panics if a column index is out of bounds.
    pub fn select_columns(&self, columns: &[usize]) -> Self {
        assert!(
            columns.iter().all(|&column| column < self.column_count),
            "column index out of bounds for {} columns",
            self.column_count
        );
        let mut result = Self::zeros(self.row_count, columns.len());
        for row_index in 0..self.row_count {
            let source = self.row_words(row_index);
            let base = row_index * result.rowstride;
            for (position, &column) in columns.iter().enumerate() {
                if (source[column / WORD_BITS] >> (column % WORD_BITS)) & 1 == 1 {
                    result.words[base + position / WORD_BITS] |= 1 << (position % WORD_BITS);
                }
            }
        }
        result
    }

    /// Builds the matrix whose row `i` is row `rows[i]` of `self`.
    ///
    /// # Panics
    ///
    /// Panics if a row index is out of bounds.
    pub fn select_rows(&self, rows: &[usize]) -> Self {
        let mut words = Vec::with_capacity(rows.len() * self.rowstride);
        for &row_index in rows {
            words.extend_from_slice(self.row_words(row_index));
        }
        Self {
            words,
            row_count: rows.len(),
            column_count: self.column_count,
            rowstride: self.rowstride,
        }
    }

    /// Concatenates the columns of `self` and `other`.
    ///
    /// # Panics
    ///
    /// Panics if the row counts differ.
    pub fn hstack(&self, other: &BitMatrix) -> Self {
        assert_eq!(self.row_count, other.row_count, "row counts must match");
        let mut result = Self::zeros(self.row_count, self.column_count + other.column_count);
        for row_index in 0..self.row_count {
            let base = row_index * result.rowstride;
            result.words[base..base + self.rowstride].copy_from_slice(self.row_words(row_index));
            for column_index in other.row(row_index).support() {
                let position = self.column_count + column_index;
                result.words[base + position / WORD_BITS] |= 1 << (position % WORD_BITS);
            }
        }
        result
    }

    /// Computes `left * self` for a row vector `left`.
    ///
    /// # Panics
    ///
    /// Panics if `left.len() != self.row_count()`.
    pub fn right_multiply(&self, left: &BitVec) -> BitVec {
        assert_eq!(left.len(), self.row_count, "vector length must equal the row count");
        let mut result = BitVec::zeros(self.column_count);
        for row_index in left.support() {
            self.add_row_to(row_index, &mut result);
        }
        result
    }

    /// Reduces the matrix to reduced row echelon form in place and returns the pivot columns.
    pub fn echelonize(&mut self) -> Vec<usize> {
        self.echelonize_on(0..self.column_count)
    }

    /// Gauss-Jordan elimination that only considers `columns`, in the given order, as pivot
    /// columns.
    ///
    /// Returns the pivot column of each leading row. Afterwards row `i` of the leading block
    /// is the only row with a one in pivot column `i`, and every row past the leading block is
    /// zero on all of `columns`. Columns without a usable pivot are skipped.
    ///
    /// # Panics
    ///
    /// Panics if a column index is out of bounds.
    pub fn echelonize_on(&mut self, columns: impl IntoIterator<Item = usize>) -> Vec<usize> {
        let mut pivots = Vec::new();
        for column_index in columns {
            let rank = pivots.len();
            if rank == self.row_count {
                break;
            }
            let Some(pivot_row) = (rank..self.row_count).find(|&row| self.get((row, column_index))) else {
                continue;
            };
            self.swap_rows(pivot_row, rank);
            self.clear_column_except(column_index, rank);
            pivots.push(column_index);
        }
        pivots
    }

    /// XORs row `pivot_row` into every other row that has a one in `column_index`.
    ///
    /// # Panics
    ///
    /// Panics if an index is out of bounds.
    pub fn clear_column_except(&mut self, column_index: usize, pivot_row: usize) {
        let word_offset = column_index / WORD_BITS;
        let mask: Word = 1 << (column_index % WORD_BITS);
        for row_index in 0..self.row_count {
            if row_index != pivot_row && self.words[row_index * self.rowstride + word_offset] & mask != 0 {
                self.add_into_row(row_index, pivot_row);
            }
        }
    }

    #[must_use]
    pub fn rank(&self) -> usize {
        self.clone().echelonize().len()
    }

    pub fn transposed(&self) -> Self {
        let mut result = Self::zeros(self.column_count, self.row_count);
        for row_index in 0..self.row_count {
            for column_index in self.row(row_index).support() {
                result.set((column_index, row_index), true);
            }
        }
        result
    }

    fn row_words(&self, index: usize) -> &[Word] {
        assert!(index < self.row_count, "row {index} out of bounds for {} rows", self.row_count);
        &self.words[index * self.rowstride..(index + 1) * self.rowstride]
    }

    fn word_and_mask_of(&self, index: (usize, usize)) -> (usize, Word) {
        let word_index = index.0 * self.rowstride + index.1 / WORD_BITS;
        (word_index, 1 << (index.1 % WORD_BITS))
    }

    fn assert_in_range(&self, index: (usize, usize)) {
        assert!(
            index.0 < self.row_count && index.1 < self.column_count,
            "index {index:?} out of range for shape {:?}",
            self.shape()
        );
    }

    fn check_range(&self, index: (usize, usize)) -> Result<()> {
        if index.0 < self.row_count && index.1 < self.column_count {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                row: index.0,
                column: index.1,
                shape: self.shape(),
            })
        }
    }

    fn clear_padding(&mut self) {
        if self.rowstride == 0 {
            return;
        }
        let mask = tail_mask(self.column_count);
        for row_index in 0..self.row_count {
            self.words[(row_index + 1) * self.rowstride - 1] &= mask;
        }
    }
}

fn assert_permutation(permutation: &[usize], length: usize) {
    assert_eq!(permutation.len(), length, "permutation length must be {length}");
    let mut seen = vec![false; length];
    for &index in permutation {
        assert!(index < length && !seen[index], "not a permutation of 0..{length}");
        seen[index] = true;
    }
}

impl Index<(usize, usize)> for BitMatrix {
    type Output = bool;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        if self.get(index) { &true } else { &false }
    }
}

impl Index<[usize; 2]> for BitMatrix {
    type Output = bool;

    fn index(&self, index: [usize; 2]) -> &Self::Output {
        &self[(index[0], index[1])]
    }
}

impl std::fmt::Display for BitMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            write!(f, "[")?;
        }
        for row in self.rows() {
            write!(f, "{row}")?;
            if f.alternate() {
                write!(f, "|")?;
            } else {
                writeln!(f)?;
            }
        }
        if f.alternate() {
            write!(f, "]")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for BitMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "BitMatrix(shape={:?},value={:#})", self.shape(), self)
    }
}

impl FromStr for BitMatrix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut rows = Vec::<Vec<bool>>::new();
        for row_string in s.split(['|', '[', ']', '(', ')', ';', '\n']) {
            let mut row = Vec::new();
            for char in row_string.chars() {
                match char {
                    '0' | '.' => row.push(false),
                    '1' => row.push(true),
                    ' ' | '-' | ',' | '\t' | '\r' => {}
                    other => return Err(Error::Format(format!("unexpected character {other:?}"))),
                }
            }
            if !row.is_empty() {
                rows.push(row);
            }
        }
        let column_count = rows.iter().map(Vec::len).max().unwrap_or(0);
        if let Some(short) = rows.iter().find(|row| row.len() != column_count) {
            return Err(Error::DimensionMismatch {
                expected: column_count,
                found: short.len(),
            });
        }
        Ok(Self::from_iter(rows, column_count))
    }
}
