use crate::error::{Error, Result};
use derive_more::Into;
use gf2::{BitMatrix, BitVec, EchelonForm, complement};
use log::info;
use std::collections::BTreeSet;
use std::io::{Read, Write};
use std::path::Path;

const HEADER_LEN: usize = 16;

/// Generator matrix of a binary linear code: `k` linearly independent rows of length `n`.
///
/// Every constructor verifies full row rank, and transforms such as
/// [`code_shortening`](CodeMatrix::code_shortening) return a new matrix, so a `CodeMatrix`
/// can be shared between any number of concurrent searches.
///
/// # On-disk format
///
/// `k` and `n` as unsigned 64-bit little-endian integers, followed by `k` rows of
/// `ceil(n / 8)` bytes. Bit 0 of a row is the most significant bit of its first byte and
/// padding bits past `n` are zero.
///
/// # Example
///
/// ```
/// use gf2::BitMatrix;
/// use lowweight::CodeMatrix;
///
/// let generator: BitMatrix = "1100|0011".parse().unwrap();
/// let code = CodeMatrix::new(generator).unwrap();
/// let shortened = code.code_shortening(&[3]).unwrap();
/// assert_eq!((shortened.dimension(), shortened.length()), (1, 3));
///
/// let restored = CodeMatrix::from_bytes(&code.to_bytes()).unwrap();
/// assert_eq!(restored, code);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Into)]
pub struct CodeMatrix {
    generator: BitMatrix,
}

impl CodeMatrix {
    /// Wraps a generator matrix after checking that its rows are linearly independent.
    pub fn new(generator: BitMatrix) -> Result<Self> {
        let rank = generator.rank();
        if rank != generator.row_count() {
            return Err(Error::Rank(format!(
                "generator has {} rows but rank {rank}",
                generator.row_count()
            )));
        }
        Ok(Self { generator })
    }

    /// Parses the on-disk format from a byte slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::Format(format!(
                "truncated header: {} of {HEADER_LEN} bytes",
                bytes.len()
            )));
        }
        let (header, body) = bytes.split_at(HEADER_LEN);
        let row_count = header_field(&header[..8], "row count")?;
        let column_count = header_field(&header[8..], "column count")?;
        let expected = row_count
            .checked_mul(column_count.div_ceil(8))
            .ok_or_else(|| Error::Format(format!("declared shape ({row_count}, {column_count}) overflows")))?;
        if body.len() < expected {
            return Err(Error::Format(format!(
                "truncated body: {} of {expected} bytes for {row_count} rows of {column_count} bits",
                body.len()
            )));
        }
        if body.len() > expected {
            return Err(Error::Format(format!(
                "{} trailing bytes after {row_count} rows of {column_count} bits",
                body.len() - expected
            )));
        }
        let generator = BitMatrix::from_row_bytes(row_count, column_count, body)?;
        let code = Self::new(generator)?;
        info!("loaded {row_count}x{column_count} generator matrix");
        Ok(code)
    }

    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes(&bytes)
    }

    pub fn read_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("reading generator matrix from {}", path.display());
        Self::from_bytes(&std::fs::read(path)?)
    }

    /// Serializes to the on-disk format.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(HEADER_LEN + self.dimension() * self.length().div_ceil(8));
        bytes.extend_from_slice(&(self.dimension() as u64).to_le_bytes());
        bytes.extend_from_slice(&(self.length() as u64).to_le_bytes());
        bytes.extend_from_slice(&self.generator.to_row_bytes());
        bytes
    }

    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(&self.to_bytes())?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_to(std::io::BufWriter::new(file))
    }

    /// Number of rows `k`.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.generator.row_count()
    }

    /// Number of columns `n`.
    #[must_use]
    pub fn length(&self) -> usize {
        self.generator.column_count()
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.dimension()
    }

    #[must_use]
    pub fn columns(&self) -> usize {
        self.length()
    }

    /// Always equal to [`rows`](CodeMatrix::rows); recomputed by elimination.
    #[must_use]
    pub fn rank(&self) -> usize {
        self.generator.rank()
    }

    pub fn generator(&self) -> &BitMatrix {
        &self.generator
    }

    /// # Panics
    ///
    /// Panics if the index is out of bounds.
    pub fn row(&self, index: usize) -> BitVec {
        self.generator.row(index)
    }

    pub fn echelon_form(&self) -> EchelonForm {
        EchelonForm::new(self.generator.clone())
    }

    /// Combination coefficients producing `word`, or `None` if `word` is not a codeword.
    ///
    /// # Panics
    ///
    /// Panics if `word.len() != self.length()`.
    #[must_use]
    pub fn coefficients_of(&self, word: &BitVec) -> Option<BitVec> {
        self.echelon_form().transpose_solve(word)
    }

    /// # Panics
    ///
    /// Panics if `word.len() != self.length()`.
    #[must_use]
    pub fn contains(&self, word: &BitVec) -> bool {
        self.coefficients_of(word).is_some()
    }

    /// Generator matrix of the shortened code: the codewords that vanish on every column of
    /// `forced_zero_columns`, with those columns deleted.
    ///
    /// The forced columns are used as pivot columns of a Gauss-Jordan elimination. Each row
    /// that receives a pivot is dropped, since no combination containing it vanishes on its
    /// pivot column. The remaining rows are zero on every forced column and stay linearly
    /// independent, so deleting the forced columns yields a full-rank `k' x (n - |S|)` matrix.
    ///
    /// Duplicate columns are ignored. Fails with [`Error::Index`] for a column outside
    /// `0..n` and with [`Error::Rank`] when more columns are forced than the code has rows.
    /// When only the zero codeword survives the result has dimension zero, and searching it
    /// fails with [`Error::NotFound`]. `self` is never modified.
    pub fn code_shortening(&self, forced_zero_columns: &[usize]) -> Result<CodeMatrix> {
        let (row_count, column_count) = self.generator.shape();
        let forced: BTreeSet<usize> = forced_zero_columns.iter().copied().collect();
        if let Some(&column) = forced.iter().find(|&&column| column >= column_count) {
            return Err(Error::Index(gf2::Error::IndexOutOfBounds {
                index: column,
                length: column_count,
            }));
        }
        if forced.len() > row_count {
            return Err(Error::Rank(format!(
                "cannot force {} columns to zero in a code of dimension {row_count}",
                forced.len()
            )));
        }

        let mut reduced = self.generator.clone();
        let pivots = reduced.echelonize_on(forced.iter().copied());
        let eliminated = pivots.len();

        let forced: Vec<usize> = forced.into_iter().collect();
        let kept_rows: Vec<usize> = (eliminated..row_count).collect();
        let kept_columns = complement(&forced, column_count);
        let generator = reduced.select_rows(&kept_rows).select_columns(&kept_columns);
        debug_assert_eq!(generator.rank(), generator.row_count());
        info!(
            "shortened {row_count}x{column_count} code on {} columns: {eliminated} rows eliminated, new shape {:?}",
            forced.len(),
            generator.shape()
        );
        Ok(CodeMatrix { generator })
    }
}

/// Original column indices kept by shortening a length-`length` code on `forced_zero_columns`,
/// in increasing order. Column `j` of the shortened code is column `retained[j]` of the original.
#[must_use]
pub fn retained_columns(forced_zero_columns: &[usize], length: usize) -> Vec<usize> {
    let forced: BTreeSet<usize> = forced_zero_columns.iter().copied().collect();
    let forced: Vec<usize> = forced.into_iter().collect();
    complement(&forced, length)
}

fn header_field(bytes: &[u8], name: &str) -> Result<usize> {
    let mut raw = [0u8; 8];
    raw.copy_from_slice(bytes);
    usize::try_from(u64::from_le_bytes(raw)).map_err(|_| Error::Format(format!("{name} does not fit in memory")))
}

impl std::fmt::Display for CodeMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.generator, f)
    }
}
