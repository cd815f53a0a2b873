use crate::matrix::BitMatrix;
use crate::vec::BitVec;
use sorted_iter::SortedIterator;
use sorted_iter::assume::AssumeSortedByItemExt;

/// Reduced row echelon form of a matrix together with the row transform that produced it.
///
/// `transform * original == matrix`, so any combination of rows of `matrix` can be rewritten
/// as a combination of rows of the original.
///
/// # Example
///
/// ```
/// use gf2::{BitMatrix, BitVec, EchelonForm};
///
/// let generator: BitMatrix = "1100|0110".parse().unwrap();
/// let echelon = EchelonForm::new(generator.clone());
/// let word: BitVec = [true, false, true, false].into_iter().collect();
/// let coefficients = echelon.transpose_solve(&word).unwrap();
/// assert_eq!(generator.right_multiply(&coefficients), word);
/// ```
#[derive(Debug, Clone)]
pub struct EchelonForm {
    /// The matrix in reduced row echelon form
    pub matrix: BitMatrix,
    /// Transform T such that T * original = matrix
    pub transform: BitMatrix,
    /// Column indices of the pivot positions (rank profile)
    pub pivots: Vec<usize>,
}

impl EchelonForm {
    pub fn new(matrix: BitMatrix) -> Self {
        let (row_count, column_count) = matrix.shape();
        let mut augmented = matrix.hstack(&BitMatrix::identity(row_count));
        let pivots = augmented.echelonize_on(0..column_count);
        let left: Vec<usize> = (0..column_count).collect();
        let right: Vec<usize> = (column_count..column_count + row_count).collect();
        Self {
            matrix: augmented.select_columns(&left),
            transform: augmented.select_columns(&right),
            pivots,
        }
    }

    #[must_use]
    pub fn rank(&self) -> usize {
        self.pivots.len()
    }

    /// Solves `x * original = target` for the row vector `x`.
    ///
    /// Returns `None` when `target` is not in the row space of the original matrix.
    ///
    /// # Panics
    ///
    /// Panics if the target length does not equal the matrix column count.
    #[must_use]
    pub fn transpose_solve(&self, target: &BitVec) -> Option<BitVec> {
        assert_eq!(target.len(), self.matrix.column_count(), "target length must equal the column count");
        let mut residual = target.clone();
        let mut solution = BitVec::zeros(self.matrix.row_count());
        for (row_index, &column_index) in self.pivots.iter().enumerate() {
            if residual.index(column_index) {
                self.matrix.add_row_to(row_index, &mut residual);
                solution.assign_index(row_index, true);
            }
        }
        residual
            .is_zero()
            .then(|| self.transform.right_multiply(&solution))
    }

    /// True when `target` lies in the row space of the original matrix.
    ///
    /// # Panics
    ///
    /// Panics if the target length does not equal the matrix column count.
    #[must_use]
    pub fn spans(&self, target: &BitVec) -> bool {
        self.transpose_solve(target).is_some()
    }
}

/// Indices in `0..index_bound` that do not occur in the sorted slice `v`.
#[must_use]
pub fn complement(v: &[usize], index_bound: usize) -> Vec<usize> {
    let values = v.iter().copied().assume_sorted_by_item();
    (0..index_bound).difference(values).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_reproduces_reduced_matrix() {
        let matrix: BitMatrix = "0011|1111|1100".parse().unwrap();
        let echelon = EchelonForm::new(matrix.clone());
        assert_eq!(echelon.rank(), 2);
        for row_index in 0..matrix.row_count() {
            let combination = echelon.transform.row(row_index);
            assert_eq!(matrix.right_multiply(&combination), echelon.matrix.row(row_index));
        }
    }

    #[test]
    fn complement_skips_listed_indices() {
        assert_eq!(complement(&[1, 3], 5), vec![0, 2, 4]);
        assert_eq!(complement(&[], 2), vec![0, 1]);
    }
}
