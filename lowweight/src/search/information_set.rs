use crate::parameters::SearchParameters;
use gf2::{BitMatrix, BitVec};
use log::trace;
use rand::Rng;
use rand::seq::SliceRandom;
use std::ops::Range;

/// A nonzero codeword found in one iteration, in original column order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Candidate {
    pub weight: usize,
    pub bits: BitVec,
}

/// Per-worker scratch state for one information-set iteration.
///
/// Each iteration draws a column permutation, brings the permuted generator into systematic
/// form `[I_k | R]` and enumerates sums of up to `p` systematic rows.
pub(crate) struct InformationSet<'life> {
    generator: &'life BitMatrix,
    permutation: Vec<usize>,
    enumeration_weight: usize,
    window: Range<usize>,
    window_threshold: usize,
}

impl<'life> InformationSet<'life> {
    pub fn new(generator: &'life BitMatrix, parameters: &SearchParameters) -> Self {
        let (dimension, length) = generator.shape();
        let window_end = dimension + parameters.window_size.min(length - dimension);
        Self {
            generator,
            permutation: (0..length).collect(),
            enumeration_weight: parameters.enumeration_weight.min(dimension),
            window: dimension..window_end,
            window_threshold: parameters.window_threshold,
        }
    }

    /// Runs one iteration and returns its lightest candidate if it weighs less than `bound`.
    ///
    /// The random draws depend only on `rng`, never on `bound`, so a worker replays the same
    /// information sets for the same seed.
    pub fn iterate<R: Rng>(&mut self, rng: &mut R, bound: usize) -> Option<Candidate> {
        self.permutation.shuffle(rng);
        let mut systematic = self.generator.permuted_columns(&self.permutation);
        if !self.make_systematic(&mut systematic) {
            return None;
        }
        let mut best: Option<(usize, BitVec)> = None;
        let mut best_weight = bound;
        let mut partial_sums = vec![BitVec::zeros(systematic.column_count()); self.enumeration_weight + 1];
        self.extend(&systematic, 0, 1, &mut partial_sums, &mut best_weight, &mut best);
        best.map(|(weight, bits)| Candidate {
            weight,
            bits: bits.scatter(&self.permutation, bits.len()),
        })
    }

    /// Gauss-Jordan elimination turning the first `k` columns into an identity block.
    ///
    /// When column `i` has no pivot among the remaining rows, a later column with one is swapped
    /// in and the permutation updated, so a full-rank generator always completes.
    fn make_systematic(&mut self, matrix: &mut BitMatrix) -> bool {
        let (dimension, length) = matrix.shape();
        for row_index in 0..dimension {
            let pivot = (row_index..length).find_map(|column_index| {
                (row_index..dimension)
                    .find(|&candidate| matrix.get((candidate, column_index)))
                    .map(|pivot_row| (pivot_row, column_index))
            });
            let Some((pivot_row, column_index)) = pivot else {
                return false;
            };
            if column_index != row_index {
                trace!("reselecting pivot: column {column_index} replaces column {row_index}");
                matrix.swap_columns(row_index, column_index);
                self.permutation.swap(row_index, column_index);
            }
            matrix.swap_rows(pivot_row, row_index);
            matrix.clear_column_except(row_index, row_index);
        }
        true
    }

    /// Depth-first enumeration of row subsets `{r_1 < ... < r_depth}` with incremental sums.
    ///
    /// Single rows are always evaluated; larger sums only when their window weight is at most
    /// the threshold.
    fn extend(
        &self,
        systematic: &BitMatrix,
        first_row: usize,
        depth: usize,
        partial_sums: &mut [BitVec],
        best_weight: &mut usize,
        best: &mut Option<(usize, BitVec)>,
    ) {
        for row_index in first_row..systematic.row_count() {
            let (prefix, rest) = partial_sums.split_at_mut(depth);
            let sum = &mut rest[0];
            sum.assign(&prefix[depth - 1]);
            systematic.add_row_to(row_index, sum);

            if depth == 1 || sum.weight_in(self.window.clone()) <= self.window_threshold {
                let weight = sum.weight();
                if weight < *best_weight {
                    *best_weight = weight;
                    *best = Some((weight, sum.clone()));
                }
            }
            if depth < self.enumeration_weight {
                self.extend(systematic, row_index + 1, depth + 1, partial_sums, best_weight, best);
            }
        }
    }
}
