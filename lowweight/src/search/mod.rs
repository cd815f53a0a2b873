//! Randomized low-weight codeword search (Canteaut-Chabaud information set decoding).
//!
//! This is a heuristic. More iterations raise the chance of finding lighter codewords, but no
//! budget guarantees that the returned word has minimum weight.

mod information_set;
mod shared;

pub use shared::StopHandle;

use crate::code_matrix::CodeMatrix;
use crate::code_word::CodeWord;
use crate::error::{Error, Result};
use crate::parameters::SearchParameters;
use information_set::InformationSet;
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::ThreadPool;
use rayon::prelude::*;
use shared::SharedBest;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

/// How a finished search ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SearchStatus {
    /// The target weight was reached.
    Converged,
    /// The iteration budget was spent without reaching the target.
    Exhausted,
    /// A [`StopHandle`] ended the search early.
    Cancelled,
}

/// Lifecycle of a [`LowWeightSearch`], observable while a search runs.
///
/// The state belongs to the search instance, not to a call. It is only meaningful while at
/// most one call runs on the instance; concurrent calls should use separate instances.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum SearchState {
    Idle,
    Searching,
    Converged,
    Exhausted,
    Cancelled,
}

impl SearchState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => SearchState::Searching,
            2 => SearchState::Converged,
            3 => SearchState::Exhausted,
            4 => SearchState::Cancelled,
            _ => SearchState::Idle,
        }
    }
}

impl From<SearchStatus> for SearchState {
    fn from(status: SearchStatus) -> Self {
        match status {
            SearchStatus::Converged => SearchState::Converged,
            SearchStatus::Exhausted => SearchState::Exhausted,
            SearchStatus::Cancelled => SearchState::Cancelled,
        }
    }
}

/// Result of [`LowWeightSearch::canteaut_chabaud`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Lightest nonzero codeword found, with its coefficients over the generator rows.
    pub codeword: CodeWord,
    pub status: SearchStatus,
    /// Iterations actually run, summed over workers.
    pub iterations: u64,
}

/// Parallel low-weight codeword search.
///
/// Worker `t` of `T` runs the iterations `t, t + T, t + 2T, ...` below the budget with its own
/// RNG seeded from `seed + t` and its own working copy of the generator. Workers meet only in
/// a single best-so-far slot that is replaced when a strictly lighter word arrives. Each call
/// runs its workers on a dedicated pool of `min(threads, iterations)` threads.
///
/// # Example
///
/// ```
/// use lowweight::{CodeMatrix, LowWeightSearch, SearchParameters, SearchStatus};
///
/// let code = CodeMatrix::new("11100|01110|00111".parse().unwrap()).unwrap();
/// let parameters = SearchParameters::default()
///     .with_iterations(20)
///     .with_seed(Some(1))
///     .with_target_weight(Some(2));
/// let outcome = LowWeightSearch::new(parameters).canteaut_chabaud(&code).unwrap();
/// assert_eq!(outcome.codeword.hamming_weight(), 2);
/// assert_eq!(outcome.status, SearchStatus::Converged);
/// ```
#[derive(Debug)]
pub struct LowWeightSearch {
    parameters: SearchParameters,
    state: AtomicU8,
}

impl LowWeightSearch {
    #[must_use]
    pub fn new(parameters: SearchParameters) -> Self {
        Self {
            parameters,
            state: AtomicU8::new(SearchState::Idle as u8),
        }
    }

    /// State of the most recent search on this instance.
    #[must_use]
    pub fn state(&self) -> SearchState {
        SearchState::from_u8(self.state.load(Ordering::Acquire))
    }

    /// Searches `matrix` for a low-weight nonzero codeword.
    ///
    /// Fails with [`Error::NotFound`] when the code has dimension zero and with
    /// [`Error::Config`] for invalid parameters. Not reaching the target weight is reported
    /// through [`SearchStatus::Exhausted`], not as an error. `matrix` is only read.
    pub fn canteaut_chabaud(&self, matrix: &CodeMatrix) -> Result<SearchOutcome> {
        self.canteaut_chabaud_until(matrix, &StopHandle::default())
    }

    /// Like [`canteaut_chabaud`](LowWeightSearch::canteaut_chabaud), but ends with
    /// [`SearchStatus::Cancelled`] once `stop` is triggered.
    ///
    /// Every worker finishes at least one iteration, so a cancelled search still returns a
    /// codeword. A triggered handle stays triggered; later calls need a fresh one.
    pub fn canteaut_chabaud_until(&self, matrix: &CodeMatrix, stop: &StopHandle) -> Result<SearchOutcome> {
        self.parameters.validate()?;
        if matrix.dimension() == 0 {
            return Err(Error::NotFound);
        }

        let budget = self.parameters.iterations;
        let workers = usize::try_from(budget)
            .map_or(self.parameters.threads, |budget| budget.min(self.parameters.threads));
        let pool = worker_pool(workers)?;
        self.set_state(SearchState::Searching);
        let seed = self.parameters.seed.unwrap_or_else(rand::random);
        let target = self.parameters.target_weight;
        info!(
            "searching {}x{} code: p={}, w={}, budget={budget}, workers={workers}, seed={seed}",
            matrix.dimension(),
            matrix.length(),
            self.parameters.enumeration_weight,
            self.parameters.window_size
        );

        let best = SharedBest::new();
        let completed = AtomicU64::new(0);
        pool.install(|| {
            (0..workers).into_par_iter().for_each(|worker| {
                self.run_worker(matrix, worker, workers, seed, stop, &best, &completed);
            });
        });

        let iterations = completed.into_inner();
        let Some(candidate) = best.into_inner() else {
            self.set_state(SearchState::Idle);
            return Err(Error::NotFound);
        };
        let status = if target.is_some_and(|target| candidate.weight <= target) {
            SearchStatus::Converged
        } else if iterations < budget && stop.is_stopped() {
            SearchStatus::Cancelled
        } else {
            SearchStatus::Exhausted
        };
        let codeword = CodeWord::from_bits(matrix, candidate.bits)?;
        info!(
            "search {status:?} after {iterations} iterations: weight {}",
            codeword.hamming_weight()
        );
        self.set_state(status.into());
        Ok(SearchOutcome {
            codeword,
            status,
            iterations,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn run_worker(
        &self,
        matrix: &CodeMatrix,
        worker: usize,
        workers: usize,
        seed: u64,
        stop: &StopHandle,
        best: &SharedBest,
        completed: &AtomicU64,
    ) {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(worker as u64));
        let mut information_set = InformationSet::new(matrix.generator(), &self.parameters);
        let mut local_weight = usize::MAX;
        let mut iteration = worker as u64;
        while iteration < self.parameters.iterations {
            if let Some(candidate) = information_set.iterate(&mut rng, local_weight) {
                local_weight = candidate.weight;
                let weight = candidate.weight;
                if best.offer(candidate) {
                    debug!("worker {worker} improved global best to weight {weight} at iteration {iteration}");
                }
            }
            completed.fetch_add(1, Ordering::Relaxed);
            if stop.is_stopped() || self.target_reached(best.weight()) {
                break;
            }
            iteration += workers as u64;
        }
    }

    fn target_reached(&self, weight: usize) -> bool {
        self.parameters.target_weight.is_some_and(|target| weight <= target)
    }

    fn set_state(&self, state: SearchState) {
        self.state.store(state as u8, Ordering::Release);
    }
}

fn worker_pool(workers: usize) -> Result<ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|index| format!("lowweight-worker-{index}"))
        .build()
        .map_err(|error| Error::Config(format!("cannot start {workers} search threads: {error}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_has_one_thread_per_worker() {
        let pool = worker_pool(3).unwrap();
        assert_eq!(pool.current_num_threads(), 3);
        assert_eq!(pool.install(rayon::current_num_threads), 3);
    }
}
