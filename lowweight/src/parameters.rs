//! Read-only run configuration.
//!
//! Values come from a TOML file and/or the command line; the search core only ever borrows them.

use crate::error::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Tuning knobs of [`LowWeightSearch`](crate::LowWeightSearch).
///
/// ```
/// use lowweight::SearchParameters;
///
/// let parameters: SearchParameters = toml::from_str("iterations = 50\ntarget_weight = 12").unwrap();
/// assert_eq!(parameters.iterations, 50);
/// assert_eq!(parameters.target_weight, Some(12));
/// assert_eq!(parameters.enumeration_weight, SearchParameters::default().enumeration_weight);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchParameters {
    /// Total number of information sets tried, across all workers.
    pub iterations: u64,
    /// Largest number of systematic rows combined per candidate (`p`).
    pub enumeration_weight: usize,
    /// Number of redundancy columns in the filtering window (`w`).
    pub window_size: usize,
    /// Largest window weight a multi-row combination may have to be fully evaluated.
    pub window_threshold: usize,
    /// Stop as soon as a codeword of at most this weight is found.
    pub target_weight: Option<usize>,
    /// Size of the thread pool each search builds, capped by `iterations`.
    pub threads: usize,
    pub seed: Option<u64>,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self {
            iterations: 1000,
            enumeration_weight: 2,
            window_size: 20,
            window_threshold: 0,
            target_weight: None,
            threads: rayon::current_num_threads(),
            seed: None,
        }
    }
}

impl SearchParameters {
    pub fn validate(&self) -> Result<()> {
        if self.iterations == 0 {
            return Err(Error::Config("iterations must be positive".to_string()));
        }
        if self.enumeration_weight == 0 {
            return Err(Error::Config("enumeration weight must be positive".to_string()));
        }
        if self.threads == 0 {
            return Err(Error::Config("thread count must be positive".to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub fn with_iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }

    #[must_use]
    pub fn with_enumeration_weight(mut self, enumeration_weight: usize) -> Self {
        self.enumeration_weight = enumeration_weight;
        self
    }

    #[must_use]
    pub fn with_window(mut self, window_size: usize, window_threshold: usize) -> Self {
        self.window_size = window_size;
        self.window_threshold = window_threshold;
        self
    }

    #[must_use]
    pub fn with_target_weight(mut self, target_weight: Option<usize>) -> Self {
        self.target_weight = target_weight;
        self
    }

    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }
}

/// Everything a run needs: where the generator lives, which columns to force to zero and how to
/// search.
///
/// ```
/// use lowweight::Parameters;
///
/// let parameters = Parameters::from_toml_str(
///     r#"
///     code_matrix_file = "sha1me.cm"
///     force_zero_last = 32
///
///     [search]
///     iterations = 100
///     "#,
/// )
/// .unwrap();
/// assert_eq!(parameters.forced_columns(1920).unwrap().len(), 32);
/// assert_eq!(parameters.search.iterations, 100);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Parameters {
    pub code_matrix_file: Option<PathBuf>,
    /// Explicit columns to force to zero.
    pub force_zero: Vec<usize>,
    /// Number of trailing columns to force to zero.
    pub force_zero_last: usize,
    pub search: SearchParameters,
}

impl Parameters {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// The sorted, deduplicated union of `force_zero` and the last `force_zero_last` columns of a
    /// length-`length` code.
    pub fn forced_columns(&self, length: usize) -> Result<Vec<usize>> {
        if self.force_zero_last > length {
            return Err(Error::Config(format!(
                "cannot force the last {} columns of a length-{length} code",
                self.force_zero_last
            )));
        }
        let mut forced: BTreeSet<usize> = self.force_zero.iter().copied().collect();
        forced.extend(length - self.force_zero_last..length);
        Ok(forced.into_iter().collect())
    }
}
