//! Low-weight codeword search in binary linear codes.
//!
//! A code is given by its generator matrix ([`CodeMatrix`]). Coordinates can be forced to zero
//! by [`CodeMatrix::code_shortening`], and [`LowWeightSearch`] then looks for light nonzero
//! codewords with the Canteaut-Chabaud variant of information set decoding. The result is a
//! [`CodeWord`] carrying both its expanded bits and the generator rows that sum to it.
//!
//! ```
//! use lowweight::{CodeMatrix, LowWeightSearch, SearchParameters};
//!
//! let code = CodeMatrix::new("1100|0011".parse().unwrap()).unwrap();
//! let shortened = code.code_shortening(&[3]).unwrap();
//! let parameters = SearchParameters::default().with_iterations(4).with_seed(Some(0));
//! let outcome = LowWeightSearch::new(parameters).canteaut_chabaud(&shortened).unwrap();
//! assert_eq!(outcome.codeword.to_string(), "110");
//! ```

pub mod error;
pub use error::{Error, Result};

mod code_matrix;
pub use code_matrix::{CodeMatrix, retained_columns};

mod code_word;
pub use code_word::{CodeWord, WordWidth};

mod parameters;
pub use parameters::{Parameters, SearchParameters};

mod search;
pub use search::{LowWeightSearch, SearchOutcome, SearchState, SearchStatus, StopHandle};

pub mod expansion;
