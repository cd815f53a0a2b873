//! Word-packed bit vectors and bit matrices over GF(2).
//!
//! [`BitMatrix`] stores each row as a run of 64-bit words so that row additions, swaps and
//! weight computations touch `columns / 64` words. [`EchelonForm`] keeps the row transform of
//! a Gauss-Jordan reduction so that row-space membership questions can be answered with the
//! original combination coefficients.

pub mod error;
pub use error::{Error, Result};

pub mod vec;
pub use vec::{BitVec, WORD_BITS, Word};

pub mod matrix;
pub use matrix::{BitMatrix, EchelonForm, complement};
