mod bitmatrix;
mod echelon;

pub use bitmatrix::BitMatrix;
pub use echelon::{EchelonForm, complement};
