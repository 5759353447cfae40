//! Table normalization: raw extracted grids to canonical line items.

mod frame;
mod normalizer;
mod numeric;

pub use frame::Frame;
pub use normalizer::{clean_header_row, TableNormalizer};
pub use numeric::clean_numeric_columns;
