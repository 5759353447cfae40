//! Rule-based field extractors for DTE documents.

pub mod amounts;
pub mod dates;
pub mod patterns;

pub use amounts::clean_amount;
pub use dates::parse_emission_timestamp;
pub use patterns::*;
