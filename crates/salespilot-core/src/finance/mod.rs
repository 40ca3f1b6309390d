//! Fee lookup and financial derivation.

mod derive;
mod fees;

pub use derive::Financials;
pub use fees::{FeeTable, ANY_TYPE};
