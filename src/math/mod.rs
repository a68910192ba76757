//! Numerical building blocks: the OLS solver seam and combination enumeration.

pub mod combinations;
pub mod ols;

pub use combinations::*;
pub use ols::*;
