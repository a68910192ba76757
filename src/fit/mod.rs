//! Predictor selection.
//!
//! Responsibilities:
//!
//! - fit OLS on a feature subset and measure it (`fitter`, `criteria`)
//! - exhaustive all-subsets search ranked by Mallow's Cp (`exhaustive`)
//! - greedy forward selection by partial F-ratio (`forward`)

pub mod criteria;
pub mod exhaustive;
pub mod fitter;
pub mod forward;

pub use exhaustive::*;
pub use fitter::*;
pub use forward::*;
