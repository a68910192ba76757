//! Synthetic regression datasets for demos and reproducible checks.

pub mod sample;

pub use sample::*;
