//! `regsel` library crate.
//!
//! The binary (`regsel`) is a thin wrapper around this library so that:
//!
//! - the selection searches are testable without spawning processes
//! - the OLS solver can be swapped behind a trait
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod report;
