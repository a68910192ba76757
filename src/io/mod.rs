//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - report/subset/dataset exports (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
