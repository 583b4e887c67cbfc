//! Domain Entities
//!
//! - Layer: epigenomic evidence at the ATF1 locus (four assays)
//! - Analysis: the model's structured convergence answer

mod analysis;
mod layer;

pub use analysis::*;
pub use layer::*;
