//! GeneRole - Position of a gene in the Ehrlich pathway

use serde::{Deserialize, Serialize};

/// Pathway role of a compared gene
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum GeneRole {
    Upstream,
    Bottleneck,
}
