//! MarkType - Direction of a chromatin mark's effect on transcription

use serde::{Deserialize, Serialize};

/// Chromatin mark classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MarkType {
    Repressive,
    Active,
}
