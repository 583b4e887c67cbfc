//! Layer - Epigenomic evidence at the ATF1 locus
//!
//! Four assay layers describe the chromatin state of the suspected flux
//! bottleneck in the Ehrlich pathway:
//!
//! - ATAC-seq: chromatin accessibility vs. the upstream enzymes
//! - ChIP-seq: nucleosome density and histone marks
//! - Hi-C: compartment and looping
//! - RNA-seq: expression under brewing conditions
//!
//! Serialized key order follows field order, so the JSON sent to the model is
//! stable across runs.

use serde::{Deserialize, Serialize};

use crate::domain::errors::ConvergenceError;
use crate::domain::value_objects::{GeneRole, MarkType};

/// All four assay layers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerData {
    #[serde(rename = "ATAC-seq")]
    pub atac_seq: AtacSeqLayer,
    #[serde(rename = "ChIP-seq")]
    pub chip_seq: ChipSeqLayer,
    #[serde(rename = "Hi-C")]
    pub hi_c: HiCLayer,
    #[serde(rename = "RNA-seq")]
    pub rna_seq: RnaSeqLayer,
}

/// Chromatin accessibility
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtacSeqLayer {
    pub metric: String,
    pub value: u32,
    pub unit: String,
    pub comparison: Vec<AccessibilityComparison>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessibilityComparison {
    pub gene: String,
    pub pct: u32,
    pub role: GeneRole,
}

/// Chromatin marks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChipSeqLayer {
    pub marks: Vec<HistoneMark>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoneMark {
    pub name: String,
    pub value: f64,
    pub baseline: f64,
    #[serde(rename = "type")]
    pub mark_type: MarkType,
}

/// Chromatin topology
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HiCLayer {
    pub metrics: Vec<TopologyMetric>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopologyMetric {
    pub name: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Gene expression
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RnaSeqLayer {
    pub condition: String,
    pub genes: Vec<GeneExpression>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneExpression {
    pub gene: String,
    pub tpm: u32,
}

impl AccessibilityComparison {
    fn new(gene: &str, pct: u32, role: GeneRole) -> Self {
        Self {
            gene: gene.to_string(),
            pct,
            role,
        }
    }
}

impl HistoneMark {
    fn new(name: &str, value: f64, mark_type: MarkType) -> Self {
        Self {
            name: name.to_string(),
            value,
            baseline: 1.0,
            mark_type,
        }
    }
}

impl TopologyMetric {
    fn new(name: &str, value: &str, detail: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            value: value.to_string(),
            detail: detail.map(|d| d.to_string()),
        }
    }
}

impl GeneExpression {
    fn new(gene: &str, tpm: u32) -> Self {
        Self {
            gene: gene.to_string(),
            tpm,
        }
    }
}

impl LayerData {
    /// Evidence collected at the ATF1 promoter in mid-brew S. cerevisiae
    pub fn atf1_locus() -> Self {
        Self {
            atac_seq: AtacSeqLayer {
                metric: "Accessibility".to_string(),
                value: 6,
                unit: "% open chromatin".to_string(),
                comparison: vec![
                    AccessibilityComparison::new("BAT2", 93, GeneRole::Upstream),
                    AccessibilityComparison::new("ARO10", 78, GeneRole::Upstream),
                    AccessibilityComparison::new("ADH6", 69, GeneRole::Upstream),
                    AccessibilityComparison::new("ATF1", 6, GeneRole::Bottleneck),
                ],
            },
            chip_seq: ChipSeqLayer {
                marks: vec![
                    HistoneMark::new("Nucleosome density", 3.2, MarkType::Repressive),
                    HistoneMark::new("H3K4me3", 0.6, MarkType::Active),
                    HistoneMark::new("H3K9ac", 0.5, MarkType::Active),
                    HistoneMark::new("H4K16ac", 0.4, MarkType::Active),
                ],
            },
            hi_c: HiCLayer {
                metrics: vec![
                    TopologyMetric::new("Compartment", "B", Some("Inactive")),
                    TopologyMetric::new("PC1 Score", "-0.42", None),
                    TopologyMetric::new("Enhancer Loops", "0", Some("None detected")),
                ],
            },
            rna_seq: RnaSeqLayer {
                condition: "Glucose-limited anaerobic (mid-brew)".to_string(),
                genes: vec![
                    GeneExpression::new("BAT2", 842),
                    GeneExpression::new("ARO10", 624),
                    GeneExpression::new("ADH6", 389),
                    GeneExpression::new("ATF1", 23),
                ],
            },
        }
    }

    /// Gene flagged as the bottleneck in the accessibility comparison
    pub fn bottleneck_gene(&self) -> Option<&str> {
        self.atac_seq
            .comparison
            .iter()
            .find(|c| c.role == GeneRole::Bottleneck)
            .map(|c| c.gene.as_str())
    }

    /// Compact JSON, as embedded in the user message
    pub fn to_compact_json(&self) -> Result<String, ConvergenceError> {
        serde_json::to_string(self).map_err(|e| ConvergenceError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layers_serialize_in_assay_order() {
        let json = LayerData::atf1_locus().to_compact_json().unwrap();

        let atac = json.find("\"ATAC-seq\"").unwrap();
        let chip = json.find("\"ChIP-seq\"").unwrap();
        let hic = json.find("\"Hi-C\"").unwrap();
        let rna = json.find("\"RNA-seq\"").unwrap();
        assert!(atac < chip && chip < hic && hic < rna);
        assert!(json.starts_with(
            r#"{"ATAC-seq":{"metric":"Accessibility","value":6,"unit":"% open chromatin","comparison":[{"gene":"BAT2","pct":93,"role":"Upstream"}"#
        ));
    }

    #[test]
    fn test_marks_keep_float_baseline_and_type() {
        let json = LayerData::atf1_locus().to_compact_json().unwrap();
        assert!(json.contains(
            r#"{"name":"Nucleosome density","value":3.2,"baseline":1.0,"type":"repressive"}"#
        ));
        assert!(json.contains(r#"{"name":"H4K16ac","value":0.4,"baseline":1.0,"type":"active"}"#));
    }

    #[test]
    fn test_absent_detail_is_omitted() {
        let json = LayerData::atf1_locus().to_compact_json().unwrap();
        assert!(json.contains(r#"{"name":"PC1 Score","value":"-0.42"}"#));
        assert!(json.contains(
            r#"{"name":"Enhancer Loops","value":"0","detail":"None detected"}"#
        ));
    }

    #[test]
    fn test_bottleneck_is_atf1() {
        let data = LayerData::atf1_locus();
        assert_eq!(data.bottleneck_gene(), Some("ATF1"));
    }

    #[test]
    fn test_active_marks_are_depleted() {
        let data = LayerData::atf1_locus();
        let active: Vec<_> = data
            .chip_seq
            .marks
            .iter()
            .filter(|m| m.mark_type == MarkType::Active)
            .collect();
        assert_eq!(active.len(), 3);
        assert!(active.iter().all(|m| m.value < m.baseline));
    }
}
