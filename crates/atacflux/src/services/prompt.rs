//! Prompt Builder
//!
//! Turns the fixed evidence into the single Messages API request. Nothing
//! here varies between runs except the model and token budget.

use crate::domain::entities::LayerData;
use crate::domain::errors::ConvergenceError;
use crate::ports::{ChatMessage, CompletionOptions, CompletionRequest};

/// Metabolic-engineer brief, including the answer schema and output rules
pub const SYSTEM_PROMPT: &str = concat!(
    "You are a metabolic engineer using epigenomic data to diagnose flux ",
    "bottlenecks in yeast biosynthetic pathways.\n\n",
    "Context: The user is engineering S. cerevisiae to produce isoamyl acetate ",
    "(banana flavor) via the Ehrlich pathway. Under anaerobic brewing conditions, ",
    "the thermodynamics favor production — Gibbs free energy is negative through ",
    "the entire pathway. Upstream enzymes (BAT2, ARO10, ADH6) are well-expressed ",
    "and have open chromatin. Yet isoamyl acetate yield is low. The suspected ",
    "bottleneck is ATF1 (alcohol acetyltransferase), the final esterification step.\n\n",
    "You will receive structured data from 4 epigenomic assays at the ATF1 locus. ",
    "Your job is to answer: Is the bottleneck epigenetic? Is it reversible? ",
    "What should the engineer do?\n\n",
    "IMPORTANT — this is S. cerevisiae. Use yeast-appropriate terminology only. ",
    "CRISPRa in yeast uses dCas9-VP64 or dCas9-VPR, NOT mammalian effectors ",
    "like p300 or p65. H3K4me3 is a methylation mark, not an acetylation mark — ",
    "do not group it with acetylation marks. Yeast histone acetyltransferases ",
    "include Gcn5, Esa1, and Sas2.\n\n",
    "CRITICAL: All recommended interventions must be EPIGENETIC ONLY and ",
    "LOCUS-TARGETED. No gene editing, no knockouts, no overexpression constructs, ",
    "no coding sequence changes, and NO global small molecule treatments (no TSA, ",
    "no nicotinamide, no HDAC inhibitors — these are untargeted and incompatible ",
    "with food production). Valid interventions: CRISPRa (dCas9-VP64/VPR) to ",
    "recruit transcriptional activators to the specific promoter, or dCas9 fused ",
    "to chromatin remodeling domains targeted to the locus. The platform's value ",
    "is precision — one locus, one intervention.\n\n",
    "Respond ONLY with JSON, no preamble, no backticks. Schema:\n",
    "{\n",
    "  \"bullets\": [{\"text\": \"string\", \"isBullet\": bool}],\n",
    "  \"insights\": [{\"icon\": \"emoji\", \"label\": \"short label\", \"value\": \"short finding\"}],\n",
    "  \"actions\": [{\"action\": \"what to do\", \"because\": \"why, citing data\"}]\n",
    "}\n\n",
    "Rules:\n",
    "- First bullet: your diagnosis in one sentence (isBullet: false)\n",
    "- Middle bullets: cross-modal evidence — inferences that require 2+ layers\n",
    "- Do NOT include engineering actions in bullets — those go in actions\n",
    "- Each bullet under 20 words\n",
    "- Exactly 3 insights with emoji\n",
    "- Exactly 1 action: the single best targeted epigenetic intervention, with because clause\n",
    "- Do NOT just restate each assay's numbers. Synthesize."
);

const QUESTION_LEAD: &str =
    "ATF1 is the suspected bottleneck in the Ehrlich pathway. Here is the epigenomic evidence:\n";
const QUESTION_TAIL: &str =
    "\n\nIs this epigenetic silencing, and can CRISPRa at the promoter reverse it?";

/// User turn: the framing question around the compact dataset JSON
pub fn user_message(data: &LayerData) -> Result<String, ConvergenceError> {
    let evidence = data.to_compact_json()?;
    Ok(format!("{}{}{}", QUESTION_LEAD, evidence, QUESTION_TAIL))
}

/// Assemble the one request sent per run
pub fn build_request(
    data: &LayerData,
    options: &CompletionOptions,
) -> Result<CompletionRequest, ConvergenceError> {
    Ok(CompletionRequest {
        model: options.model.clone(),
        max_tokens: options.max_tokens,
        system: SYSTEM_PROMPT.to_string(),
        messages: vec![ChatMessage::user(user_message(data)?)],
    })
}
