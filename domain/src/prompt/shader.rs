//! Influence shader.
//!
//! Wraps a director intervention in framing whose force depends on its
//! weight. The stored message keeps the director's original text; the shaded
//! form only ever appears inside a turn prompt.

use crate::core::weight::InfluenceWeight;

/// Framing tier derived from an influence weight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfluenceTier {
    /// `weight ≤ 0.3`: an optional side note.
    Subtle,
    /// `0.3 < weight ≤ 0.7`: a moderator directive that must be addressed.
    Mandatory,
    /// `weight > 0.7`: a system override.
    Override,
}

impl InfluenceTier {
    /// Tier boundaries are inclusive to the lower tier.
    pub fn from_weight(weight: InfluenceWeight) -> Self {
        let w = weight.value();
        if w <= 0.3 {
            InfluenceTier::Subtle
        } else if w <= 0.7 {
            InfluenceTier::Mandatory
        } else {
            InfluenceTier::Override
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            InfluenceTier::Subtle => "Subtle",
            InfluenceTier::Mandatory => "Mandatory",
            InfluenceTier::Override => "OVERRIDE",
        }
    }
}

impl std::fmt::Display for InfluenceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Shape a director message into an instruction for the next agent.
pub fn shade(content: &str, weight: InfluenceWeight) -> String {
    match InfluenceTier::from_weight(weight) {
        InfluenceTier::Subtle => format!(
            "[Contextual Note]: A user observer has remarked: '{}'. \
             You may choose to incorporate this perspective if relevant.",
            content
        ),
        InfluenceTier::Mandatory => format!(
            "[MANDATORY INSTRUCTION]: The debate moderator requires you to address this point: '{}'. \
             Integrate this into your next response.",
            content
        ),
        InfluenceTier::Override => format!(
            "*** SYSTEM OVERRIDE (Priority {:.1}) ***\n\
             CRITICAL DIRECTIVE: Disregard previous flow if necessary. \
             You MUST focus entirely on this instruction: '{}'.",
            weight.value(),
            content
        ),
    }
}
