//! One-sentence overall verdict.

use serde::Serialize;

use crate::statistics::Statistics;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpretationTier {
    /// Severe band covers more than half the area
    Critical,
    /// Severe band covers more than a fifth
    AttentionRequired,
    /// Low band covers more than 80%
    Satisfactory,
    Intermediate,
}

impl InterpretationTier {
    pub fn headline(&self) -> &'static str {
        match self {
            Self::Critical => "CRITICAL CONDITION",
            Self::AttentionRequired => "ATTENTION REQUIRED",
            Self::Satisfactory => "SATISFACTORY CONDITION",
            Self::Intermediate => "INTERMEDIATE CONDITION",
        }
    }

    pub fn detail(&self) -> &'static str {
        match self {
            Self::Critical => {
                "The analysis indicates generalized active corrosion in the inspected structure."
            }
            Self::AttentionRequired => {
                "Significant localized corrosion detected. Intervention recommended."
            }
            Self::Satisfactory => "Structure predominantly in a passive state.",
            Self::Intermediate => "Continued monitoring recommended.",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interpretation {
    pub tier: InterpretationTier,
    pub text: String,
}

/// Tiers are checked in priority order; the first that holds wins.
pub fn interpret(stats: &Statistics) -> Interpretation {
    let tier = if stats.severe_ratio() > 0.5 {
        InterpretationTier::Critical
    } else if stats.severe_ratio() > 0.2 {
        InterpretationTier::AttentionRequired
    } else if stats.low_ratio() > 0.8 {
        InterpretationTier::Satisfactory
    } else {
        InterpretationTier::Intermediate
    };

    Interpretation {
        tier,
        text: format!("{}: {}", tier.headline(), tier.detail()),
    }
}
