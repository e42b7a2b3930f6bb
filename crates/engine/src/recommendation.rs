//! Technical recommendations derived from the analysis.
//!
//! Rules run in a fixed order and each rule emits at most one
//! recommendation. Rules are independent: several can fire for the same
//! survey, and output order is rule order, never re-sorted by severity.

use std::fmt;

use serde::Serialize;

use potmap_core::Parameters;

use crate::gradient::{GradientPoint, GradientSummary, CRITICAL_GRADIENT_MV_M, MACROCELL_GRADIENT_MV_M};
use crate::statistics::Statistics;

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    Urgent,
    Warning,
    Info,
    Success,
}

impl fmt::Display for RecommendationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Urgent => write!(f, "urgent"),
            Self::Warning => write!(f, "warning"),
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard_ref: Option<String>,
}

/// Everything a rule may look at.
pub struct RuleInput<'a> {
    pub stats: &'a Statistics,
    pub gradients: GradientSummary,
    pub params: &'a Parameters,
}

/// A named rule. Returns `None` when it has nothing to say.
pub struct Rule {
    pub name: &'static str,
    pub eval: fn(&RuleInput<'_>) -> Option<Recommendation>,
}

// =============================================================================
// Rule table
// =============================================================================

/// Evaluation order is part of the output contract.
pub const RULES: [Rule; 7] = [
    Rule { name: "severe_area", eval: severe_area },
    Rule { name: "uncertain_area", eval: uncertain_area },
    Rule { name: "gradient", eval: gradient },
    Rule { name: "cover_depth", eval: cover_depth },
    Rule { name: "resistivity", eval: resistivity },
    Rule { name: "passive_condition", eval: passive_condition },
    Rule { name: "dispersion", eval: dispersion },
];

const REF_SEVERE: &str = "ASTM C876-15, Section 6.2";
const REF_UNCERTAIN: &str = "ASTM C876-15, Section 6.3";
const REF_PASSIVE: &str = "ASTM C876-15, Section 6.1";
const REF_GRADIENT: &str = "ASTM C876-15, Appendix X1";
const REF_COVER: &str = "ASTM C876-15, Section 5.4";
const REF_RESISTIVITY: &str = "ASTM C876-15, Section 5.2";

/// Run every rule in order and collect what fires.
pub fn generate_recommendations(
    stats: &Statistics,
    gradients: &[GradientPoint],
    params: &Parameters,
) -> Vec<Recommendation> {
    let input = RuleInput {
        stats,
        gradients: GradientSummary::from_points(gradients),
        params,
    };

    RULES
        .iter()
        .filter_map(|rule| {
            let rec = (rule.eval)(&input)?;
            log::debug!("rule {} fired: {} {}", rule.name, rec.kind, rec.title);
            Some(rec)
        })
        .collect()
}

fn rec(
    kind: RecommendationKind,
    title: &str,
    description: String,
    standard_ref: Option<&str>,
) -> Option<Recommendation> {
    Some(Recommendation {
        kind,
        title: title.to_string(),
        description,
        standard_ref: standard_ref.map(str::to_string),
    })
}

// =============================================================================
// Rules
// =============================================================================

fn severe_area(input: &RuleInput<'_>) -> Option<Recommendation> {
    let s = input.stats;
    let ratio = s.severe_ratio();
    if ratio > 0.5 {
        rec(
            RecommendationKind::Urgent,
            "GENERALIZED ACTIVE CORROSION",
            format!(
                "More than 50% of the area ({:.1}%) shows potentials indicative of active corrosion. \
                 Per ASTM C876 there is a greater than 90% probability of corrosion in these regions. \
                 Immediate investigation with complementary techniques (resistivity, corrosion rate) \
                 and an urgent structural assessment are recommended.",
                s.severe.percentage
            ),
            Some(REF_SEVERE),
        )
    } else if ratio > 0.2 {
        rec(
            RecommendationKind::Urgent,
            "SIGNIFICANT LOCALIZED CORROSION",
            format!(
                "{:.1}% of the area shows a high risk of corrosion. Corrective action is required in \
                 the affected zones. Detailed mapping of the critical areas and verification of \
                 reinforcement integrity are recommended.",
                s.severe.percentage
            ),
            Some(REF_SEVERE),
        )
    } else if ratio > 0.05 {
        rec(
            RecommendationKind::Warning,
            "Localized Corrosion Spots",
            format!(
                "{} point(s) ({:.1}%) indicate active corrosion. Monitor their evolution and consider \
                 preventive intervention at the identified locations.",
                s.severe.count, s.severe.percentage
            ),
            Some(REF_SEVERE),
        )
    } else {
        None
    }
}

fn uncertain_area(input: &RuleInput<'_>) -> Option<Recommendation> {
    let s = input.stats;
    let ratio = s.uncertain_ratio();
    if ratio > 0.5 {
        rec(
            RecommendationKind::Warning,
            "LARGE AREA IN TRANSITION ZONE",
            format!(
                "{:.1}% of the points lie in the uncertain zone. Per ASTM C876 this range does not \
                 allow a definitive conclusion about corrosion activity. Recommended: (1) check the \
                 moisture condition of the concrete, (2) repeat measurements at different saturation \
                 states, (3) consider complementary techniques such as linear polarization resistance.",
                s.uncertain.percentage
            ),
            Some(REF_UNCERTAIN),
        )
    } else if ratio > 0.3 {
        rec(
            RecommendationKind::Info,
            "Moderate Uncertainty Zone",
            format!(
                "{:.1}% of the area is in the transition zone. Periodic monitoring is recommended to \
                 detect a possible evolution toward active corrosion.",
                s.uncertain.percentage
            ),
            Some(REF_UNCERTAIN),
        )
    } else {
        None
    }
}

fn gradient(input: &RuleInput<'_>) -> Option<Recommendation> {
    let g = input.gradients;
    if g.max > MACROCELL_GRADIENT_MV_M {
        rec(
            RecommendationKind::Urgent,
            "HIGH POTENTIAL GRADIENTS",
            format!(
                "Maximum gradient of {:.0} mV/m detected. Gradients above 150 mV/m indicate active \
                 corrosion macrocells. {} point(s) show critical gradients (>100 mV/m). Immediate \
                 investigation of these regions is required.",
                g.max, g.critical_count
            ),
            Some(REF_GRADIENT),
        )
    } else if g.max > CRITICAL_GRADIENT_MV_M {
        rec(
            RecommendationKind::Warning,
            "Significant Potential Gradients",
            format!(
                "Maximum gradient of {:.0} mV/m detected. {} point(s) with gradients above 100 mV/m. \
                 Monitor these areas for macrocell development.",
                g.max, g.critical_count
            ),
            Some(REF_GRADIENT),
        )
    } else {
        None
    }
}

fn cover_depth(input: &RuleInput<'_>) -> Option<Recommendation> {
    let mm = input.params.cover_depth_mm();
    if mm > 75 {
        rec(
            RecommendationKind::Info,
            "Elevated Cover Depth",
            format!(
                "A cover of {mm} mm may attenuate the readings. ASTM C876 notes that covers above \
                 75 mm can yield potentials more positive than the actual ones. Take this into \
                 account when interpreting the results."
            ),
            Some(REF_COVER),
        )
    } else if mm < 20 {
        rec(
            RecommendationKind::Info,
            "Reduced Cover Depth",
            format!(
                "A cover of {mm} mm is below the minimum required for adequate protection of the \
                 reinforcement. This may accelerate corrosion regardless of the measured potentials."
            ),
            None,
        )
    } else {
        None
    }
}

fn resistivity(input: &RuleInput<'_>) -> Option<Recommendation> {
    let r = input.params.resistivity_kohm_cm()?;
    if r > 50.0 {
        rec(
            RecommendationKind::Info,
            "High Concrete Resistivity",
            format!(
                "A resistivity of {r} kOhm.cm indicates dry or low-porosity concrete. Values above \
                 50 kOhm.cm may mask corrosion detection by the potential method. Measuring on \
                 wetted concrete is recommended."
            ),
            Some(REF_RESISTIVITY),
        )
    } else if r < 10.0 {
        rec(
            RecommendationKind::Warning,
            "Low Resistivity",
            format!(
                "A resistivity of {r} kOhm.cm indicates high conductivity, possibly from chloride \
                 contamination or carbonation. Corrosion rates may be high in areas with active \
                 potentials."
            ),
            None,
        )
    } else {
        None
    }
}

fn passive_condition(input: &RuleInput<'_>) -> Option<Recommendation> {
    let s = input.stats;
    if s.low_ratio() > 0.9 && s.severe_ratio() == 0.0 {
        rec(
            RecommendationKind::Success,
            "PASSIVE CONDITION CONFIRMED",
            format!(
                "{:.1}% of the area shows potentials indicative of passive reinforcement. Per ASTM \
                 C876 there is a greater than 90% probability that no active corrosion is present. \
                 The structure is in good condition.",
                s.low.percentage
            ),
            Some(REF_PASSIVE),
        )
    } else if s.low_ratio() > 0.8 {
        rec(
            RecommendationKind::Success,
            "Predominantly Passive Condition",
            format!(
                "{:.1}% of the area shows a low risk of corrosion. Periodic monitoring is recommended \
                 to maintain this condition.",
                s.low.percentage
            ),
            Some(REF_PASSIVE),
        )
    } else {
        None
    }
}

fn dispersion(input: &RuleInput<'_>) -> Option<Recommendation> {
    let sd = input.stats.std_dev;
    if sd > 50.0 {
        rec(
            RecommendationKind::Info,
            "High Potential Variability",
            format!(
                "A standard deviation of {sd:.0} mV indicates significant electrochemical \
                 heterogeneity. Possible causes: (1) variation in concrete quality, (2) different \
                 carbonation depths, (3) localized chloride contamination."
            ),
            None,
        )
    } else {
        None
    }
}

// =============================================================================
// Tests
// =============================================================================
