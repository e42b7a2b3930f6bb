// Reference electrode catalog (ASTM C876 threshold pairs)

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Reference half-cell the survey was measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Electrode {
    /// Copper/copper sulfate
    #[default]
    #[serde(rename = "CSE")]
    Cse,
    /// Saturated calomel
    #[serde(rename = "SCE")]
    Sce,
    /// Silver/silver chloride, 3M KCl
    #[serde(rename = "AgAgCl")]
    AgAgCl,
}

/// Catalog entry: display label plus the two ASTM C876 thresholds (mV).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElectrodeReference {
    pub electrode: Electrode,
    pub label: &'static str,
    pub severe_threshold_mv: f64,
    pub low_threshold_mv: f64,
}

/// Fixed lookup table from electrode identity to its threshold pair.
pub struct ElectrodeCatalog;

const CATALOG: [ElectrodeReference; 3] = [
    ElectrodeReference {
        electrode: Electrode::Cse,
        label: "Cu/CuSO4 (CSE)",
        severe_threshold_mv: -350.0,
        low_threshold_mv: -200.0,
    },
    ElectrodeReference {
        electrode: Electrode::Sce,
        label: "Saturated Calomel (SCE)",
        severe_threshold_mv: -260.0,
        low_threshold_mv: -110.0,
    },
    ElectrodeReference {
        electrode: Electrode::AgAgCl,
        label: "Ag/AgCl (3M KCl)",
        severe_threshold_mv: -305.0,
        low_threshold_mv: -155.0,
    },
];

impl ElectrodeCatalog {
    pub fn all() -> &'static [ElectrodeReference] {
        &CATALOG
    }

    pub fn reference(electrode: Electrode) -> &'static ElectrodeReference {
        match electrode {
            Electrode::Cse => &CATALOG[0],
            Electrode::Sce => &CATALOG[1],
            Electrode::AgAgCl => &CATALOG[2],
        }
    }

    /// Look up by catalog code (`CSE`, `SCE`, `AgAgCl`), case-insensitive.
    pub fn lookup(code: &str) -> Option<&'static ElectrodeReference> {
        code.parse::<Electrode>().ok().map(Self::reference)
    }
}

impl Electrode {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Cse => "CSE",
            Self::Sce => "SCE",
            Self::AgAgCl => "AgAgCl",
        }
    }

    pub fn reference(&self) -> &'static ElectrodeReference {
        ElectrodeCatalog::reference(*self)
    }
}

impl fmt::Display for Electrode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Electrode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cse" => Ok(Self::Cse),
            "sce" => Ok(Self::Sce),
            "agagcl" | "ag/agcl" => Ok(Self::AgAgCl),
            _ => Err(CoreError::UnknownElectrode(s.to_string())),
        }
    }
}
