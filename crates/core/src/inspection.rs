use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Who inspected what, where and when. Shown in the report header and
/// signature block; the analysis never reads it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectionInfo {
    pub date: Option<NaiveDate>,
    pub location: String,
    pub responsible_name: String,
    pub responsible_role: String,
    /// Professional registration number of the responsible engineer
    pub registration: String,
    /// Technical responsibility record (ART) number
    pub art: String,
}

impl InspectionInfo {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.location.is_empty()
            && self.responsible_name.is_empty()
            && self.responsible_role.is_empty()
            && self.registration.is_empty()
            && self.art.is_empty()
    }
}

/// Photo attached to a survey. Only metadata lives here; image bytes are
/// handed to the renderer separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachedPhoto {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}
