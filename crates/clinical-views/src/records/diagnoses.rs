use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{RecordId, StaffRef};

/// A diagnosis attached to a past consultation.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct DiagnosisAssociation {
    pub id: RecordId,
    /// `provisional`, `principal` or `differential`; other values are kept as-is.
    #[serde(rename = "type")]
    pub category: String,
    pub diagnosis: Diagnosis,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub consultation: Option<ConsultationDoctor>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct Diagnosis {
    pub id: RecordId,
    pub diagnosis: String,
    pub code: Option<String>,
    pub icd_10: Option<String>,
    pub g_drg: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct ConsultationDoctor {
    pub doctor: Option<StaffRef>,
}

impl DiagnosisAssociation {
    pub fn doctor(&self) -> Option<&StaffRef> {
        self.consultation.as_ref()?.doctor.as_ref()
    }
}
