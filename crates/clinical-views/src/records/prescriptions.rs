use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Drug, RecordId, StaffRef};

/// A prescription on the current consultation or ward round.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct Prescription {
    pub id: RecordId,
    pub medication_name: String,
    pub frequency: String,
    pub duration: String,
    pub dose_quantity: Option<String>,
    pub quantity_to_dispense: Option<u32>,
    pub instructions: Option<String>,
    /// Free-form workflow state, e.g. `prescribed`, `dispensed`.
    pub status: String,
    pub drug_id: Option<RecordId>,
    pub refilled_from_prescription_id: Option<RecordId>,
}

/// A prescription written during an earlier consultation; context for refills.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PreviousPrescription {
    pub id: RecordId,
    pub medication_name: String,
    pub dose_quantity: Option<String>,
    pub frequency: String,
    pub duration: String,
    pub instructions: Option<String>,
    pub status: String,
    pub drug: Option<Drug>,
    pub consultation: PastConsultation,
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct PastConsultation {
    pub id: RecordId,
    pub started_at: DateTime<Utc>,
    pub doctor: StaffRef,
    pub patient_checkin: PatientCheckin,
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct PatientCheckin {
    pub department: Department,
}

#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct Department {
    pub id: RecordId,
    pub name: String,
}

impl PreviousPrescription {
    pub fn prescriber(&self) -> &str {
        &self.consultation.doctor.name
    }

    pub fn department(&self) -> &str {
        &self.consultation.patient_checkin.department.name
    }
}

/// The clinical context a prescription is written against.
///
/// Ward rounds belong to an inpatient admission, so only that variant carries
/// an admission id.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Prescribable {
    Consultation { id: RecordId },
    WardRound { id: RecordId, admission_id: RecordId },
}

impl Default for Prescribable {
    fn default() -> Self {
        Self::Consultation { id: 0 }
    }
}

impl Prescribable {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Consultation { .. } => "consultation",
            Self::WardRound { .. } => "ward_round",
        }
    }

    pub fn id(&self) -> RecordId {
        match self {
            Self::Consultation { id } | Self::WardRound { id, .. } => *id,
        }
    }

    pub fn admission_id(&self) -> Option<RecordId> {
        match self {
            Self::Consultation { .. } => None,
            Self::WardRound { admission_id, .. } => Some(*admission_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prescribable_uses_type_tag() {
        let round: Prescribable =
            serde_json::from_str(r#"{"type": "ward_round", "id": 12, "admission_id": 3}"#).unwrap();
        assert_eq!(round.kind(), "ward_round");
        assert_eq!(round.id(), 12);
        assert_eq!(round.admission_id(), Some(3));

        let consultation = Prescribable::Consultation { id: 5 };
        assert_eq!(
            serde_json::to_value(&consultation).unwrap(),
            serde_json::json!({"type": "consultation", "id": 5})
        );
        assert_eq!(consultation.admission_id(), None);
    }

    #[test]
    fn ward_round_without_admission_is_rejected() {
        let result = serde_json::from_str::<Prescribable>(r#"{"type": "ward_round", "id": 12}"#);
        assert!(result.is_err());
    }

    #[test]
    fn previous_prescription_carries_its_consultation() {
        let previous: PreviousPrescription = serde_json::from_str(
            r#"{
                "id": 31,
                "medication_name": "Metformin 500mg",
                "frequency": "Twice daily (BID)",
                "duration": "30 days",
                "status": "dispensed",
                "consultation": {
                    "id": 8,
                    "started_at": "2025-02-10T08:15:00.000000Z",
                    "doctor": {"id": 2, "name": "Dr. Mensah"},
                    "patient_checkin": {"department": {"id": 4, "name": "OPD"}}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(previous.prescriber(), "Dr. Mensah");
        assert_eq!(previous.department(), "OPD");
        assert_eq!(previous.drug, None);
        assert_eq!(previous.dose_quantity, None);
    }
}
