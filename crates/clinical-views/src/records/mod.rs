//! Record shapes exchanged with the surrounding consultation application.
//!
//! Everything here is caller-owned and read-only from the panel's point of
//! view; field names follow the JSON the application already serves.

use serde::{Deserialize, Serialize};

pub mod diagnoses;
pub mod drugs;
pub mod numeric;
pub mod prescriptions;
pub mod vitals;

pub use diagnoses::{ConsultationDoctor, Diagnosis, DiagnosisAssociation};
pub use drugs::{Drug, UnitKind};
pub use prescriptions::{
    Department, PastConsultation, PatientCheckin, Prescribable, Prescription,
    PreviousPrescription,
};
pub use vitals::VitalSign;

pub type RecordId = u64;

/// Doctor or nurse attribution.
#[derive(Clone, Debug, Serialize, Deserialize, Eq, PartialEq)]
pub struct StaffRef {
    pub id: RecordId,
    pub name: String,
}
