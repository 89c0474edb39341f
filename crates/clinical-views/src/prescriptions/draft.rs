use serde::{Deserialize, Serialize};

use crate::dosage::{self, QuantitySuggestion};
use crate::records::{Drug, Prescription, RecordId};

/// Field keys the single-entry form writes through the caller's setter.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, Eq, PartialEq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DraftField {
    DrugId,
    MedicationName,
    DoseQuantity,
    Frequency,
    Duration,
    QuantityToDispense,
    Instructions,
}

/// The single prescription currently being typed, owned by the caller.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Eq, PartialEq)]
pub struct PrescriptionDraft {
    pub drug_id: Option<RecordId>,
    pub medication_name: String,
    pub dose_quantity: String,
    pub frequency: String,
    pub duration: String,
    pub quantity_to_dispense: Option<u32>,
    pub instructions: String,
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

impl PrescriptionDraft {
    pub fn from_prescription(prescription: &Prescription) -> Self {
        Self {
            drug_id: prescription.drug_id,
            medication_name: prescription.medication_name.clone(),
            dose_quantity: prescription.dose_quantity.clone().unwrap_or_default(),
            frequency: prescription.frequency.clone(),
            duration: prescription.duration.clone(),
            quantity_to_dispense: prescription.quantity_to_dispense,
            instructions: prescription.instructions.clone().unwrap_or_default(),
        }
    }

    /// Numeric fields that do not parse are cleared rather than rejected.
    pub fn apply(&mut self, field: DraftField, value: String) {
        match field {
            DraftField::DrugId => self.drug_id = value.trim().parse().ok(),
            DraftField::MedicationName => self.medication_name = value,
            DraftField::DoseQuantity => self.dose_quantity = value,
            DraftField::Frequency => self.frequency = value,
            DraftField::Duration => self.duration = value,
            DraftField::QuantityToDispense => self.quantity_to_dispense = value.trim().parse().ok(),
            DraftField::Instructions => self.instructions = value,
        }
    }

    pub fn selected_drug<'a>(&self, drugs: &'a [Drug]) -> Option<&'a Drug> {
        let drug_id = self.drug_id?;
        drugs.iter().find(|drug| drug.id == drug_id)
    }

    /// Refresh the quantity to dispense from the selected drug and dosing fields.
    pub fn recalculate_quantity(&mut self, drugs: &[Drug]) {
        let Some(drug) = self.selected_drug(drugs) else {
            return;
        };
        if drug.is_topical() {
            return;
        }

        if self.frequency == dosage::STAT {
            self.duration = dosage::SINGLE_DOSE.to_string();
        }

        match dosage::suggest_quantity(drug, &self.frequency, &self.duration, &self.dose_quantity) {
            QuantitySuggestion::Set(quantity) => self.quantity_to_dispense = Some(quantity),
            QuantitySuggestion::Clear => self.quantity_to_dispense = None,
            QuantitySuggestion::Keep => {}
        }
    }

    pub fn to_prescription(&self, id: RecordId, status: impl Into<String>) -> Prescription {
        Prescription {
            id,
            medication_name: self.medication_name.clone(),
            frequency: self.frequency.clone(),
            duration: self.duration.clone(),
            dose_quantity: non_empty(&self.dose_quantity),
            quantity_to_dispense: self.quantity_to_dispense,
            instructions: non_empty(&self.instructions),
            status: status.into(),
            drug_id: self.drug_id,
            refilled_from_prescription_id: None,
        }
    }
}
