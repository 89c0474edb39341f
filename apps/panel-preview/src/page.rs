use std::sync::{Mutex, MutexGuard, PoisonError};

use clinical_views::{
    prescriptions::{DraftField, PrescriptionDraft, PrescriptionMutator},
    records::{Drug, Prescription, RecordId},
};

const NEW_STATUS: &str = "prescribed";

/// Consultation page state: the owner of every prescription the panel shows.
#[derive(Clone, Debug, Default)]
pub struct PageState {
    pub prescriptions: Vec<Prescription>,
    pub draft: PrescriptionDraft,
    pub editing: Option<Prescription>,
    pub processing: bool,
}

pub struct ConsultationPage {
    drugs: Vec<Drug>,
    state: Mutex<PageState>,
}

impl ConsultationPage {
    pub fn new(drugs: Vec<Drug>, prescriptions: Vec<Prescription>) -> Self {
        Self {
            drugs,
            state: Mutex::new(PageState {
                prescriptions,
                ..Default::default()
            }),
        }
    }

    pub fn drugs(&self) -> &[Drug] {
        &self.drugs
    }

    pub fn snapshot(&self) -> PageState {
        self.state().clone()
    }

    fn state(&self) -> MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn next_id(state: &PageState) -> RecordId {
        state
            .prescriptions
            .iter()
            .map(|prescription| prescription.id)
            .max()
            .unwrap_or(0)
            + 1
    }

    fn reset_form(state: &mut PageState) {
        state.draft = PrescriptionDraft::default();
        state.editing = None;
    }
}

impl PrescriptionMutator for ConsultationPage {
    fn submit(&self) {
        let mut state = self.state();
        if state.draft.medication_name.is_empty() {
            tracing::warn!("Submit ignored: no drug selected");
            return;
        }

        let prescription = state.draft.to_prescription(Self::next_id(&state), NEW_STATUS);
        tracing::info!(
            "Prescribed {} (#{})",
            prescription.medication_name,
            prescription.id
        );
        state.prescriptions.push(prescription);
        Self::reset_form(&mut state);
    }

    fn update(&self) {
        let mut state = self.state();
        let Some(editing) = state.editing.clone() else {
            tracing::warn!("Update ignored: nothing being edited");
            return;
        };

        let updated = state.draft.to_prescription(editing.id, editing.status.clone());
        if let Some(slot) = state
            .prescriptions
            .iter_mut()
            .find(|prescription| prescription.id == editing.id)
        {
            *slot = updated;
            tracing::info!("Updated prescription #{}", editing.id);
        }
        Self::reset_form(&mut state);
    }

    fn delete(&self, id: RecordId) {
        let mut state = self.state();
        let before = state.prescriptions.len();
        state.prescriptions.retain(|prescription| prescription.id != id);
        if state.prescriptions.len() == before {
            tracing::warn!("Delete ignored: prescription #{} not found", id);
            return;
        }
        if state.editing.as_ref().is_some_and(|editing| editing.id == id) {
            Self::reset_form(&mut state);
        }
        tracing::info!("Deleted prescription #{}", id);
    }

    fn edit(&self, prescription: &Prescription) {
        let mut state = self.state();
        state.draft = PrescriptionDraft::from_prescription(prescription);
        state.editing = Some(prescription.clone());
        tracing::info!("Editing prescription #{}", prescription.id);
    }

    fn cancel_edit(&self) {
        let mut state = self.state();
        if let Some(editing) = state.editing.as_ref() {
            tracing::info!("Cancelled edit of prescription #{}", editing.id);
        }
        Self::reset_form(&mut state);
    }

    fn set_field(&self, field: DraftField, value: String) {
        let mut state = self.state();
        state.draft.apply(field, value);

        if field == DraftField::DrugId {
            let name = state
                .draft
                .selected_drug(&self.drugs)
                .map(|drug| drug.name.clone())
                .unwrap_or_default();
            state.draft.medication_name = name;
        }
        state.draft.recalculate_quantity(&self.drugs);
    }
}
